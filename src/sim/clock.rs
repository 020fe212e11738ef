use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Turns host frame timestamps (milliseconds) into bounded step sizes.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    last_ms: Option<f64>,
    cap_ms: f32,
}

impl FrameClock {
    pub fn new(cap_ms: f32) -> Self {
        Self {
            last_ms: None,
            cap_ms,
        }
    }

    /// The first call only records the timestamp and returns `None`. Later
    /// calls return the elapsed time clamped to `[0, cap]`.
    pub fn advance(&mut self, timestamp_ms: f64) -> Option<f32> {
        if !timestamp_ms.is_finite() {
            return self.last_ms.map(|_| 0.0);
        }

        let last = self.last_ms.replace(timestamp_ms)?;

        let elapsed = (timestamp_ms - last).max(0.0) as f32;
        Some(elapsed.min(self.cap_ms))
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Cancellation token for a running engine. Clones share the same flag.
#[derive(Clone, Debug)]
pub struct RunHandle {
    running: Arc<AtomicBool>,
}

impl RunHandle {
    pub(super) fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns `true` only for the call that actually stopped the engine.
    pub fn stop(&self) -> bool {
        self.running.swap(false, Ordering::AcqRel)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
