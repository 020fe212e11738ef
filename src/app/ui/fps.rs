use std::collections::VecDeque;

const FPS_SAMPLE_WINDOW: usize = 180;

#[derive(Default)]
pub(in crate::app) struct FpsCounter {
    current: f32,
    samples: VecDeque<f32>,
}

impl FpsCounter {
    pub(in crate::app) fn record(&mut self, dt: f32) {
        if dt <= f32::EPSILON || !dt.is_finite() {
            return;
        }

        self.current = (1.0 / dt).clamp(0.0, 1000.0);
        self.samples.push_back(self.current);
        while self.samples.len() > FPS_SAMPLE_WINDOW {
            self.samples.pop_front();
        }
    }

    pub(in crate::app) fn display_text(&self) -> Option<String> {
        if self.samples.is_empty() {
            return None;
        }

        let mut parts = vec![format!("FPS {:.0}", self.current)];

        let avg = self.samples.iter().sum::<f32>() / self.samples.len() as f32;
        parts.push(format!("avg {:.1}", avg));

        if let Some(low) = self.samples.iter().copied().reduce(f32::min) {
            parts.push(format!("low {:.0}", low));
        }

        if self.current > f32::EPSILON {
            parts.push(format!("{:.1} ms", 1000.0 / self.current));
        }

        Some(parts.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_counter_shows_nothing() {
        assert_eq!(FpsCounter::default().display_text(), None);
    }

    #[test]
    fn window_is_bounded_and_text_summarises_it() {
        let mut counter = FpsCounter::default();
        for _ in 0..500 {
            counter.record(1.0 / 60.0);
        }
        counter.record(0.0);
        assert_eq!(counter.samples.len(), FPS_SAMPLE_WINDOW);
        assert_eq!(
            counter.display_text().as_deref(),
            Some("FPS 60 | avg 60.0 | low 60 | 16.7 ms")
        );
    }
}
