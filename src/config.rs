use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::palette::Palette;

/// Simulation constants. Distances are fractions of the viewport diagonal and
/// rates are per millisecond of frame time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub target_count: usize,
    pub range_fraction: f32,
    pub base_speed: f32,
    pub speed_jitter: f32,
    pub base_size: f32,
    pub size_jitter: f32,
    pub pulse_radius_bonus: f32,
    pub pulse_rate: f32,
    pub edge_speed: f32,
    pub comet_tail: f32,
    pub edge_alpha: f32,
    pub line_width: f32,
    pub delta_cap_ms: f32,
    /// Upper bound of the random warm-up step, as a fraction of the diagonal
    /// travelled at full jitter speed.
    pub prewarm_span: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_count: 69,
            range_fraction: 0.15,
            base_speed: 2e-5,
            speed_jitter: 4e-5,
            base_size: 0.003,
            size_jitter: 0.002,
            pulse_radius_bonus: 0.002,
            pulse_rate: 0.005,
            edge_speed: 0.0006,
            comet_tail: 0.03,
            edge_alpha: 0.69,
            line_width: 0.002,
            delta_cap_ms: 999.0,
            prewarm_span: 0.145,
        }
    }
}

fn clamp_logged(name: &str, value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("tuning.{name} is not finite, using {fallback}");
        return fallback;
    }

    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("tuning.{name} = {value} is out of range, clamped to {clamped}");
    }
    clamped
}

impl Tuning {
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            target_count: self.target_count.min(4096),
            range_fraction: clamp_logged(
                "range_fraction",
                self.range_fraction,
                0.0,
                1.0,
                defaults.range_fraction,
            ),
            base_speed: clamp_logged("base_speed", self.base_speed, 0.0, 1e-2, defaults.base_speed),
            speed_jitter: clamp_logged(
                "speed_jitter",
                self.speed_jitter,
                0.0,
                1e-2,
                defaults.speed_jitter,
            ),
            base_size: clamp_logged("base_size", self.base_size, 0.0, 0.1, defaults.base_size),
            size_jitter: clamp_logged(
                "size_jitter",
                self.size_jitter,
                0.0,
                0.1,
                defaults.size_jitter,
            ),
            pulse_radius_bonus: clamp_logged(
                "pulse_radius_bonus",
                self.pulse_radius_bonus,
                0.0,
                0.1,
                defaults.pulse_radius_bonus,
            ),
            pulse_rate: clamp_logged("pulse_rate", self.pulse_rate, 0.0, 1.0, defaults.pulse_rate),
            edge_speed: clamp_logged("edge_speed", self.edge_speed, 1e-6, 1.0, defaults.edge_speed),
            comet_tail: clamp_logged("comet_tail", self.comet_tail, 0.0, 1.0, defaults.comet_tail),
            edge_alpha: clamp_logged("edge_alpha", self.edge_alpha, 0.0, 1.0, defaults.edge_alpha),
            line_width: clamp_logged("line_width", self.line_width, 0.0, 0.1, defaults.line_width),
            delta_cap_ms: clamp_logged(
                "delta_cap_ms",
                self.delta_cap_ms,
                1.0,
                60_000.0,
                defaults.delta_cap_ms,
            ),
            prewarm_span: clamp_logged(
                "prewarm_span",
                self.prewarm_span,
                0.0,
                10.0,
                defaults.prewarm_span,
            ),
        }
    }

    /// Warm-up steps are drawn from `[0, prewarm_span / speed_jitter)` ms.
    pub fn prewarm_limit_ms(&self) -> f32 {
        if self.speed_jitter > 0.0 {
            self.prewarm_span / self.speed_jitter
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    pub palette: Palette,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut settings: Settings =
            serde_json::from_str(text).context("failed to parse settings JSON")?;
        settings.tuning = settings.tuning.sanitized();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize settings")
    }
}
