use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend towards `other`; `amount` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, amount: f32) -> Rgb {
        let amount = if amount.is_finite() {
            amount.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let channel = |from: u8, to: u8| {
            (from as f32 + (to as f32 - from as f32) * amount)
                .round()
                .clamp(0.0, 255.0) as u8
        };

        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

/// Shared color parameters read by every draw call.
///
/// The owner may replace any of these between frames; the engine never keeps
/// a copy past the draw call it was handed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub base: Rgb,
    pub highlight: Rgb,
    pub line: Rgb,
    pub edge: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: Rgb::new(183, 185, 188),
            highlight: Rgb::new(147, 197, 253),
            line: Rgb::new(183, 185, 188),
            edge: Rgb::new(147, 197, 253),
        }
    }
}
