use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::palette::Rgb;
use crate::sim::Canvas;

pub(super) fn to_color32(color: Rgb, alpha: f32) -> Color32 {
    let alpha = if alpha.is_finite() {
        alpha.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, (alpha * 255.0).round() as u8)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
}

/// Paints viewport coordinates onto an egui painter whose canvas starts at
/// `origin` in screen space.
pub(super) struct PainterCanvas<'a> {
    painter: &'a Painter,
    origin: Pos2,
}

impl<'a> PainterCanvas<'a> {
    pub(super) fn new(painter: &'a Painter, origin: Pos2) -> Self {
        Self { painter, origin }
    }

    fn to_screen(&self, pos: Pos2) -> Pos2 {
        self.origin + pos.to_vec2()
    }
}

impl Canvas for PainterCanvas<'_> {
    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Rgb, alpha: f32) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            Stroke::new(width, to_color32(color, alpha)),
        );
    }

    fn circle(&mut self, center: Pos2, radius: f32, color: Rgb) {
        self.painter
            .circle_filled(self.to_screen(center), radius, to_color32(color, 1.0));
    }
}
