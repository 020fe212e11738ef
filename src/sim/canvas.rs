use eframe::egui::Pos2;

use crate::palette::Rgb;

/// Drawing surface in viewport coordinates.
pub trait Canvas {
    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Rgb, alpha: f32);

    fn circle(&mut self, center: Pos2, radius: f32, color: Rgb);
}

#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawCall {
    Line {
        from: Pos2,
        to: Pos2,
        width: f32,
        color: Rgb,
        alpha: f32,
    },
    Circle {
        center: Pos2,
        radius: f32,
        color: Rgb,
    },
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingCanvas {
    pub(crate) calls: Vec<DrawCall>,
}

#[cfg(test)]
impl RecordingCanvas {
    pub(crate) fn lines(&self) -> Vec<&DrawCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Line { .. }))
            .collect()
    }

    pub(crate) fn circles(&self) -> Vec<&DrawCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Circle { .. }))
            .collect()
    }
}

#[cfg(test)]
impl Canvas for RecordingCanvas {
    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Rgb, alpha: f32) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            width,
            color,
            alpha,
        });
    }

    fn circle(&mut self, center: Pos2, radius: f32, color: Rgb) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }
}
