use eframe::egui::Pos2;

/// Canvas dimensions plus the two scale constants everything else is
/// expressed in: the diagonal and the proximity range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    diagonal: f32,
    range: f32,
    range_fraction: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, range_fraction: f32) -> Self {
        let mut viewport = Self {
            width: 0.0,
            height: 0.0,
            diagonal: 0.0,
            range: 0.0,
            range_fraction,
        };
        viewport.recompute(width, height);
        viewport
    }

    /// Returns `true` when the dimensions actually changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.recompute(width, height);
        true
    }

    fn recompute(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.diagonal = width.hypot(height);
        self.range = self.range_fraction * self.diagonal;
    }

    /// A surface can be simulated on only if both sides are finite and positive.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn diagonal(&self) -> f32 {
        self.diagonal
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    /// Whether `pos` lies inside the viewport grown by `range` on every side.
    pub fn contains_with_margin(&self, pos: Pos2) -> bool {
        pos.x >= -self.range
            && pos.x <= self.width + self.range
            && pos.y >= -self.range
            && pos.y <= self.height + self.range
    }
}
