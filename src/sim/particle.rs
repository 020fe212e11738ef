use std::f32::consts::{PI, TAU};

use eframe::egui::{Pos2, Vec2, pos2, vec2};
use rand::Rng;

use crate::config::Tuning;
use crate::palette::Palette;

use super::{Canvas, Viewport};

/// Active-particle bookkeeping shared by every particle in a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Population {
    pub(super) active: usize,
    pub(super) target: usize,
}

impl Population {
    fn has_free_slot(&self) -> bool {
        self.active < self.target
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub(crate) pos: Pos2,
    pub(crate) velocity: Vec2,
    pub(crate) size: f32,
    pub(crate) pulse: f32,
    pub(crate) degree: u32,
    pub(crate) active: bool,
}

fn random_speed<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> f32 {
    tuning.base_speed + (tuning.speed_jitter / 2.0) * rng.random::<f32>()
}

fn random_size<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> f32 {
    tuning.base_size + tuning.size_jitter * rng.random::<f32>()
}

/// Point on the ring `range` outside the viewport, picked uniformly by
/// perimeter length, and a heading within 60 degrees of the inward normal.
fn ring_spawn<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> (Pos2, f32) {
    let width = viewport.width();
    let height = viewport.height();
    let range = viewport.range();

    let mut angle = (1.0 / 6.0 + (2.0 * rng.random::<f32>()) / 3.0) * PI;
    let mut along = 2.0 * (width + height) * rng.random::<f32>();

    if along < width {
        return (pos2(along, -range), angle);
    }

    along -= width;
    if along < height {
        angle += PI / 2.0;
        return (pos2(width + range, along), angle);
    }

    along -= height;
    if along < width {
        angle += PI;
        return (pos2(along, height + range), angle);
    }

    angle += 3.0 * PI / 2.0;
    (pos2(-range, (along - width).min(height)), angle)
}

impl Particle {
    fn inactive() -> Self {
        Self {
            pos: Pos2::ZERO,
            velocity: Vec2::ZERO,
            size: 0.0,
            pulse: 0.0,
            degree: 0,
            active: false,
        }
    }

    /// A fresh particle already placed on the spawn ring.
    pub(super) fn on_ring<R: Rng + ?Sized>(
        viewport: &Viewport,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let mut particle = Self::inactive();
        particle.respawn(viewport, tuning, rng);
        particle
    }

    /// A fresh particle placed exactly at `point`.
    pub(super) fn at_point<R: Rng + ?Sized>(point: Pos2, tuning: &Tuning, rng: &mut R) -> Self {
        let mut particle = Self::inactive();
        particle.spawn_at(point, tuning, rng);
        particle
    }

    pub fn respawn<R: Rng + ?Sized>(&mut self, viewport: &Viewport, tuning: &Tuning, rng: &mut R) {
        self.size = random_size(tuning, rng);
        let speed = random_speed(tuning, rng);
        let (pos, angle) = ring_spawn(viewport, rng);
        self.pos = pos;
        self.velocity = vec2(angle.cos(), angle.sin()) * speed;
        self.pulse = 0.0;
        self.degree = 0;
        self.active = true;
    }

    pub fn spawn_at<R: Rng + ?Sized>(&mut self, point: Pos2, tuning: &Tuning, rng: &mut R) {
        self.pos = point;
        self.size = random_size(tuning, rng);
        let speed = random_speed(tuning, rng);
        let angle = TAU * rng.random::<f32>();
        self.velocity = vec2(angle.cos(), angle.sin()) * speed;
        self.pulse = 0.0;
        self.active = true;
    }

    pub(super) fn update<R: Rng + ?Sized>(
        &mut self,
        delta: f32,
        viewport: &Viewport,
        tuning: &Tuning,
        population: &mut Population,
        rng: &mut R,
    ) {
        // Particles with live edges keep drifting but may not despawn.
        if self.active && self.degree == 0 && !viewport.contains_with_margin(self.pos) {
            self.active = false;
            population.active = population.active.saturating_sub(1);
        }

        if !self.active && population.has_free_slot() {
            self.respawn(viewport, tuning, rng);
            population.active += 1;
        }

        if !self.active {
            return;
        }

        self.pulse = (self.pulse + tuning.pulse_rate * delta).min(1.0);
        self.pos += self.velocity * viewport.diagonal() * delta;
    }

    /// Half sine of `sqrt(pulse)`: rises quickly, fades slowly, zero at both ends.
    pub fn pulse_wave(&self) -> f32 {
        (PI * self.pulse.clamp(0.0, 1.0).sqrt()).sin().max(0.0)
    }

    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        viewport: &Viewport,
        tuning: &Tuning,
        palette: &Palette,
    ) {
        if !self.active {
            return;
        }

        let wave = self.pulse_wave();
        let fresh = self.pulse < 1.0;
        let mut radius = self.size;
        if fresh {
            radius += tuning.pulse_radius_bonus * wave;
        }
        let fill = if fresh {
            palette.base.lerp(palette.highlight, wave)
        } else {
            palette.base
        };

        canvas.circle(self.pos, radius * viewport.diagonal(), fill);
    }

    pub fn pos(&self) -> Pos2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn pulse(&self) -> f32 {
        self.pulse
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
