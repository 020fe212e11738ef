use eframe::egui::Pos2;
use rand::Rng;

use crate::config::Tuning;
use crate::palette::Palette;

use super::particle::Population;
use super::{Canvas, Particle, Viewport};

/// Owns the particle arena. Particles are appended or reused in place but
/// never removed, so indices held by edge graphs stay valid.
pub struct ParticleField {
    particles: Vec<Particle>,
    population: Population,
}

impl ParticleField {
    pub fn new(target_count: usize) -> Self {
        Self {
            particles: Vec::with_capacity(target_count),
            population: Population {
                active: 0,
                target: target_count,
            },
        }
    }

    /// Fills the field up to the target count, giving every particle a random
    /// head start so the first frame is not an empty screen.
    pub fn seed<R: Rng + ?Sized>(&mut self, viewport: &Viewport, tuning: &Tuning, rng: &mut R) {
        let warmup_limit = tuning.prewarm_limit_ms();
        while self.population.active < self.population.target {
            let mut particle = Particle::on_ring(viewport, tuning, rng);
            self.population.active += 1;
            let warmup = warmup_limit * rng.random::<f32>();
            particle.update(warmup, viewport, tuning, &mut self.population, rng);
            self.particles.push(particle);
        }
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        delta: f32,
        viewport: &Viewport,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        for particle in &mut self.particles {
            particle.update(delta, viewport, tuning, &mut self.population, rng);
        }
    }

    /// Appends a user-placed particle. The target count only governs ambient
    /// respawns, so this always succeeds.
    pub fn spawn_at<R: Rng + ?Sized>(
        &mut self,
        point: Pos2,
        tuning: &Tuning,
        rng: &mut R,
    ) -> usize {
        self.particles.push(Particle::at_point(point, tuning, rng));
        self.population.active += 1;
        self.particles.len() - 1
    }

    /// Faint line between every active pair closer than `range`, fading out
    /// linearly with distance. Quadratic in the population.
    pub fn draw_proximity_lines(
        &self,
        canvas: &mut dyn Canvas,
        viewport: &Viewport,
        tuning: &Tuning,
        palette: &Palette,
    ) {
        let range = viewport.range();
        if !range.is_finite() || range <= 0.0 {
            return;
        }

        let width = tuning.line_width * viewport.diagonal();
        for (i, a) in self.particles.iter().enumerate() {
            if !a.active {
                continue;
            }
            for b in &self.particles[..i] {
                if !b.active {
                    continue;
                }
                let distance = a.pos.distance(b.pos);
                if distance >= range {
                    continue;
                }
                canvas.line(a.pos, b.pos, width, palette.line, 1.0 - distance / range);
            }
        }
    }

    pub fn draw_particles(
        &self,
        canvas: &mut dyn Canvas,
        viewport: &Viewport,
        tuning: &Tuning,
        palette: &Palette,
    ) {
        for particle in &self.particles {
            particle.draw(canvas, viewport, tuning, palette);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn active_count(&self) -> usize {
        self.population.active
    }

    pub fn target_count(&self) -> usize {
        self.population.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DrawCall;
    use crate::sim::RecordingCanvas;
    use eframe::egui::{Vec2, pos2};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 0.15)
    }

    fn still_field(points: &[Pos2], target: usize) -> ParticleField {
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = ParticleField::new(target);
        for &point in points {
            field.spawn_at(point, &tuning, &mut rng);
        }
        for particle in field.particles_mut() {
            particle.velocity = Vec2::ZERO;
        }
        field
    }

    #[test]
    fn seed_fills_to_target() {
        let viewport = viewport();
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut field = ParticleField::new(tuning.target_count);
        field.seed(&viewport, &tuning, &mut rng);

        assert_eq!(field.active_count(), tuning.target_count);
        assert_eq!(field.particles().iter().filter(|p| p.is_active()).count(), 69);
        assert_eq!(field.len(), tuning.target_count);
    }

    #[test]
    fn population_never_exceeds_target_and_is_replenished() {
        let viewport = viewport();
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(8);
        let mut field = ParticleField::new(tuning.target_count);
        field.seed(&viewport, &tuning, &mut rng);

        for _ in 0..2_000 {
            field.update(250.0, &viewport, &tuning, &mut rng);
            let active = field.particles().iter().filter(|p| p.is_active()).count();
            assert_eq!(active, field.active_count());
            assert!(active <= tuning.target_count);
            assert_eq!(active, tuning.target_count);
        }
    }

    #[test]
    fn interactive_spawn_ignores_cap() {
        let viewport = viewport();
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut field = ParticleField::new(2);
        field.seed(&viewport, &tuning, &mut rng);

        let index = field.spawn_at(pos2(400.0, 300.0), &tuning, &mut rng);
        assert_eq!(index, 2);
        assert_eq!(field.active_count(), 3);
        assert_eq!(field.particles()[index].pos(), pos2(400.0, 300.0));
    }

    #[test]
    fn proximity_line_alpha_fades_with_distance() {
        let viewport = viewport();
        let field = still_field(&[pos2(100.0, 100.0), pos2(200.0, 100.0)], 2);
        let mut canvas = RecordingCanvas::default();
        field.draw_proximity_lines(&mut canvas, &viewport, &Tuning::default(), &Palette::default());

        assert_eq!(canvas.calls.len(), 1);
        let DrawCall::Line { alpha, width, .. } = canvas.calls[0] else {
            panic!("expected a line");
        };
        assert!((alpha - (1.0 - 100.0 / 150.0)).abs() < 1e-3);
        assert!((width - 2.0).abs() < 1e-3);
    }

    #[test]
    fn pairs_beyond_range_get_no_line() {
        let viewport = viewport();
        let field = still_field(
            &[pos2(100.0, 100.0), pos2(251.0, 100.0), pos2(600.0, 500.0)],
            3,
        );
        let mut canvas = RecordingCanvas::default();
        field.draw_proximity_lines(&mut canvas, &viewport, &Tuning::default(), &Palette::default());
        assert!(canvas.lines().is_empty());
    }

    #[test]
    fn coincident_particles_draw_opaque_line() {
        let viewport = viewport();
        let field = still_field(&[pos2(300.0, 300.0), pos2(300.0, 300.0)], 2);
        let mut canvas = RecordingCanvas::default();
        field.draw_proximity_lines(&mut canvas, &viewport, &Tuning::default(), &Palette::default());
        let DrawCall::Line { alpha, .. } = canvas.calls[0] else {
            panic!("expected a line");
        };
        assert_eq!(alpha, 1.0);
    }

    #[test]
    fn zero_range_skips_lines() {
        let viewport = Viewport::new(800.0, 600.0, 0.0);
        let field = still_field(&[pos2(300.0, 300.0), pos2(300.0, 300.0)], 2);
        let mut canvas = RecordingCanvas::default();
        field.draw_proximity_lines(&mut canvas, &viewport, &Tuning::default(), &Palette::default());
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn draw_particles_skips_inactive() {
        let viewport = viewport();
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut field = still_field(&[pos2(10.0, 10.0), pos2(-900.0, 10.0)], 0);
        field.update(1.0, &viewport, &tuning, &mut rng);

        let mut canvas = RecordingCanvas::default();
        field.draw_particles(&mut canvas, &viewport, &tuning, &Palette::default());
        assert_eq!(canvas.circles().len(), 1);
    }
}
