use anyhow::{Result, bail};
use eframe::egui::Pos2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Tuning;
use crate::palette::Palette;

use super::{Canvas, EdgeGraph, FrameClock, ParticleField, RunHandle, Viewport};

/// Owns the whole simulation and runs one step per host frame.
pub struct FrameDriver {
    tuning: Tuning,
    viewport: Viewport,
    clock: FrameClock,
    field: ParticleField,
    graphs: Vec<EdgeGraph>,
    rng: StdRng,
    handle: RunHandle,
    surface_ok: bool,
}

impl FrameDriver {
    /// Seeds the field for a `width` x `height` surface. Fails when the
    /// surface has no usable area, in which case nothing should be ticked.
    pub fn start(width: f32, height: f32, tuning: Tuning, seed: Option<u64>) -> Result<Self> {
        let viewport = Viewport::new(width, height, tuning.range_fraction);
        if !viewport.is_drawable() {
            bail!("rendering surface {width}x{height} has no drawable area");
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut field = ParticleField::new(tuning.target_count);
        field.seed(&viewport, &tuning, &mut rng);

        log::info!(
            "constellation started: {width:.0}x{height:.0}, {} particles, range {:.1}",
            field.active_count(),
            viewport.range()
        );

        Ok(Self {
            tuning,
            viewport,
            clock: FrameClock::new(tuning.delta_cap_ms),
            field,
            graphs: Vec::new(),
            rng,
            handle: RunHandle::new(),
            surface_ok: true,
        })
    }

    pub fn handle(&self) -> RunHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Runs one frame. Returns the simulated step, or `None` when nothing
    /// was simulated (first frame, stopped engine, or unusable surface).
    pub fn tick(&mut self, timestamp_ms: f64, width: f32, height: f32) -> Option<f32> {
        if !self.is_running() {
            return None;
        }

        self.viewport.resize(width, height);
        if !self.viewport.is_drawable() {
            if self.surface_ok {
                log::warn!("surface {width}x{height} is not drawable, pausing simulation");
                self.surface_ok = false;
            }
            return None;
        }
        if !self.surface_ok {
            log::info!("surface restored at {width:.0}x{height:.0}");
            self.surface_ok = true;
        }

        let delta = self.clock.advance(timestamp_ms)?;

        self.field
            .update(delta, &self.viewport, &self.tuning, &mut self.rng);

        let particles = self.field.particles_mut();
        for index in (0..self.graphs.len()).rev() {
            self.graphs[index].update(delta, particles, &self.viewport, &self.tuning);
            if self.graphs[index].is_finished() {
                self.graphs.remove(index);
                log::debug!("propagation finished, {} still live", self.graphs.len());
            }
        }

        Some(delta)
    }

    /// Places a particle at `point` and starts a propagation rooted there.
    /// Ignored once the engine has been stopped.
    pub fn spawn_at(&mut self, point: Pos2) -> Option<usize> {
        if !self.is_running() || !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }

        let index = self.field.spawn_at(point, &self.tuning, &mut self.rng);
        let graph = EdgeGraph::new(index, self.field.particles_mut(), self.viewport.range());
        log::debug!(
            "spawned particle {index} at ({:.0}, {:.0}) with {} initial edges",
            point.x,
            point.y,
            graph.edges().len()
        );
        self.graphs.push(graph);
        Some(index)
    }

    /// Back to front: proximity lines, propagation comets, particles.
    pub fn draw(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        if !self.viewport.is_drawable() {
            return;
        }

        self.field
            .draw_proximity_lines(canvas, &self.viewport, &self.tuning, palette);
        for graph in &self.graphs {
            graph.draw(
                canvas,
                self.field.particles(),
                &self.viewport,
                &self.tuning,
                palette,
            );
        }
        self.field
            .draw_particles(canvas, &self.viewport, &self.tuning, palette);
    }

    pub fn stop(&self) -> bool {
        self.handle.stop()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn graphs(&self) -> &[EdgeGraph] {
        &self.graphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{DrawCall, RecordingCanvas};
    use eframe::egui::pos2;

    fn driver() -> FrameDriver {
        FrameDriver::start(800.0, 600.0, Tuning::default(), Some(1234)).unwrap()
    }

    fn quiet_driver() -> FrameDriver {
        let tuning = Tuning {
            target_count: 0,
            ..Tuning::default()
        };
        FrameDriver::start(800.0, 600.0, tuning, Some(1)).unwrap()
    }

    #[test]
    fn start_rejects_degenerate_surface() {
        assert!(FrameDriver::start(0.0, 600.0, Tuning::default(), Some(1)).is_err());
        assert!(FrameDriver::start(f32::NAN, 600.0, Tuning::default(), Some(1)).is_err());
    }

    #[test]
    fn start_seeds_target_population() {
        let driver = driver();
        assert_eq!(driver.field().active_count(), 69);
        assert!(driver.graphs().is_empty());
    }

    #[test]
    fn first_tick_does_not_simulate() {
        let mut driver = driver();
        let before: Vec<_> = driver.field().particles().iter().map(|p| p.pos()).collect();
        assert_eq!(driver.tick(1_000.0, 800.0, 600.0), None);
        let after: Vec<_> = driver.field().particles().iter().map(|p| p.pos()).collect();
        assert_eq!(before, after);
        assert_eq!(driver.tick(1_016.0, 800.0, 600.0), Some(16.0));
    }

    #[test]
    fn huge_gap_is_clamped_before_integration() {
        let mut driver = quiet_driver();
        let index = driver.spawn_at(pos2(400.0, 300.0)).unwrap();
        let start = driver.field().particles()[index].pos();
        let speed = driver.field().particles()[index].velocity().length();

        driver.tick(0.0, 800.0, 600.0);
        assert_eq!(driver.tick(5_000.0, 800.0, 600.0), Some(999.0));

        let moved = driver.field().particles()[index].pos().distance(start);
        let expected = speed * 1000.0 * 999.0;
        assert!((moved - expected).abs() < 1e-2, "moved {moved}, expected {expected}");
    }

    #[test]
    fn click_next_to_particle_propagates_then_ends() {
        let mut driver = quiet_driver();
        let neighbour = driver.spawn_at(pos2(420.0, 300.0)).unwrap();
        driver.graphs.clear();
        let root = driver.spawn_at(pos2(400.0, 300.0)).unwrap();
        assert_eq!(driver.graphs().len(), 1);
        assert_eq!(driver.graphs()[0].edges().len(), 1);
        assert_eq!(driver.field().particles()[neighbour].degree(), 1);
        assert_eq!(driver.field().particles()[root].degree(), 1);

        let mut timestamp = 0.0;
        driver.tick(timestamp, 800.0, 600.0);
        let mut frames = 0;
        while !driver.graphs().is_empty() && frames < 200 {
            timestamp += 16.0;
            driver.tick(timestamp, 800.0, 600.0);
            frames += 1;
        }

        assert!(driver.graphs().is_empty());
        // 20 units at 9.6 per frame, plus or minus drift.
        assert!((2..=4).contains(&frames), "took {frames} frames");
        assert_eq!(driver.field().particles()[neighbour].degree(), 0);
        assert!(driver.field().particles()[neighbour].pulse() < 0.1);
    }

    #[test]
    fn isolated_click_graph_is_discarded_on_next_tick() {
        let mut driver = quiet_driver();
        driver.spawn_at(pos2(100.0, 100.0));
        assert_eq!(driver.graphs().len(), 1);
        driver.tick(0.0, 800.0, 600.0);
        assert_eq!(driver.graphs().len(), 1);
        driver.tick(16.0, 800.0, 600.0);
        assert!(driver.graphs().is_empty());
    }

    #[test]
    fn stopped_driver_ignores_ticks_and_clicks() {
        let mut driver = driver();
        let handle = driver.handle();
        driver.tick(0.0, 800.0, 600.0);
        assert!(handle.stop());
        assert!(!driver.stop());
        assert_eq!(driver.tick(16.0, 800.0, 600.0), None);
        assert_eq!(driver.spawn_at(pos2(1.0, 1.0)), None);
        assert_eq!(driver.field().len(), 69);
    }

    #[test]
    fn resize_rescales_range_and_degenerate_frames_are_skipped() {
        let mut driver = driver();
        driver.tick(0.0, 800.0, 600.0);
        driver.tick(16.0, 300.0, 400.0);
        assert_eq!(driver.viewport().diagonal(), 500.0);
        assert_eq!(driver.tick(32.0, 0.0, 0.0), None);
        assert_eq!(driver.tick(48.0, 300.0, 400.0), Some(32.0));
    }

    #[test]
    fn draw_order_is_lines_then_comets_then_particles() {
        let mut driver = quiet_driver();
        driver.spawn_at(pos2(500.0, 300.0));
        driver.spawn_at(pos2(400.0, 300.0));
        driver.tick(0.0, 800.0, 600.0);
        driver.tick(50.0, 800.0, 600.0);

        let palette = Palette::default();
        let mut canvas = RecordingCanvas::default();
        driver.draw(&mut canvas, &palette);

        let kinds: Vec<&str> = canvas
            .calls
            .iter()
            .map(|call| match call {
                DrawCall::Line { alpha, .. } if *alpha == driver.tuning.edge_alpha => "comet",
                DrawCall::Line { .. } => "line",
                DrawCall::Circle { .. } => "circle",
            })
            .collect();
        assert_eq!(kinds, vec!["line", "comet", "circle", "circle"]);
    }
}
