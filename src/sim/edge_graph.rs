use std::collections::VecDeque;

use crate::config::Tuning;
use crate::palette::Palette;

use super::{Canvas, Particle, Viewport};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    /// Distance travelled along the edge, in viewport units.
    pub progress: f32,
}

/// Timed flood over the particle arena, rooted at one particle.
///
/// Visiting a particle connects it to every unvisited active particle within
/// range. Each edge then grows at a fixed speed; when it covers the current
/// distance between its endpoints it is delivered, and its target is visited
/// in turn. The graph is finished once no edges remain.
#[derive(Clone, Debug, Default)]
pub struct EdgeGraph {
    visited: Vec<bool>,
    edges: Vec<Edge>,
    delivered: VecDeque<usize>,
}

impl EdgeGraph {
    pub fn new(start: usize, particles: &mut [Particle], range: f32) -> Self {
        let mut graph = Self {
            visited: vec![false; particles.len()],
            edges: Vec::new(),
            delivered: VecDeque::new(),
        };
        graph.visit(start, particles, range);
        graph
    }

    fn sync_len(&mut self, len: usize) {
        if self.visited.len() < len {
            self.visited.resize(len, false);
        }
    }

    /// Returns the number of edges created. Visiting twice is a no-op.
    pub fn visit(&mut self, index: usize, particles: &mut [Particle], range: f32) -> usize {
        if index >= particles.len() {
            return 0;
        }
        self.sync_len(particles.len());
        if self.visited[index] {
            return 0;
        }

        self.visited[index] = true;
        particles[index].pulse = 0.0;

        let origin = particles[index].pos;
        let mut created = 0;
        for other in 0..particles.len() {
            if self.visited[other] || !particles[other].active {
                continue;
            }
            if origin.distance(particles[other].pos) > range {
                continue;
            }

            self.edges.push(Edge {
                from: index,
                to: other,
                progress: 0.0,
            });
            particles[index].degree += 1;
            particles[other].degree += 1;
            created += 1;
        }
        created
    }

    /// Grows every edge, delivers the completed ones, then visits their
    /// targets. Returns the number of deliveries.
    pub fn update(
        &mut self,
        delta: f32,
        particles: &mut [Particle],
        viewport: &Viewport,
        tuning: &Tuning,
    ) -> usize {
        self.sync_len(particles.len());

        let step = tuning.edge_speed * viewport.diagonal() * delta;
        for index in (0..self.edges.len()).rev() {
            let edge = &mut self.edges[index];
            let distance = particles[edge.from].pos.distance(particles[edge.to].pos);
            edge.progress += step;
            if edge.progress < distance {
                continue;
            }

            let edge = self.edges.remove(index);
            let from = &mut particles[edge.from];
            from.degree = from.degree.saturating_sub(1);
            let to = &mut particles[edge.to];
            to.degree = to.degree.saturating_sub(1);
            log::trace!("edge {} -> {} delivered", edge.from, edge.to);
            self.delivered.push_back(edge.to);
        }

        let deliveries = self.delivered.len();
        while let Some(index) = self.delivered.pop_front() {
            self.visit(index, particles, viewport.range());
        }
        deliveries
    }

    /// Draws only the leading stretch of each edge, a short comet that
    /// slides from `from` towards `to`.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        particles: &[Particle],
        viewport: &Viewport,
        tuning: &Tuning,
        palette: &Palette,
    ) {
        let tail = tuning.comet_tail * viewport.diagonal();
        let width = tuning.line_width * viewport.diagonal();
        for edge in &self.edges {
            let from = particles[edge.from].pos;
            let to = particles[edge.to].pos;
            let distance = from.distance(to);
            if !distance.is_finite() || distance <= f32::EPSILON {
                continue;
            }

            let head = (edge.progress / distance) * ((distance + tail) / distance);
            let start = (head - tail / distance).max(0.0);
            let end = head.min(1.0);
            if end <= start {
                continue;
            }

            canvas.line(
                from.lerp(to, start),
                from.lerp(to, end),
                width,
                palette.edge,
                tuning.edge_alpha,
            );
        }
    }

    pub fn is_finished(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_visited(&self, index: usize) -> bool {
        self.visited.get(index).copied().unwrap_or(false)
    }

    pub fn tracked_len(&self) -> usize {
        self.visited.len()
    }
}
