//! Scene state management.

use std::time::{SystemTime, UNIX_EPOCH};

use nebula_core::{AnimationSpeed, Point, Viewport};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Position, Rect},
};

use crate::animations::{graph::GraphField, particles::ParticleField};
use crate::clock::FrameClock;
use crate::paint::paint_display_list;
use crate::surface::DisplayList;

/// Mixed into the seed so the particle stream differs from the graph's.
const PARTICLE_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed derived from the system clock.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Both animated layers plus their drawing buffers.
#[derive(Debug)]
pub struct SceneState {
    /// Node graph and starfield, created on first use.
    graph: Option<GraphField>,
    /// Particle overlay, created on first use.
    particles: Option<ParticleField>,
    /// Last frame drawn by the graph field.
    graph_list: DisplayList,
    /// Last frame drawn by the particle overlay.
    particle_list: DisplayList,
    clock: FrameClock,
    seed: u64,
    cell_width: f32,
    cell_height: f32,
    /// Hero area the graph field was last sized for.
    hero_area: Rect,
    /// Full area the particle overlay was last sized for.
    full_area: Rect,
    graph_enabled: bool,
    particles_enabled: bool,
    paused: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    /// Create a scene seeded from the system clock.
    pub fn new() -> Self {
        Self::with_seed(time_seed())
    }

    /// Create a scene with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            graph: None,
            particles: None,
            graph_list: DisplayList::new(),
            particle_list: DisplayList::new(),
            clock: FrameClock::new(),
            seed,
            cell_width: 8.0,
            cell_height: 16.0,
            hero_area: Rect::default(),
            full_area: Rect::default(),
            graph_enabled: true,
            particles_enabled: true,
            paused: false,
        }
    }

    /// Set the logical size of one terminal cell.
    pub fn with_cell_size(mut self, width: f32, height: f32) -> Self {
        self.cell_width = width;
        self.cell_height = height;
        self
    }

    pub fn graph(&self) -> Option<&GraphField> {
        self.graph.as_ref()
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        self.particles.as_ref()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn graph_enabled(&self) -> bool {
        self.graph_enabled
    }

    pub fn particles_enabled(&self) -> bool {
        self.particles_enabled
    }

    pub fn set_graph_enabled(&mut self, enabled: bool) {
        self.graph_enabled = enabled;
        tracing::debug!(enabled, "graph layer toggled");
    }

    pub fn set_particles_enabled(&mut self, enabled: bool) {
        self.particles_enabled = enabled;
        tracing::debug!(enabled, "particle layer toggled");
    }

    /// Freeze or resume the animation. The last frame stays on screen.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            self.clock.reset();
        }
        self.paused = paused;
    }

    /// Regenerate both layers from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        if let Some(graph) = &mut self.graph {
            graph.reseed(seed);
        }
        if let Some(particles) = &mut self.particles {
            particles.reseed(seed ^ PARTICLE_SEED_SALT);
        }
        tracing::info!(seed, "scene reseeded");
    }

    /// Pointer moved to a terminal cell.
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        let point = self.hero_point(column, row);
        if let Some(graph) = &mut self.graph {
            match point {
                Some(point) => graph.pointer_moved(point),
                None => graph.pointer_left(),
            }
        }
    }

    /// Pointer left the terminal.
    pub fn pointer_left(&mut self) {
        if let Some(graph) = &mut self.graph {
            graph.pointer_left();
        }
    }

    /// Hero-local logical position of the center of a cell, if inside the hero.
    pub fn hero_point(&self, column: u16, row: u16) -> Option<Point> {
        let hero = self.hero_area;
        hero.contains(Position::new(column, row)).then(|| {
            Point::new(
                ((column - hero.x) as f32 + 0.5) * self.cell_width,
                ((row - hero.y) as f32 + 0.5) * self.cell_height,
            )
        })
    }

    /// Advance the animation and draw it into the frame.
    pub fn render(&mut self, frame: &mut Frame, hero: Rect, elapsed_ms: u64, speed: AnimationSpeed) {
        let full = frame.area();
        self.advance(hero, full, elapsed_ms, speed);
        self.paint(frame.buffer_mut());
    }

    /// Size the layers for the given areas and run the steps due.
    pub fn advance(&mut self, hero: Rect, full: Rect, elapsed_ms: u64, speed: AnimationSpeed) {
        self.sync_sizes(hero, full);

        if self.paused {
            return;
        }
        let steps = self.clock.tick(elapsed_ms, speed);
        for _ in 0..steps {
            if self.graph_enabled
                && let Some(graph) = &mut self.graph
            {
                graph.step(&mut self.graph_list);
            }
            if self.particles_enabled
                && let Some(particles) = &mut self.particles
            {
                particles.step(&mut self.particle_list);
            }
        }
    }

    /// Paint the most recent frame of each enabled layer.
    pub fn paint(&self, buf: &mut Buffer) {
        if self.graph_enabled
            && let Some(graph) = &self.graph
        {
            paint_display_list(&self.graph_list, graph.viewport(), self.hero_area, buf);
        }
        if self.particles_enabled
            && let Some(particles) = &self.particles
        {
            paint_display_list(
                &self.particle_list,
                particles.viewport(),
                self.full_area,
                buf,
            );
        }
    }

    /// Create layers on first use, and react to size changes: the graph is
    /// regenerated, the particle overlay only adopts the new bounds.
    fn sync_sizes(&mut self, hero: Rect, full: Rect) {
        let hero_viewport = Viewport::from_area(hero, self.cell_width, self.cell_height);
        let full_viewport = Viewport::from_area(full, self.cell_width, self.cell_height);

        let hero_changed =
            hero.width != self.hero_area.width || hero.height != self.hero_area.height;
        let full_changed =
            full.width != self.full_area.width || full.height != self.full_area.height;

        if let Some(graph) = &mut self.graph {
            if hero_changed {
                tracing::info!(
                    width = hero.width,
                    height = hero.height,
                    "hero area resized, regenerating graph"
                );
                graph.resize(hero_viewport);
                // Keeps a paused scene showing the regenerated field.
                graph.draw(&mut self.graph_list);
            }
        } else {
            self.graph = Some(GraphField::new(hero_viewport, self.seed));
        }

        if let Some(particles) = &mut self.particles {
            if full_changed {
                particles.resize(full_viewport);
            }
        } else {
            self.particles = Some(ParticleField::new(
                full_viewport,
                self.seed ^ PARTICLE_SEED_SALT,
            ));
        }

        self.hero_area = hero;
        self.full_area = full;
    }
}
