//! Rising particle overlay (stateful).
//!
//! Particles drift upward and are recycled below the bottom edge once they
//! leave through the top. The batch size never changes.

use nebula_core::{Point, Rgb, Viewport};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::chars::PARTICLE_GLYPHS;
use crate::color::random_space_color;
use crate::surface::Surface;

/// Number of particles in the overlay.
pub const PARTICLE_COUNT: usize = 35;
/// A particle above this line is recycled.
pub const RECYCLE_EDGE: f32 = -20.0;
/// Recycled particles enter up to this far below the bottom edge.
pub const ENTRY_SPREAD: f32 = 100.0;
/// Chance that a particle carries a glyph.
pub const GLYPH_CHANCE: f64 = 0.3;

const GLYPH_ALPHA_FACTOR: f32 = 0.5;

/// A slowly rising dot or glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed_x: f32,
    /// Always negative: particles rise.
    pub speed_y: f32,
    pub opacity: f32,
    pub color: Rgb,
    pub glyph: Option<char>,
}

impl Particle {
    /// A fresh particle entering below the bottom edge.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        let mut particle = Self {
            x: 0.0,
            y: 0.0,
            size: 0.0,
            speed_x: 0.0,
            speed_y: 0.0,
            opacity: 0.0,
            color: Rgb::new(0, 0, 0),
            glyph: None,
        };
        particle.reset(rng, viewport);
        particle
    }

    /// Re-enter below the bottom edge with new random parameters.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R, viewport: Viewport) {
        self.x = rng.gen_range(0.0..1.0) * viewport.width;
        self.y = viewport.height + rng.gen_range(0.0..ENTRY_SPREAD);
        self.size = rng.gen_range(0.5..2.5);
        self.speed_y = -rng.gen_range(0.1..0.5);
        self.speed_x = rng.gen_range(-0.1..0.1);
        self.opacity = rng.gen_range(0.05..0.35);
        self.color = random_space_color(rng);
        self.glyph = rng
            .gen_bool(GLYPH_CHANCE)
            .then(|| PARTICLE_GLYPHS[rng.gen_range(0..PARTICLE_GLYPHS.len())]);
    }

    /// Font size used when the particle is drawn as a glyph.
    pub fn font_size(&self) -> f32 {
        10.0 + self.size * 3.0
    }

    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let at = Point::new(self.x, self.y);
        match self.glyph {
            Some(glyph) => surface.fill_text(
                at,
                glyph,
                self.font_size(),
                self.color.with_alpha(self.opacity * GLYPH_ALPHA_FACTOR),
            ),
            None => surface.fill_circle(at, self.size, self.color.with_alpha(self.opacity)),
        }
    }
}

/// Full-screen overlay of rising particles.
#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    viewport: Viewport,
    rng: StdRng,
}

impl ParticleField {
    /// Create the batch, spread over the full height so it starts populated.
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        let mut field = Self {
            particles: Vec::with_capacity(PARTICLE_COUNT),
            viewport,
            rng: StdRng::seed_from_u64(seed),
        };
        field.populate();
        field
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Adopt new bounds. Existing particles stay where they are.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Reseed the generator and repopulate the batch.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.populate();
    }

    fn populate(&mut self) {
        let viewport = self.viewport;
        let rng = &mut self.rng;
        self.particles.clear();
        self.particles.extend((0..PARTICLE_COUNT).map(|_| {
            let mut particle = Particle::spawn(rng, viewport);
            particle.y = rng.gen_range(0.0..1.0) * viewport.height;
            particle
        }));
    }

    /// Draw one frame and advance the animation.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear();
        let viewport = self.viewport;
        for particle in &mut self.particles {
            particle.y += particle.speed_y;
            particle.x += particle.speed_x;
            if particle.y < RECYCLE_EDGE {
                particle.reset(&mut self.rng, viewport);
            }
            particle.draw(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DisplayList, DrawCommand};

    #[test]
    fn test_init_count_and_spread() {
        let viewport = Viewport::new(800.0, 600.0);
        let field = ParticleField::new(viewport, 42);
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
        for p in field.particles() {
            assert!(viewport.contains(Point::new(p.x, p.y)), "{p:?}");
        }
        // Spread over the height, not bunched at the bottom.
        assert!(field.particles().iter().any(|p| p.y < 300.0));
    }

    #[test]
    fn test_spawn_enters_below_bottom() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let p = Particle::spawn(&mut rng, viewport);
            assert!(p.y >= 600.0 && p.y < 700.0);
            assert!(p.x >= 0.0 && p.x < 800.0);
            assert!(p.speed_y < 0.0 && p.speed_y >= -0.5);
            assert!(p.speed_x.abs() <= 0.1);
            assert!((0.05..0.35).contains(&p.opacity));
            assert!((0.5..2.5).contains(&p.size));
            if let Some(glyph) = p.glyph {
                assert!(PARTICLE_GLYPHS.contains(&glyph));
            }
        }
    }

    #[test]
    fn test_glyph_ratio() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(17);
        let glyphs = (0..2000)
            .filter(|_| Particle::spawn(&mut rng, viewport).glyph.is_some())
            .count();
        assert!((450..750).contains(&glyphs), "glyphs: {glyphs}");
    }

    #[test]
    fn test_particle_above_top_is_recycled() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut field = ParticleField::new(viewport, 5);
        field.particles[0].y = -19.95;
        field.particles[0].speed_y = -0.1;

        let mut list = DisplayList::new();
        field.step(&mut list);

        assert!(field.particles()[0].y >= viewport.height);
    }

    #[test]
    fn test_particles_rise() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut field = ParticleField::new(viewport, 8);
        for p in &mut field.particles {
            p.y = 300.0;
        }
        let mut list = DisplayList::new();
        field.step(&mut list);
        assert!(field.particles().iter().all(|p| p.y < 300.0));
        assert_eq!(list.len(), PARTICLE_COUNT);
    }

    #[test]
    fn test_draws_glyph_or_dot() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut field = ParticleField::new(viewport, 21);
        field.particles.truncate(2);
        field.particles[0].glyph = Some('{');
        field.particles[0].opacity = 0.3;
        field.particles[1].glyph = None;
        field.particles[1].opacity = 0.2;

        let mut list = DisplayList::new();
        field.step(&mut list);

        match list.commands() {
            [
                DrawCommand::Text {
                    glyph, size, color, ..
                },
                DrawCommand::Circle { color: dot, .. },
            ] => {
                assert_eq!(*glyph, '{');
                assert_eq!(*size, field.particles()[0].font_size());
                assert!((color.alpha - 0.15).abs() < 1e-6);
                assert!((dot.alpha - 0.2).abs() < 1e-6);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut field = ParticleField::new(Viewport::new(800.0, 600.0), 9);
        let before = field.particles().to_vec();

        field.resize(Viewport::new(400.0, 300.0));

        assert_eq!(field.particles(), &before[..]);
        assert_eq!(field.viewport(), Viewport::new(400.0, 300.0));
    }

    #[test]
    fn test_recycle_uses_new_bounds_after_resize() {
        let mut field = ParticleField::new(Viewport::new(800.0, 600.0), 9);
        field.resize(Viewport::new(400.0, 300.0));
        field.particles[0].y = -25.0;

        let mut list = DisplayList::new();
        field.step(&mut list);

        let p = &field.particles()[0];
        assert!(p.y >= 300.0 && p.y < 400.0);
        assert!(p.x < 400.0);
    }
}
