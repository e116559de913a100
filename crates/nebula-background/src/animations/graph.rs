//! Node graph over a twinkling starfield (stateful).
//!
//! Nodes drift, pulse, and bounce off the viewport edges. Every pair of nodes
//! closer than [`CONNECTION_DIST`] is joined by a faint gradient edge. The
//! pointer pushes nearby nodes away.

use std::f32::consts::TAU;

use nebula_core::{Point, Rgb, Viewport};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::color::{random_space_color, random_star_color};
use crate::surface::Surface;

/// Number of nodes in a batch.
pub const NODE_COUNT: usize = 75;
/// Number of stars in a batch.
pub const STAR_COUNT: usize = 120;
/// Maximum distance at which two nodes are joined by an edge.
pub const CONNECTION_DIST: f32 = 170.0;
/// Edge alpha at zero distance.
pub const EDGE_ALPHA_SCALE: f32 = 0.18;
/// Edge stroke width.
pub const EDGE_WIDTH: f32 = 0.6;
/// Pointer influence radius.
pub const REPULSION_RADIUS: f32 = 120.0;
/// Impulse at zero distance from the pointer.
pub const REPULSION_STRENGTH: f32 = 0.3;
/// Velocity damping applied after each impulse.
pub const REPULSION_DAMPING: f32 = 0.98;

const GLOW_RADIUS_OFFSET: f32 = 4.0;
const GLOW_ALPHA_FACTOR: f32 = 0.12;

/// A moving, pulsing graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Pulse phase in radians.
    pub pulse: f32,
    pub pulse_speed: f32,
    pub color: Rgb,
}

impl Node {
    /// A node at a uniformly random position inside the viewport.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        Self {
            x: unit(rng) * viewport.width,
            y: unit(rng) * viewport.height,
            vx: (unit(rng) - 0.5) * 0.35,
            vy: (unit(rng) - 0.5) * 0.35,
            radius: unit(rng) * 2.8 + 1.0,
            pulse: unit(rng) * TAU,
            pulse_speed: 0.01 + unit(rng) * 0.025,
            color: random_space_color(rng),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Current pulsing alpha, 0.0-0.7.
    pub fn alpha(&self) -> f32 {
        0.35 + 0.35 * self.pulse.sin()
    }

    /// Integrate one frame and reflect off the viewport edges.
    pub fn update(&mut self, viewport: Viewport) {
        self.x += self.vx;
        self.y += self.vy;
        self.pulse += self.pulse_speed;
        if self.x < 0.0 || self.x > viewport.width {
            self.vx = -self.vx;
        }
        if self.y < 0.0 || self.y > viewport.height {
            self.vy = -self.vy;
        }
    }

    /// Push the node away from `pointer` if it is within reach.
    pub fn repel_from(&mut self, pointer: Point) {
        let dx = self.x - pointer.x;
        let dy = self.y - pointer.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= 0.0 || dist >= REPULSION_RADIUS {
            return;
        }
        let force = repulsion_force(dist);
        self.vx += dx / dist * force;
        self.vy += dy / dist * force;
        self.vx *= REPULSION_DAMPING;
        self.vy *= REPULSION_DAMPING;
    }
}

/// A stationary, twinkling background star.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Twinkle phase in radians.
    pub twinkle: f32,
    pub twinkle_speed: f32,
    pub color: Rgb,
}

impl Star {
    /// A star at a uniformly random position inside the viewport.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        Self {
            x: unit(rng) * viewport.width,
            y: unit(rng) * viewport.height,
            size: unit(rng) * 1.5 + 0.3,
            twinkle: unit(rng) * TAU,
            twinkle_speed: 0.005 + unit(rng) * 0.02,
            color: random_star_color(rng),
        }
    }

    /// Current brightness, 0.2-0.8.
    pub fn brightness(&self) -> f32 {
        0.2 + 0.6 * self.twinkle.sin().abs()
    }
}

/// Edge alpha for two nodes `dist` apart, `None` when too far to connect.
pub fn edge_alpha(dist: f32) -> Option<f32> {
    (dist < CONNECTION_DIST).then(|| (1.0 - dist / CONNECTION_DIST) * EDGE_ALPHA_SCALE)
}

/// Repulsion impulse magnitude at `dist` from the pointer.
pub fn repulsion_force(dist: f32) -> f32 {
    if dist >= REPULSION_RADIUS {
        return 0.0;
    }
    (REPULSION_RADIUS - dist.max(0.0)) / REPULSION_RADIUS * REPULSION_STRENGTH
}

/// The node graph and starfield filling the hero area.
#[derive(Debug)]
pub struct GraphField {
    nodes: Vec<Node>,
    stars: Vec<Star>,
    viewport: Viewport,
    pointer: Option<Point>,
    rng: StdRng,
}

impl GraphField {
    /// Generate a field for `viewport`.
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        let mut field = Self {
            nodes: Vec::with_capacity(NODE_COUNT),
            stars: Vec::with_capacity(STAR_COUNT),
            viewport,
            pointer: None,
            rng: StdRng::seed_from_u64(seed),
        };
        field.regenerate();
        field
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Last known pointer position, if the pointer is over the field.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Adopt new bounds and regenerate both batches from scratch.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.regenerate();
    }

    /// Reseed the generator and regenerate both batches.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.regenerate();
    }

    fn regenerate(&mut self) {
        let viewport = self.viewport;
        let rng = &mut self.rng;
        self.nodes.clear();
        self.nodes
            .extend((0..NODE_COUNT).map(|_| Node::random(rng, viewport)));
        self.stars.clear();
        self.stars
            .extend((0..STAR_COUNT).map(|_| Star::random(rng, viewport)));
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "graph field regenerated"
        );
    }

    /// Pointer moved to `pointer` (field-local logical pixels).
    pub fn pointer_moved(&mut self, pointer: Point) {
        self.pointer = Some(pointer);
        for node in &mut self.nodes {
            node.repel_from(pointer);
        }
    }

    /// Pointer left the field.
    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    /// Draw one frame and advance the animation.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        for star in &mut self.stars {
            star.twinkle += star.twinkle_speed;
        }
        self.draw(surface);
        let viewport = self.viewport;
        for node in &mut self.nodes {
            node.update(viewport);
        }
    }

    /// Draw the current state without advancing it.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();

        for star in &self.stars {
            surface.fill_circle(
                Point::new(star.x, star.y),
                star.size,
                star.color.with_alpha(star.brightness()),
            );
        }

        for (i, a) in self.nodes.iter().enumerate() {
            for b in &self.nodes[i + 1..] {
                let dist = a.position().distance(b.position());
                if let Some(alpha) = edge_alpha(dist) {
                    surface.stroke_gradient_line(
                        a.position(),
                        b.position(),
                        EDGE_WIDTH,
                        a.color.with_alpha(alpha),
                        b.color.with_alpha(alpha),
                    );
                }
            }
        }

        for node in &self.nodes {
            let alpha = node.alpha();
            surface.fill_circle(node.position(), node.radius, node.color.with_alpha(alpha));
            surface.fill_circle(
                node.position(),
                node.radius + GLOW_RADIUS_OFFSET,
                node.color.with_alpha(alpha * GLOW_ALPHA_FACTOR),
            );
        }
    }
}

fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..1.0)
}
