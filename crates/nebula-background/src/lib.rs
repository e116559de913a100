//! Background animation rendering for nebula.
//!
//! This crate provides the two animated layers of the backdrop: a node graph
//! over a twinkling starfield that reacts to the pointer, and a full-screen
//! overlay of rising particles. Animations draw onto a [`Surface`]; the
//! [`SceneState`] records them into display lists and paints those onto a
//! ratatui frame.

pub mod animations;
mod chars;
mod clock;
mod color;
mod paint;
mod state;
mod surface;

pub use animations::graph::{GraphField, Node, Star};
pub use animations::particles::{Particle, ParticleField};
pub use chars::PARTICLE_GLYPHS;
pub use clock::FrameClock;
pub use color::SPACE_PALETTE;
pub use paint::paint_display_list;
pub use state::{SceneState, time_seed};
pub use surface::{DisplayList, DrawCommand, Surface};
