//! Stateful background animations.

pub mod graph;
pub mod particles;
