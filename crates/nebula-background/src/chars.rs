//! Character constants for background animations.

/// Glyphs a particle may carry instead of a dot.
pub const PARTICLE_GLYPHS: &[char] = &['0', '1', '{', '}', '<', '>', '/', '*'];
