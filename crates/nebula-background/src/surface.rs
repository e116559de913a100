//! Drawing surface abstraction and a recording implementation.

use nebula_core::{Point, Rgba};

/// A 2D surface the animations draw on, in logical pixels.
pub trait Surface {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Filled circle.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba);

    /// Straight line whose color runs linearly from `start` to `end`.
    fn stroke_gradient_line(&mut self, from: Point, to: Point, width: f32, start: Rgba, end: Rgba);

    /// A single glyph rendered as text.
    fn fill_text(&mut self, at: Point, glyph: char, size: f32, color: Rgba);
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    GradientLine {
        from: Point,
        to: Point,
        width: f32,
        start: Rgba,
        end: Rgba,
    },
    Text {
        at: Point,
        glyph: char,
        size: f32,
        color: Rgba,
    },
}

impl DrawCommand {
    /// Highest alpha the command paints with.
    pub fn alpha(&self) -> f32 {
        match self {
            DrawCommand::Circle { color, .. } | DrawCommand::Text { color, .. } => color.alpha,
            DrawCommand::GradientLine { start, end, .. } => start.alpha.max(end.alpha),
        }
    }
}

/// Surface that records commands for later painting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in drawing order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for DisplayList {
    fn clear(&mut self) {
        self.commands.clear();
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_gradient_line(&mut self, from: Point, to: Point, width: f32, start: Rgba, end: Rgba) {
        self.commands.push(DrawCommand::GradientLine {
            from,
            to,
            width,
            start,
            end,
        });
    }

    fn fill_text(&mut self, at: Point, glyph: char, size: f32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            at,
            glyph,
            size,
            color,
        });
    }
}
