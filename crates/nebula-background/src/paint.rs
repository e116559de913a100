//! Painting display lists into a terminal buffer.
//!
//! Shapes are drawn on a braille canvas, giving 2x4 dots per cell. A braille
//! cell holds one color, so commands are painted dimmest first and the
//! brightest shape touching a cell decides its color.

use nebula_core::{Point, Rgba, Viewport};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{
        Widget,
        canvas::{Canvas, Context, Line as CanvasLine, Points},
    },
};

use crate::surface::{DisplayList, DrawCommand};

/// Commands dimmer than this are invisible on a black background.
const MIN_VISIBLE_ALPHA: f32 = 0.01;
/// Logical length of one gradient segment.
const GRADIENT_SEGMENT_LEN: f32 = 16.0;
const MAX_GRADIENT_SEGMENTS: usize = 32;

/// Paint `list`, drawn for `viewport`, into `area` of `buf`.
pub fn paint_display_list(list: &DisplayList, viewport: Viewport, area: Rect, buf: &mut Buffer) {
    if area.is_empty() || viewport.width <= 0.0 || viewport.height <= 0.0 {
        return;
    }

    let mut commands: Vec<&DrawCommand> = list
        .commands()
        .iter()
        .filter(|cmd| cmd.alpha() >= MIN_VISIBLE_ALPHA)
        .collect();
    commands.sort_by(|a, b| a.alpha().total_cmp(&b.alpha()));

    let mapping = Mapping {
        height: viewport.height,
        dot_width: viewport.width / (area.width as f32 * 2.0),
        dot_height: viewport.height / (area.height as f32 * 4.0),
    };

    Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, viewport.width as f64])
        .y_bounds([0.0, viewport.height as f64])
        .paint(|ctx| {
            for command in &commands {
                paint_command(ctx, command, &mapping);
            }
        })
        .render(area, buf);
}

/// Conversion from logical pixels (y down) to canvas space (y up).
struct Mapping {
    height: f32,
    dot_width: f32,
    dot_height: f32,
}

impl Mapping {
    fn to_canvas(&self, point: Point) -> (f64, f64) {
        (point.x as f64, (self.height - point.y) as f64)
    }

    /// Dot positions covering a filled disc.
    fn disc(&self, center: Point, radius: f32) -> Vec<(f64, f64)> {
        let mut coords = vec![self.to_canvas(center)];
        let steps_x = (radius / self.dot_width).floor() as i32;
        let steps_y = (radius / self.dot_height).floor() as i32;
        for iy in -steps_y..=steps_y {
            for ix in -steps_x..=steps_x {
                if ix == 0 && iy == 0 {
                    continue;
                }
                let dx = ix as f32 * self.dot_width;
                let dy = iy as f32 * self.dot_height;
                if dx * dx + dy * dy <= radius * radius {
                    coords.push(self.to_canvas(Point::new(center.x + dx, center.y + dy)));
                }
            }
        }
        coords
    }
}

fn paint_command(ctx: &mut Context, command: &DrawCommand, mapping: &Mapping) {
    match command {
        DrawCommand::Circle {
            center,
            radius,
            color,
        } => {
            let coords = mapping.disc(*center, *radius);
            ctx.draw(&Points {
                coords: &coords,
                color: color.to_color(),
            });
        }
        DrawCommand::GradientLine {
            from,
            to,
            start,
            end,
            ..
        } => paint_gradient_line(ctx, *from, *to, *start, *end, mapping),
        DrawCommand::Text {
            at, glyph, color, ..
        } => {
            let (x, y) = mapping.to_canvas(*at);
            ctx.print(
                x,
                y,
                Span::styled(glyph.to_string(), Style::new().fg(color.to_color())),
            );
        }
    }
}

fn paint_gradient_line(
    ctx: &mut Context,
    from: Point,
    to: Point,
    start: Rgba,
    end: Rgba,
    mapping: &Mapping,
) {
    let segments = ((from.distance(to) / GRADIENT_SEGMENT_LEN).ceil() as usize)
        .clamp(1, MAX_GRADIENT_SEGMENTS);
    let lerp = |t: f32| Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);

    for i in 0..segments {
        let t0 = i as f32 / segments as f32;
        let t1 = (i + 1) as f32 / segments as f32;
        let (x1, y1) = mapping.to_canvas(lerp(t0));
        let (x2, y2) = mapping.to_canvas(lerp(t1));
        let color = start.lerp(end, (t0 + t1) / 2.0);
        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color.to_color()));
    }
}
