use egui::{Align2, Color32, FontFamily, FontId, Painter, Pos2, Shape, Stroke};
use glam::Vec2;

use crate::renderer::frame::DrawCommand;

const LABEL_FONT_SIZE: f32 = 18.0;

/// The primitives a frame needs from whatever ends up showing it.
pub trait DrawSurface {
    fn line(&mut self, from: Vec2, to: Vec2, color: Color32, width: f32);
    fn polygon(&mut self, points: &[Vec2], fill: Color32);
    fn circle(&mut self, center: Vec2, radius: f32, color: Color32);
    fn label(&mut self, pos: Vec2, text: &str, color: Color32);
}

pub fn replay(commands: &[DrawCommand], surface: &mut impl DrawSurface) {
    for command in commands {
        match command {
            DrawCommand::Line {
                from,
                to,
                color,
                width,
            } => surface.line(*from, *to, *color, *width),
            DrawCommand::Polygon { points, fill } => surface.polygon(points, *fill),
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => surface.circle(*center, *radius, *color),
            DrawCommand::Label { pos, text, color } => surface.label(*pos, text, *color),
        }
    }
}

/// Draws onto an egui layer. Scene coordinates are physical pixels, egui
/// works in points.
pub struct EguiCanvas<'a> {
    painter: &'a Painter,
    pixels_per_point: f32,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a Painter, pixels_per_point: f32) -> Self {
        Self {
            painter,
            pixels_per_point: pixels_per_point.max(f32::EPSILON),
        }
    }

    fn pos(&self, p: Vec2) -> Pos2 {
        Pos2::new(p.x / self.pixels_per_point, p.y / self.pixels_per_point)
    }
}

impl DrawSurface for EguiCanvas<'_> {
    fn line(&mut self, from: Vec2, to: Vec2, color: Color32, width: f32) {
        self.painter.line_segment(
            [self.pos(from), self.pos(to)],
            Stroke::new(width / self.pixels_per_point, color),
        );
    }

    fn polygon(&mut self, points: &[Vec2], fill: Color32) {
        let points = points.iter().map(|p| self.pos(*p)).collect();
        self.painter
            .add(Shape::convex_polygon(points, fill, Stroke::NONE));
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color32) {
        self.painter
            .circle_filled(self.pos(center), radius / self.pixels_per_point, color);
    }

    fn label(&mut self, pos: Vec2, text: &str, color: Color32) {
        self.painter.text(
            self.pos(pos),
            Align2::LEFT_TOP,
            text,
            FontId::new(LABEL_FONT_SIZE, FontFamily::Monospace),
            color,
        );
    }
}
