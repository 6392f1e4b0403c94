//! Immediate-style drawing surface and a recorder that implements it.
//!
//! Game code draws every tick through [`DrawSurface`] using playfield
//! coordinates (origin top-left, y grows downward). [`DrawList`] records the
//! calls so the GPU batcher can turn them into quads later in the frame, and
//! so tests can assert on exactly what was drawn without a GPU.

use std::sync::Arc;

/// Linear RGBA color in `0.0..=1.0`.
pub type Color = [f32; 4];

/// Parse a `#RRGGBB` hex literal into a color. Invalid input yields magenta
/// so a typo is visible on screen instead of silently black.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return [1.0, 0.0, 1.0, 1.0];
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map(|v| v as f32 / 255.0)
            .unwrap_or(0.0)
    };
    [channel(0..2), channel(2..4), channel(4..6), 1.0]
}

/// Axis-aligned rectangle in playfield units, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ScreenRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
}

pub trait DrawSurface {
    /// Size of the drawable area in playfield units.
    fn size(&self) -> (f32, f32);
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: ScreenRect, color: Color);
    fn fill_circle(&mut self, center_x: f32, center_y: f32, radius: f32, color: Color);
    /// `texture_key` names a texture the renderer already holds.
    fn draw_image(&mut self, texture_key: &Arc<str>, rect: ScreenRect);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect {
        rect: ScreenRect,
        color: Color,
    },
    FillCircle {
        center_x: f32,
        center_y: f32,
        radius: f32,
        color: Color,
    },
    Image {
        texture_key: Arc<str>,
        rect: ScreenRect,
    },
}

/// Records draw calls for one frame.
#[derive(Debug, Clone)]
pub struct DrawList {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::with_capacity(64),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Drop last frame's commands, keeping the allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl DrawSurface for DrawList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        // Anything recorded before a clear would be painted over anyway.
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_circle(&mut self, center_x: f32, center_y: f32, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center_x,
            center_y,
            radius,
            color,
        });
    }

    fn draw_image(&mut self, texture_key: &Arc<str>, rect: ScreenRect) {
        self.commands.push(DrawCommand::Image {
            texture_key: Arc::clone(texture_key),
            rect,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_parses_rgb() {
        let c = hex_color("#FF0000");
        assert_eq!(c, [1.0, 0.0, 0.0, 1.0]);
        let sky = hex_color("#87CEEB");
        assert!((sky[0] - 135.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn hex_color_flags_bad_input_as_magenta() {
        assert_eq!(hex_color("#123"), [1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn hex_color_rejects_multibyte_input() {
        // Six bytes, but the two-byte char straddles a channel boundary.
        assert_eq!(hex_color("#1é234"), [1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn clear_discards_earlier_commands() {
        let mut list = DrawList::new(800.0, 600.0);
        list.fill_rect(ScreenRect::new(0.0, 0.0, 10.0, 10.0), [1.0; 4]);
        list.clear([0.0, 0.0, 0.0, 1.0]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.commands()[0], DrawCommand::Clear([0.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn records_in_call_order() {
        let mut list = DrawList::new(800.0, 600.0);
        let key: Arc<str> = Arc::from("coin");
        list.clear([0.0; 4]);
        list.draw_image(&key, ScreenRect::new(1.0, 2.0, 3.0, 4.0));
        list.fill_circle(5.0, 5.0, 2.0, [1.0; 4]);
        assert!(matches!(list.commands()[1], DrawCommand::Image { .. }));
        assert!(matches!(list.commands()[2], DrawCommand::FillCircle { .. }));
        list.reset();
        assert!(list.is_empty());
        assert_eq!(list.size(), (800.0, 600.0));
    }

    #[test]
    fn rect_center() {
        assert_eq!(ScreenRect::new(10.0, 20.0, 30.0, 40.0).center(), (25.0, 40.0));
    }
}
