//! CPU-side mesh building: draw list in, vertices + indices + draw calls out.
//!
//! Every primitive becomes textured triangles. Solid fills sample a 1x1 white
//! texture tinted by vertex color, so a frame of rects, circles and images
//! collapses into a handful of `draw_indexed` calls: consecutive primitives
//! that share a texture merge into one call.

use std::sync::Arc;

use crate::draw_list::{Color, DrawCommand, DrawList, DrawSurface, ScreenRect};

/// Texture key of the built-in 1x1 white texture used for solid fills.
pub const WHITE_TEXTURE: &str = "__white";

/// Segments used to approximate a filled circle.
const CIRCLE_SEGMENTS: u32 = 24;

const OPAQUE_WHITE: Color = [1.0, 1.0, 1.0, 1.0];

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl SpriteVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl Mesh {
    pub fn primitive_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Build the frame mesh from recorded commands. A clear becomes a quad over the
/// whole playfield so the letterbox area around it keeps its own color.
pub fn build_mesh(list: &DrawList) -> Mesh {
    let white: Arc<str> = Arc::from(WHITE_TEXTURE);
    let mut mesh = Mesh {
        vertices: Vec::with_capacity(list.len() * 4),
        indices: Vec::with_capacity(list.len() * 6),
        draw_calls: Vec::with_capacity(8),
    };

    let (width, height) = list.size();
    for command in list.commands() {
        match command {
            DrawCommand::Clear(color) => {
                add_quad(&mut mesh, &white, ScreenRect::new(0.0, 0.0, width, height), *color);
            }
            DrawCommand::FillRect { rect, color } => {
                add_quad(&mut mesh, &white, *rect, *color);
            }
            DrawCommand::FillCircle {
                center_x,
                center_y,
                radius,
                color,
            } => {
                add_circle(&mut mesh, &white, *center_x, *center_y, *radius, *color);
            }
            DrawCommand::Image { texture_key, rect } => {
                add_quad(&mut mesh, texture_key, *rect, OPAQUE_WHITE);
            }
        }
    }

    mesh
}

fn add_quad(mesh: &mut Mesh, texture_key: &Arc<str>, rect: ScreenRect, color: Color) {
    let base_index = mesh.vertices.len() as u32;
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.x + rect.w, rect.y + rect.h);

    // Playfield y grows downward, so v=0 sits on the top edge.
    mesh.vertices.extend_from_slice(&[
        SpriteVertex {
            position: [left, top],
            tex_coords: [0.0, 0.0],
            color,
        },
        SpriteVertex {
            position: [right, top],
            tex_coords: [1.0, 0.0],
            color,
        },
        SpriteVertex {
            position: [right, bottom],
            tex_coords: [1.0, 1.0],
            color,
        },
        SpriteVertex {
            position: [left, bottom],
            tex_coords: [0.0, 1.0],
            color,
        },
    ]);

    let draw_start = mesh.indices.len() as u32;
    mesh.indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);

    push_draw_call(&mut mesh.draw_calls, texture_key, draw_start, 6);
}

fn add_circle(
    mesh: &mut Mesh,
    texture_key: &Arc<str>,
    center_x: f32,
    center_y: f32,
    radius: f32,
    color: Color,
) {
    let center_index = mesh.vertices.len() as u32;
    mesh.vertices.push(SpriteVertex {
        position: [center_x, center_y],
        tex_coords: [0.5, 0.5],
        color,
    });
    for i in 0..CIRCLE_SEGMENTS {
        let angle = (i as f32 / CIRCLE_SEGMENTS as f32) * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        mesh.vertices.push(SpriteVertex {
            position: [center_x + cos * radius, center_y + sin * radius],
            tex_coords: [0.5 + cos * 0.5, 0.5 + sin * 0.5],
            color,
        });
    }

    let draw_start = mesh.indices.len() as u32;
    for i in 0..CIRCLE_SEGMENTS {
        let a = center_index + 1 + i;
        let b = center_index + 1 + (i + 1) % CIRCLE_SEGMENTS;
        mesh.indices.extend_from_slice(&[center_index, a, b]);
    }

    push_draw_call(
        &mut mesh.draw_calls,
        texture_key,
        draw_start,
        CIRCLE_SEGMENTS * 3,
    );
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: &Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == **texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key: Arc::clone(texture_key),
        index_start,
        index_count,
    });
}
