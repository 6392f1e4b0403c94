//! Owns the GPU side of a frame: textures, mesh buffers and the sprite pass.
//!
//! Per frame the app records a [`DrawList`], hands it to [`QuadRenderer::prepare`]
//! (mesh build + buffer upload), then calls [`QuadRenderer::render`] inside its
//! command encoder. Buffers grow to the next power of two and never shrink.

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::batch::{build_mesh, DrawCall, SpriteVertex, WHITE_TEXTURE};
use crate::camera::Camera2D;
use crate::draw_list::{Color, DrawList};
use crate::gpu_context::GpuContext;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::{Texture, TextureData};

/// Shown around the playfield when the window aspect does not match.
const LETTERBOX_COLOR: Color = [0.05, 0.05, 0.08, 1.0];

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Counters surfaced in the debug window.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub triangles: u32,
    pub textures: u32,
}

pub struct QuadRenderer {
    pipeline: SpritePipeline,
    textures: HashMap<Arc<str>, GpuSpriteTexture>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    vertex_capacity: usize,
    index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    stats: FrameStats,
}

impl QuadRenderer {
    pub fn new(gpu: &GpuContext, camera: &Camera2D) -> Self {
        let pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let mut renderer = Self {
            vertex_buffer: create_vertex_buffer(&gpu.device, 1),
            index_buffer: create_index_buffer(&gpu.device, 1),
            pipeline,
            textures: HashMap::new(),
            camera_buffer,
            camera_bind_group,
            vertex_capacity: 1,
            index_capacity: 1,
            draw_calls: Vec::new(),
            stats: FrameStats::default(),
        };
        renderer.upload_texture(gpu, WHITE_TEXTURE, &TextureData::solid([255; 4]));
        renderer
    }

    /// Upload (or replace) the texture stored under `key`.
    pub fn upload_texture(&mut self, gpu: &GpuContext, key: &str, data: &TextureData) {
        let texture = Texture::from_data(&gpu.device, &gpu.queue, data, key);
        let bind_group = self
            .pipeline
            .create_texture_bind_group(&gpu.device, &texture);
        let replaced = self
            .textures
            .insert(
                Arc::from(key),
                GpuSpriteTexture {
                    texture,
                    bind_group,
                },
            )
            .is_some();
        log::debug!(
            "Texture '{}' {} ({}x{})",
            key,
            if replaced { "replaced" } else { "uploaded" },
            data.width,
            data.height
        );
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn estimate_memory_mb(&self) -> f32 {
        let mut bytes: usize = 0;
        for tex in self.textures.values() {
            let (w, h) = tex.texture.size;
            bytes += (w as usize) * (h as usize) * 4;
        }
        bytes += self.vertex_capacity * std::mem::size_of::<SpriteVertex>();
        bytes += self.index_capacity * std::mem::size_of::<u32>();
        bytes as f32 / (1024.0 * 1024.0)
    }

    /// Build this frame's mesh from `list` and stream it to the GPU.
    pub fn prepare(&mut self, gpu: &GpuContext, camera: &Camera2D, list: &DrawList) {
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.build_uniform()]),
        );

        let mesh = build_mesh(list);
        self.ensure_capacity(&gpu.device, mesh.vertices.len(), mesh.indices.len());
        if !mesh.vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        }
        if !mesh.indices.is_empty() {
            gpu.queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }

        self.stats = FrameStats {
            draw_calls: mesh.draw_calls.len() as u32,
            texture_binds: count_texture_binds(&mesh.draw_calls) as u32,
            triangles: mesh.primitive_count() as u32,
            textures: self.textures.len() as u32,
        };
        self.draw_calls = mesh.draw_calls;
    }

    /// Record the sprite pass over a window cleared to the letterbox color.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Playfield Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(to_wgpu_color(LETTERBOX_COLOR)),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        render_pass.set_pipeline(&self.pipeline.render_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        let mut last_bound_texture_key: Option<&Arc<str>> = None;
        for draw in &self.draw_calls {
            let Some(texture) = self.textures.get(&draw.texture_key) else {
                log::trace!("Skipping draw with unknown texture '{}'", draw.texture_key);
                continue;
            };
            let need_rebind = match last_bound_texture_key {
                Some(last) => **last != *draw.texture_key,
                None => true,
            };
            if need_rebind {
                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                last_bound_texture_key = Some(&draw.texture_key);
            }
            render_pass.draw_indexed(
                draw.index_start..(draw.index_start + draw.index_count),
                0,
                0..1,
            );
        }
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, vertex_count: usize, index_count: usize) {
        if vertex_count > self.vertex_capacity {
            self.vertex_capacity = vertex_count.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }
        if index_count > self.index_capacity {
            self.index_capacity = index_count.next_power_of_two();
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Playfield Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(4) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Playfield Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn to_wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color[0] as f64,
        g: color[1] as f64,
        b: color[2] as f64,
        a: color[3] as f64,
    }
}

fn count_texture_binds(draw_calls: &[DrawCall]) -> usize {
    let mut binds = 0;
    let mut last: Option<&str> = None;
    for draw in draw_calls {
        if last != Some(&*draw.texture_key) {
            binds += 1;
            last = Some(&draw.texture_key);
        }
    }
    binds
}
