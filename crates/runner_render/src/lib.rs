pub mod batch;
pub mod camera;
pub mod draw_list;
pub mod gpu_context;
pub mod renderer;
pub mod sprite_pipeline;
pub mod texture;

pub use batch::{SpriteVertex, WHITE_TEXTURE};
pub use camera::{Camera2D, CameraUniform};
pub use draw_list::{hex_color, Color, DrawCommand, DrawList, DrawSurface, ScreenRect};
pub use gpu_context::{GpuContext, GpuError, SurfaceFrame};
pub use renderer::{FrameStats, QuadRenderer};
pub use sprite_pipeline::SpritePipeline;
pub use texture::{Texture, TextureData};
