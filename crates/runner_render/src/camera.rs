use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Fits a fixed-size playfield into the window, preserving aspect ratio.
///
/// Playfield coordinates have their origin at the top-left corner with y
/// growing downward. Whatever window area the playfield does not cover is
/// left as letterbox around it.
pub struct Camera2D {
    pub playfield: Vec2,
    pub viewport: (u32, u32),
}

impl Camera2D {
    pub fn new(playfield_width: f32, playfield_height: f32, viewport: (u32, u32)) -> Self {
        Self {
            playfield: Vec2::new(playfield_width, playfield_height),
            viewport,
        }
    }

    /// Window pixels per playfield unit.
    pub fn scale(&self) -> f32 {
        let sx = self.viewport.0.max(1) as f32 / self.playfield.x.max(1.0);
        let sy = self.viewport.1.max(1) as f32 / self.playfield.y.max(1.0);
        sx.min(sy)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        let scale = self.scale();
        let half_w = self.viewport.0.max(1) as f32 / (2.0 * scale);
        let half_h = self.viewport.1.max(1) as f32 / (2.0 * scale);
        let center = self.playfield * 0.5;

        // bottom/top swapped relative to a y-up camera.
        Mat4::orthographic_rh(
            center.x - half_w,
            center.x + half_w,
            center.y + half_h,
            center.y - half_h,
            -1.0,
            1.0,
        )
    }
}
