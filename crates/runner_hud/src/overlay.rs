//! egui overlay drawn on top of the playfield: score bar, modal panels, and the
//! F3 debug window.
//!
//! egui needs a three-phase render split because `egui_wgpu::Renderer::render()`
//! wants a `RenderPass<'static>` while `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers
//!   3. `paint()`   -- render into a new pass created with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use runner_core::shell::ShellActions;
use runner_core::time::TimeState;
use winit::window::Window;

use crate::panels::{modal_panels, score_bar, DebugStats, HudState};

pub struct HudOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
}

impl HudOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            debug_visible: false,
        }
    }

    /// Returns true when egui wants the event (e.g. a click on a button).
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug window: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        hud: &HudState,
        stats: &DebugStats,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        ShellActions,
    ) {
        let mut actions = ShellActions::default();
        let debug_visible = self.debug_visible;
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            score_bar(ctx, hud, &mut actions);
            modal_panels(ctx, hud, &mut actions);
            if debug_visible {
                debug_window(ctx, time, stats);
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn debug_window(ctx: &egui::Context, time: &TimeState, stats: &DebugStats) {
    egui::Window::new("Debug")
        .default_pos([10.0, 60.0])
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.1}", time.smoothed_fps));
            ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
            ui.label(format!("Steps this frame: {}", time.steps_this_frame));
            ui.separator();
            ui.label(format!("Tick: {}", stats.frame_count));
            ui.label(format!("Difficulty: {:.4}", stats.difficulty));
            ui.label(format!("Distance: {:.0}", stats.distance));
            ui.label(format!(
                "Entities: {} obstacles / {} coins / {} enemies",
                stats.obstacles, stats.coins_on_field, stats.enemies
            ));
            ui.separator();
            ui.label(format!(
                "Draw calls: {} ({} binds)",
                stats.draw_calls, stats.texture_binds
            ));
            ui.label(format!("Triangles: {}", stats.triangles));
            ui.label(format!("Memory: {:.1} MB", stats.memory_estimate_mb));
            ui.label(format!(
                "Images ready: {}/{}{}",
                stats.assets_ready,
                stats.assets_total,
                if stats.assets_loading { " (loading)" } else { "" }
            ));
        });
}
