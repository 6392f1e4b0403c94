//! Lane Runner -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Everything happens in
//! `RedrawRequested` using a fixed-timestep model (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. poll image decodes and upload whatever finished
//!   3. `while should_step()` -- apply this frame's intents once, then one
//!      `GameWorld` tick per step, syncing the HUD after each
//!   4. draw the world into a `DrawList`, batch it to quads, composite the HUD
//!
//! `runner_game --replay <file>` skips the window and runs a replay headlessly.

mod assets;
mod background;
mod collision;
mod entity;
mod error;
mod flow;
mod player;
mod render;
mod replay;
mod settings;
mod spawner;
mod world;

use std::path::Path;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{AssetStore, IMAGE_DIR};
use entity::EntityKind;
use replay::{load_replay_from_path, run_replay};
use runner_core::input::{InputState, Key};
use runner_core::time::TimeState;
use runner_hud::{DebugStats, HudOverlay, HudState};
use runner_platform::window::PlatformConfig;
use runner_render::{Camera2D, DrawList, GpuContext, GpuError, QuadRenderer};
use settings::{load_settings_or_default, GameSettings, SETTINGS_PATH};
use world::GameWorld;

struct GameApp {
    window: Arc<Window>,
    gpu: GpuContext,
    camera: Camera2D,
    renderer: QuadRenderer,
    hud_overlay: HudOverlay,
    hud: HudState,
    time: TimeState,
    input: InputState,
    world: GameWorld,
    assets: AssetStore,
    draw_list: DrawList,
}

impl GameApp {
    fn new(window: Arc<Window>, settings: GameSettings) -> Result<Self, GpuError> {
        let gpu = GpuContext::new(window.clone())?;
        let (playfield_w, playfield_h) = (settings.canvas_width as f32, settings.canvas_height as f32);
        let camera = Camera2D::new(playfield_w, playfield_h, gpu.size);
        let renderer = QuadRenderer::new(&gpu, &camera);
        let hud_overlay = HudOverlay::new(&gpu.device, gpu.surface_format, &window);

        Ok(Self {
            window,
            camera,
            renderer,
            hud_overlay,
            hud: HudState::new(),
            time: TimeState::new(),
            input: InputState::new(),
            world: GameWorld::new(settings),
            assets: AssetStore::new(Path::new(IMAGE_DIR)),
            draw_list: DrawList::new(playfield_w, playfield_h),
            gpu,
        })
    }

    fn simulate(&mut self) {
        self.time.begin_frame();

        let gpu = &self.gpu;
        let renderer = &mut self.renderer;
        self.assets
            .poll(|key, data| renderer.upload_texture(gpu, key, data));

        // Edges are consumed by the first step of the frame only, so a press
        // never repeats when a slow frame runs several steps.
        let mut pending_intents = self.input.intents();
        let mut toggle_debug = self.input.is_just_pressed(Key::F3);

        while self.time.should_step() {
            if std::mem::take(&mut toggle_debug) {
                self.hud_overlay.toggle_debug();
            }
            for intent in pending_intents.drain(..) {
                let outcome = flow::handle_intent(&mut self.world, &mut self.hud, intent);
                if outcome.resumed {
                    self.time.discard_accumulated();
                }
            }

            let report = flow::step(&mut self.world, &mut self.hud);
            if report.coins_collected > 0 || report.enemies_defeated > 0 {
                log::debug!(
                    "Tick {}: {} coins collected, {} enemies defeated",
                    self.world.state.frame_count,
                    report.coins_collected,
                    report.enemies_defeated
                );
            }
            if report.landed {
                log::trace!("Landed at tick {}", self.world.state.frame_count);
            }
        }

        // Only clear edge-triggered input after a step consumed it. Otherwise
        // a press that lands on a frame with 0 steps is silently lost.
        if self.time.steps_this_frame > 0 {
            self.input.end_frame();
        }
    }

    fn debug_stats(&self) -> DebugStats {
        let frame = self.renderer.stats();
        let count = |kind: EntityKind| self.world.entities(kind).len() as u32;
        DebugStats {
            frame_count: self.world.state.frame_count,
            difficulty: self.world.state.difficulty,
            distance: self.world.state.distance,
            obstacles: count(EntityKind::Obstacle),
            coins_on_field: count(EntityKind::Coin),
            enemies: count(EntityKind::Enemy),
            draw_calls: frame.draw_calls,
            texture_binds: frame.texture_binds,
            triangles: frame.triangles,
            memory_estimate_mb: self.renderer.estimate_memory_mb(),
            assets_ready: self.assets.ready_count() as u32,
            assets_total: self.assets.total() as u32,
            assets_loading: self.assets.is_pending(),
        }
    }

    fn render_frame(&mut self) {
        self.draw_list.reset();
        render::draw_world(&self.world, &self.assets, &mut self.draw_list);
        self.renderer
            .prepare(&self.gpu, &self.camera, &self.draw_list);

        let Some(frame) = self.gpu.acquire_frame() else {
            return;
        };

        let stats = self.debug_stats();
        let (egui_primitives, egui_textures_delta, actions) =
            self.hud_overlay
                .prepare(&self.window, &self.time, &self.hud, &stats);

        if actions.any() {
            let outcome = flow::apply_actions(&mut self.world, &mut self.hud, actions);
            if outcome.resumed {
                self.time.discard_accumulated();
            }
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &frame.view);

        self.hud_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.hud_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.hud_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

struct App {
    config: PlatformConfig,
    settings: GameSettings,
    state: Option<GameApp>,
}

impl App {
    fn new(settings: GameSettings) -> Self {
        Self {
            config: PlatformConfig::for_playfield(
                settings.canvas_width as u32,
                settings.canvas_height as u32,
                320,
                240,
            ),
            settings,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = runner_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        match GameApp::new(window, self.settings.clone()) {
            Ok(app) => self.state = Some(app),
            Err(e) => {
                log::error!("Graphics setup failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .hud_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let (w, h) = (physical_size.width, physical_size.height);
                state.gpu.resize(w, h);
                if w > 0 && h > 0 {
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.is_zero_sized() {
                    return;
                }
                state.simulate();
                state.render_frame();
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::KeyP => Some(Key::P),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn replay_path_arg(args: &[String]) -> Option<&str> {
    let index = args.iter().position(|a| a == "--replay")?;
    args.get(index + 1).map(String::as_str)
}

fn run_headless(path: &Path, settings: &GameSettings) -> Result<(), error::LoadError> {
    let replay = load_replay_from_path(path)?;
    log::info!(
        "Replaying {} ({} ticks, seed {})",
        path.display(),
        replay.tick_count(),
        replay.seed
    );
    let (_, outcome) = run_replay(&replay, settings);
    log::info!(
        "Replay finished after {} ticks: distance {:.1}, score {}, coins {}, {}",
        outcome.ticks,
        outcome.distance,
        outcome.score,
        outcome.coins,
        if outcome.game_over { "game over" } else { "still running" }
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Lane Runner starting...");

    let settings = match load_settings_or_default(Path::new(SETTINGS_PATH)) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--replay") {
        let Some(path) = replay_path_arg(&args) else {
            log::error!("--replay needs a file path");
            std::process::exit(2);
        };
        if let Err(err) = run_headless(Path::new(path), &settings) {
            log::error!("{err}");
            std::process::exit(1);
        }
        return;
    }

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings);
    event_loop.run_app(&mut app).expect("Event loop error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bound_key_maps() {
        assert_eq!(map_key(KeyCode::KeyA), Some(Key::A));
        assert_eq!(map_key(KeyCode::NumpadEnter), Some(Key::Enter));
        assert_eq!(map_key(KeyCode::KeyP), Some(Key::P));
        assert_eq!(map_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn replay_flag_takes_the_next_argument() {
        let args: Vec<String> = ["runner_game", "--replay", "run.json"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(replay_path_arg(&args), Some("run.json"));
        let bare: Vec<String> = vec!["runner_game".into(), "--replay".into()];
        assert_eq!(replay_path_arg(&bare), None);
    }
}
