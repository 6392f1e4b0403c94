//! HUD model and the egui widgets that present it.
//!
//! [`HudState`] is the game's [`UiShell`]: the app writes readouts and panel
//! visibility into it, and the widgets below read it back when the overlay
//! builds its frame. Button clicks travel the other way as [`ShellActions`].

use runner_core::shell::{Panel, ShellActions, UiShell};

#[derive(Debug, Clone, Default)]
pub struct HudState {
    pub score: u64,
    pub coins: u32,
    pub final_score: u64,
    pub final_coins: u32,
    start_visible: bool,
    pause_visible: bool,
    game_over_visible: bool,
}

impl HudState {
    /// Fresh HUD showing the title screen.
    pub fn new() -> Self {
        Self {
            start_visible: true,
            ..Self::default()
        }
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::Start => self.start_visible,
            Panel::Pause => self.pause_visible,
            Panel::GameOver => self.game_over_visible,
        }
    }

    /// True when no modal panel covers the playfield.
    pub fn is_playing_view(&self) -> bool {
        Panel::ALL.iter().all(|&p| !self.is_visible(p))
    }
}

impl UiShell for HudState {
    fn set_score(&mut self, score: u64) {
        self.score = score;
    }

    fn set_coins(&mut self, coins: u32) {
        self.coins = coins;
    }

    fn set_final_result(&mut self, score: u64, coins: u32) {
        self.final_score = score;
        self.final_coins = coins;
    }

    fn set_panel_visible(&mut self, panel: Panel, visible: bool) {
        let slot = match panel {
            Panel::Start => &mut self.start_visible,
            Panel::Pause => &mut self.pause_visible,
            Panel::GameOver => &mut self.game_over_visible,
        };
        if *slot != visible {
            log::debug!(
                "Panel '{}' {}",
                panel.label(),
                if visible { "shown" } else { "hidden" }
            );
        }
        *slot = visible;
    }
}

/// Simulation and renderer numbers for the F3 window.
#[derive(Debug, Clone, Default)]
pub struct DebugStats {
    pub frame_count: u64,
    pub difficulty: f64,
    pub distance: f64,
    pub obstacles: u32,
    pub coins_on_field: u32,
    pub enemies: u32,
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub triangles: u32,
    pub memory_estimate_mb: f32,
    /// Images decoded and uploaded, out of `assets_total`.
    pub assets_ready: u32,
    pub assets_total: u32,
    pub assets_loading: bool,
}

const CONTROLS_HELP: &str = "Left/Right or A/D: change lane\nUp/W/Space: jump\nP: pause  Esc: quit";

pub(crate) fn score_bar(ctx: &egui::Context, hud: &HudState, actions: &mut ShellActions) {
    egui::Area::new(egui::Id::new("score_bar"))
        .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(format!("Score: {}", hud.score)).strong());
                    ui.separator();
                    ui.label(egui::RichText::new(format!("Coins: {}", hud.coins)).strong());
                    if hud.is_playing_view() && ui.button("Pause").clicked() {
                        actions.pause = true;
                    }
                });
            });
        });
}

pub(crate) fn modal_panels(ctx: &egui::Context, hud: &HudState, actions: &mut ShellActions) {
    if hud.is_visible(Panel::Start) {
        centered_window(ctx, "Lane Runner", |ui| {
            ui.label(CONTROLS_HELP);
            ui.add_space(8.0);
            if ui.button("Start").clicked() {
                actions.start = true;
            }
        });
    }

    if hud.is_visible(Panel::Pause) {
        centered_window(ctx, "Paused", |ui| {
            ui.horizontal(|ui| {
                if ui.button("Resume").clicked() {
                    actions.resume = true;
                }
                if ui.button("Quit").clicked() {
                    actions.quit = true;
                }
            });
        });
    }

    if hud.is_visible(Panel::GameOver) {
        centered_window(ctx, "Game Over", |ui| {
            ui.label(format!("Final score: {}", hud.final_score));
            ui.label(format!("Coins: {}", hud.final_coins));
            ui.add_space(8.0);
            if ui.button("Restart").clicked() {
                actions.restart = true;
            }
        });
    }
}

fn centered_window(ctx: &egui::Context, title: &str, body: impl FnOnce(&mut egui::Ui)) {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, body);
}
