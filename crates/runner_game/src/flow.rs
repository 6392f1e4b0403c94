//! Session transitions and HUD sync.
//!
//! The world only knows running/paused/game-over flags. These functions are
//! the single place where a flag change is paired with the matching panel
//! change on the [`UiShell`], and where per-tick readouts are pushed out.

use runner_core::input::Intent;
use runner_core::shell::{Panel, ShellActions, UiShell};

use crate::world::{GameWorld, TickReport};

/// What the app should do after a session call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlowOutcome {
    /// Ticking resumed after a pause; banked frame time should be dropped.
    pub resumed: bool,
}

pub fn start(world: &mut GameWorld, shell: &mut dyn UiShell) {
    shell.set_panel_visible(Panel::Start, false);
    begin_run(world, shell);
    log::info!("Run started");
}

pub fn restart(world: &mut GameWorld, shell: &mut dyn UiShell) {
    shell.set_panel_visible(Panel::GameOver, false);
    begin_run(world, shell);
    log::info!("Run restarted");
}

fn begin_run(world: &mut GameWorld, shell: &mut dyn UiShell) {
    world.reset();
    world.state.running = true;
    sync_readouts(world, shell);
}

pub fn toggle_pause(world: &mut GameWorld, shell: &mut dyn UiShell) -> FlowOutcome {
    if !world.state.running {
        return FlowOutcome::default();
    }
    if world.state.paused {
        resume(world, shell)
    } else {
        pause(world, shell);
        FlowOutcome::default()
    }
}

pub fn pause(world: &mut GameWorld, shell: &mut dyn UiShell) {
    if !world.state.running || world.state.paused {
        return;
    }
    world.state.paused = true;
    shell.set_panel_visible(Panel::Pause, true);
    log::info!("Paused at tick {}", world.state.frame_count);
}

pub fn resume(world: &mut GameWorld, shell: &mut dyn UiShell) -> FlowOutcome {
    let was_paused = world.state.paused;
    world.state.paused = false;
    shell.set_panel_visible(Panel::Pause, false);
    if was_paused {
        log::info!("Resumed");
    }
    FlowOutcome {
        resumed: was_paused,
    }
}

/// Abandon the run and go back to the title screen.
pub fn quit(world: &mut GameWorld, shell: &mut dyn UiShell) {
    world.state.running = false;
    world.state.paused = false;
    shell.set_panel_visible(Panel::Pause, false);
    shell.set_panel_visible(Panel::GameOver, false);
    shell.set_panel_visible(Panel::Start, true);
    world.reset();
    sync_readouts(world, shell);
    log::info!("Quit to title");
}

/// Route one keyboard intent: session intents drive the transitions above,
/// the rest go to the player.
pub fn handle_intent(world: &mut GameWorld, shell: &mut dyn UiShell, intent: Intent) -> FlowOutcome {
    match intent {
        Intent::TogglePause => toggle_pause(world, shell),
        Intent::Start => {
            if world.state.game_over {
                restart(world, shell);
            } else if !world.state.running {
                start(world, shell);
            }
            FlowOutcome::default()
        }
        Intent::Quit => {
            if world.state.running || world.state.game_over {
                quit(world, shell);
            }
            FlowOutcome::default()
        }
        Intent::MoveLeft | Intent::MoveRight | Intent::Jump => {
            world.apply_intent(intent);
            FlowOutcome::default()
        }
    }
}

/// Route HUD button clicks. Buttons only exist on the panel they belong to,
/// so each maps straight to its transition.
pub fn apply_actions(
    world: &mut GameWorld,
    shell: &mut dyn UiShell,
    actions: ShellActions,
) -> FlowOutcome {
    let mut outcome = FlowOutcome::default();
    if actions.start {
        start(world, shell);
    }
    if actions.restart {
        restart(world, shell);
    }
    if actions.pause {
        pause(world, shell);
    }
    if actions.resume {
        outcome.resumed |= resume(world, shell).resumed;
    }
    if actions.quit {
        quit(world, shell);
    }
    outcome
}

/// Advance the world one tick and push the results to the HUD.
pub fn step(world: &mut GameWorld, shell: &mut dyn UiShell) -> TickReport {
    let report = world.tick();
    if !report.advanced {
        return report;
    }
    if report.game_over {
        shell.set_coins(world.state.coins);
        shell.set_final_result(world.state.score, world.state.coins);
        shell.set_panel_visible(Panel::GameOver, true);
    } else {
        sync_readouts(world, shell);
    }
    report
}

pub fn sync_readouts(world: &GameWorld, shell: &mut dyn UiShell) {
    shell.set_score(world.state.score);
    shell.set_coins(world.state.coins);
}
