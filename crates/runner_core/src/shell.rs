//! The UI shell the game talks to: numeric readouts plus three modal panels.
//!
//! The simulation never calls into the shell mid-tick. The app syncs the
//! readouts once per tick and flips panel visibility only on session
//! transitions (start, pause, game over, quit).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Title screen with the start button.
    Start,
    /// Shown while the run is paused: resume and quit.
    Pause,
    /// Final score and coins, with the restart button.
    GameOver,
}

impl Panel {
    pub const ALL: &'static [Panel] = &[Panel::Start, Panel::Pause, Panel::GameOver];

    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::GameOver => "game over",
        }
    }
}

pub trait UiShell {
    fn set_score(&mut self, score: u64);
    fn set_coins(&mut self, coins: u32);
    /// Score and coins frozen at the moment the run ended.
    fn set_final_result(&mut self, score: u64, coins: u32);
    fn set_panel_visible(&mut self, panel: Panel, visible: bool);
}

/// Buttons clicked in the shell's panels during the last UI pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellActions {
    pub start: bool,
    pub restart: bool,
    pub pause: bool,
    pub resume: bool,
    pub quit: bool,
}

impl ShellActions {
    pub fn any(&self) -> bool {
        self.start || self.restart || self.pause || self.resume || self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_actions_are_empty() {
        assert!(!ShellActions::default().any());
    }

    #[test]
    fn any_reports_a_single_click() {
        let actions = ShellActions {
            resume: true,
            ..Default::default()
        };
        assert!(actions.any());
    }

    #[test]
    fn all_lists_every_panel() {
        assert_eq!(Panel::ALL.len(), 3);
        assert!(Panel::ALL.contains(&Panel::GameOver));
        assert_eq!(Panel::Pause.label(), "pause");
    }
}
