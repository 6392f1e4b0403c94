pub mod overlay;
pub mod panels;

pub use overlay::HudOverlay;
pub use panels::{DebugStats, HudState};
