use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Smallest window that still shows every lane at a usable size.
    pub min_width: u32,
    pub min_height: u32,
}

impl PlatformConfig {
    /// Window sized to the playfield, never smaller than the minimum.
    pub fn for_playfield(width: u32, height: u32, min_width: u32, min_height: u32) -> Self {
        Self {
            width: width.max(min_width),
            height: height.max(min_height),
            min_width,
            min_height,
            ..Self::default()
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Lane Runner".to_string(),
            width: 800,
            height: 600,
            min_width: 320,
            min_height: 240,
        }
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_min_inner_size(LogicalSize::new(config.min_width, config.min_height));

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    log::debug!("Window scale factor: {}", window.scale_factor());
    Arc::new(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playfield_config_respects_minimum() {
        let config = PlatformConfig::for_playfield(200, 600, 300, 240);
        assert_eq!(config.width, 300);
        assert_eq!(config.height, 600);
        assert_eq!(config.title, "Lane Runner");
    }
}
