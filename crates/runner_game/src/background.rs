//! Two background copies laid side by side and scrolled as one strip.

use crate::settings::GameSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundLayer {
    pub x: f64,
    /// Fraction of the obstacle speed.
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub layers: [BackgroundLayer; 2],
}

impl Background {
    pub fn new(settings: &GameSettings) -> Self {
        let speed = settings.background_speed;
        Self {
            layers: [
                BackgroundLayer { x: 0.0, speed },
                BackgroundLayer {
                    x: settings.canvas_width,
                    speed,
                },
            ],
        }
    }

    /// Move every layer left; one that has scrolled a full width off the
    /// left edge jumps back to the right edge.
    pub fn scroll(&mut self, settings: &GameSettings, difficulty: f64) {
        let width = settings.canvas_width;
        for layer in &mut self.layers {
            layer.x -= settings.obstacle_speed * layer.speed * difficulty;
            if layer.x <= -width {
                layer.x = width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_start_side_by_side() {
        let bg = Background::new(&GameSettings::default());
        assert_eq!(bg.layers[0].x, 0.0);
        assert_eq!(bg.layers[1].x, 800.0);
    }

    #[test]
    fn layer_wraps_after_a_full_width() {
        let settings = GameSettings::default();
        let mut bg = Background::new(&settings);
        // 160 ticks at 5 units each moves exactly one width.
        for _ in 0..159 {
            bg.scroll(&settings, 1.0);
        }
        assert_eq!(bg.layers[0].x, -795.0);
        bg.scroll(&settings, 1.0);
        assert_eq!(bg.layers[0].x, 800.0);
        assert_eq!(bg.layers[1].x, 0.0);
    }

    #[test]
    fn zero_speed_holds_still() {
        let settings = GameSettings {
            background_speed: 0.0,
            ..GameSettings::default()
        };
        let mut bg = Background::new(&settings);
        bg.scroll(&settings, 3.0);
        assert_eq!(bg, Background::new(&settings));
    }
}
