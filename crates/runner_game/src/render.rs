//! Draws the world onto any [`DrawSurface`].
//!
//! Back to front: background, ground strip, obstacles, coins, enemies,
//! player. Roles whose image is not ready fall back to flat primitives.

use runner_render::{hex_color, Color, DrawSurface, ScreenRect};

use crate::assets::{AssetProvider, ImageRole};
use crate::collision::Rect;
use crate::entity::Entity;
use crate::world::GameWorld;

const SKY: &str = "#87CEEB";
const GROUND: &str = "#8B4513";
const OBSTACLE: &str = "#FF0000";
const COIN: &str = "#FFD700";
const ENEMY: &str = "#00FF00";
const PLAYER: &str = "#0000FF";

fn screen_rect(rect: &Rect) -> ScreenRect {
    ScreenRect::new(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32)
}

pub fn draw_world(world: &GameWorld, assets: &dyn AssetProvider, surface: &mut dyn DrawSurface) {
    let settings = &world.settings;
    let (width, height) = (settings.canvas_width as f32, settings.canvas_height as f32);

    surface.clear(hex_color(SKY));
    if let Some(background) = assets.image(ImageRole::Background) {
        for layer in &world.background.layers {
            surface.draw_image(
                &background.texture_key,
                ScreenRect::new(layer.x as f32, 0.0, width, height),
            );
        }
    }

    let ground = settings.ground_height as f32;
    surface.fill_rect(
        ScreenRect::new(0.0, height - ground, width, ground),
        hex_color(GROUND),
    );

    draw_boxes(&world.obstacles, ImageRole::Obstacle, hex_color(OBSTACLE), assets, surface);

    match assets.image(ImageRole::Coin) {
        Some(image) => {
            for coin in &world.coins {
                surface.draw_image(&image.texture_key, screen_rect(&coin.bounds));
            }
        }
        None => {
            let gold = hex_color(COIN);
            for coin in &world.coins {
                let rect = screen_rect(&coin.bounds);
                let (cx, cy) = rect.center();
                surface.fill_circle(cx, cy, rect.w / 2.0, gold);
            }
        }
    }

    let standing: Vec<&Entity> = world.enemies.iter().filter(|e| !e.defeated).collect();
    draw_boxes(standing, ImageRole::Enemy, hex_color(ENEMY), assets, surface);

    let player = screen_rect(&world.player.bounds);
    match assets.image(ImageRole::Player) {
        Some(image) => surface.draw_image(&image.texture_key, player),
        None => surface.fill_rect(player, hex_color(PLAYER)),
    }
}

fn draw_boxes<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    role: ImageRole,
    fallback: Color,
    assets: &dyn AssetProvider,
    surface: &mut dyn DrawSurface,
) {
    let image = assets.image(role);
    for entity in entities {
        let rect = screen_rect(&entity.bounds);
        match &image {
            Some(image) => surface.draw_image(&image.texture_key, rect),
            None => surface.fill_rect(rect, fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageHandle;
    use crate::entity::EntityKind;
    use crate::settings::GameSettings;
    use runner_render::{DrawCommand, DrawList};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeAssets {
        ready: HashMap<ImageRole, ImageHandle>,
    }

    impl FakeAssets {
        fn with(roles: &[ImageRole]) -> Self {
            let ready = roles
                .iter()
                .map(|&role| {
                    (
                        role,
                        ImageHandle {
                            texture_key: Arc::from(role.texture_key()),
                        },
                    )
                })
                .collect();
            Self { ready }
        }
    }

    impl AssetProvider for FakeAssets {
        fn image(&self, role: ImageRole) -> Option<ImageHandle> {
            self.ready.get(&role).cloned()
        }
    }

    fn populated_world() -> GameWorld {
        let mut world = GameWorld::new(GameSettings {
            seed: Some(1),
            ..GameSettings::default()
        });
        world
            .obstacles
            .push(Entity::new(EntityKind::Obstacle, Rect::new(100.0, 520.0, 50.0, 30.0), 0));
        world
            .coins
            .push(Entity::new(EntityKind::Coin, Rect::new(300.0, 400.0, 30.0, 30.0), 1));
        world
            .enemies
            .push(Entity::new(EntityKind::Enemy, Rect::new(500.0, 490.0, 50.0, 60.0), 2));
        let mut defeated = Entity::new(EntityKind::Enemy, Rect::new(600.0, 490.0, 50.0, 60.0), 2);
        defeated.defeated = true;
        world.enemies.push(defeated);
        world
    }

    #[test]
    fn missing_images_fall_back_to_primitives() {
        let world = populated_world();
        let mut list = DrawList::new(800.0, 600.0);
        draw_world(&world, &FakeAssets::default(), &mut list);

        let commands = list.commands();
        assert_eq!(commands[0], DrawCommand::Clear(hex_color(SKY)));
        assert!(matches!(
            commands[1],
            DrawCommand::FillRect { rect, color } if rect.y == 550.0 && color == hex_color(GROUND)
        ));
        assert!(matches!(commands[2], DrawCommand::FillRect { color, .. } if color == hex_color(OBSTACLE)));
        assert!(matches!(
            commands[3],
            DrawCommand::FillCircle { center_x, center_y, radius, .. }
                if center_x == 315.0 && center_y == 415.0 && radius == 15.0
        ));
        assert!(matches!(commands[4], DrawCommand::FillRect { color, .. } if color == hex_color(ENEMY)));
        assert!(matches!(commands[5], DrawCommand::FillRect { color, .. } if color == hex_color(PLAYER)));
        assert_eq!(commands.len(), 6, "defeated enemy is not drawn");
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Image { .. })));
    }

    #[test]
    fn ready_images_replace_primitives() {
        let world = populated_world();
        let mut list = DrawList::new(800.0, 600.0);
        draw_world(&world, &FakeAssets::with(&ImageRole::ALL), &mut list);

        let images: Vec<&str> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { texture_key, .. } => Some(&**texture_key),
                _ => None,
            })
            .collect();
        assert_eq!(
            images,
            vec![
                "image/background",
                "image/background",
                "image/obstacle",
                "image/coin",
                "image/enemy",
                "image/player",
            ]
        );
    }

    #[test]
    fn background_layers_follow_scroll() {
        let mut world = populated_world();
        world.background.layers[0].x = -120.0;
        world.background.layers[1].x = 680.0;
        let mut list = DrawList::new(800.0, 600.0);
        draw_world(&world, &FakeAssets::with(&[ImageRole::Background]), &mut list);
        let xs: Vec<f32> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { rect, .. } => Some(rect.x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![-120.0, 680.0]);
    }
}
