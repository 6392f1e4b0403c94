//! Scrolling obstacles, coins and enemies.

use crate::collision::Rect;
use crate::settings::{GameSettings, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Obstacle,
    Coin,
    Enemy,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Obstacle, EntityKind::Coin, EntityKind::Enemy];

    pub fn index(self) -> usize {
        match self {
            Self::Obstacle => 0,
            Self::Coin => 1,
            Self::Enemy => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Obstacle => "obstacle",
            Self::Coin => "coin",
            Self::Enemy => "enemy",
        }
    }

    pub fn size(self, settings: &GameSettings) -> Size {
        match self {
            Self::Obstacle => settings.obstacle_size,
            Self::Coin => settings.coin_size,
            Self::Enemy => settings.enemy_size,
        }
    }

    /// Spawn interval before difficulty scaling.
    pub fn base_frequency(self, settings: &GameSettings) -> f64 {
        match self {
            Self::Obstacle => settings.obstacle_frequency,
            Self::Coin => settings.coin_frequency,
            Self::Enemy => settings.enemy_frequency,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub bounds: Rect,
    pub lane: usize,
    /// Only enemies are ever defeated.
    pub defeated: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, bounds: Rect, lane: usize) -> Self {
        Self {
            kind,
            bounds,
            lane,
            defeated: false,
        }
    }

    pub fn is_off_screen(&self) -> bool {
        self.bounds.right() < 0.0
    }
}

/// Scroll every entity `dx` to the left, then drop the ones that left the
/// playfield or were defeated. Survivors keep their order.
pub fn advance_entities(entities: &mut Vec<Entity>, dx: f64) {
    let before = entities.len();
    entities.retain_mut(|entity| {
        entity.bounds.x -= dx;
        !(entity.is_off_screen() || entity.defeated)
    });
    let removed = before - entities.len();
    if removed > 0 {
        log::trace!("Pruned {} entities", removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle_at(x: f64) -> Entity {
        Entity::new(EntityKind::Obstacle, Rect::new(x, 520.0, 50.0, 30.0), 0)
    }

    #[test]
    fn every_entity_moves_left_by_dx() {
        let mut list = vec![obstacle_at(100.0), obstacle_at(400.0)];
        advance_entities(&mut list, 5.5);
        assert_eq!(list[0].bounds.x, 94.5);
        assert_eq!(list[1].bounds.x, 394.5);
    }

    #[test]
    fn off_screen_entities_are_pruned_in_order() {
        let mut list = vec![obstacle_at(-40.0), obstacle_at(10.0), obstacle_at(-46.0), obstacle_at(300.0)];
        advance_entities(&mut list, 5.0);
        // -40 -> -45: right edge 5, kept. -46 -> -51: right edge -1, gone.
        let xs: Vec<f64> = list.iter().map(|e| e.bounds.x).collect();
        assert_eq!(xs, vec![-45.0, 5.0, 295.0]);
    }

    #[test]
    fn right_edge_exactly_at_zero_survives() {
        let mut list = vec![obstacle_at(-45.0)];
        advance_entities(&mut list, 5.0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn defeated_enemies_are_removed_anywhere_on_screen() {
        let mut enemy = Entity::new(EntityKind::Enemy, Rect::new(300.0, 490.0, 50.0, 60.0), 1);
        enemy.defeated = true;
        let mut list = vec![enemy, obstacle_at(500.0)];
        advance_entities(&mut list, 5.0);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].kind, EntityKind::Obstacle);
    }
}
