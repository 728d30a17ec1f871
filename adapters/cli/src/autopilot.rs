//! Scripted input for unattended dives: swim toward the nearest treasure.

use glam::Vec2;
use playground_core::{ArenaSnapshot, Direction, HeldDirections};

/// Distance along an axis below which the autopilot stops pushing.
const DEAD_ZONE: f32 = 4.0;

/// Chooses the directions to hold so the diver closes in on the nearest treasure.
///
/// Holds nothing when the arena has no treasure left.
pub(crate) fn steer(snapshot: &ArenaSnapshot) -> HeldDirections {
    let diver = snapshot.diver.center();
    let Some(target) = nearest_treasure(diver, snapshot) else {
        return HeldDirections::NONE;
    };

    let offset = target - diver;
    let mut held = HeldDirections::NONE;
    if offset.x > DEAD_ZONE {
        held = held.with(Direction::Right);
    } else if offset.x < -DEAD_ZONE {
        held = held.with(Direction::Left);
    }
    if offset.y > DEAD_ZONE {
        held = held.with(Direction::Down);
    } else if offset.y < -DEAD_ZONE {
        held = held.with(Direction::Up);
    }
    held
}

fn nearest_treasure(diver: Vec2, snapshot: &ArenaSnapshot) -> Option<Vec2> {
    snapshot
        .treasures
        .iter()
        .map(|treasure| treasure.bounds.center())
        .min_by(|a, b| a.distance_squared(diver).total_cmp(&b.distance_squared(diver)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_core::{Aabb, GameState, RunState, TreasureId, TreasureSnapshot};

    fn snapshot(diver: Vec2, treasures: &[Vec2]) -> ArenaSnapshot {
        ArenaSnapshot {
            size: Vec2::new(600.0, 400.0),
            water_line: 64.0,
            seabed_depth: 64.0,
            diver: Aabb::new(diver, Vec2::splat(32.0)),
            velocity: Vec2::ZERO,
            treasures: treasures
                .iter()
                .zip(0..)
                .map(|(origin, id)| TreasureSnapshot {
                    id: TreasureId::new(id),
                    bounds: Aabb::new(*origin, Vec2::splat(25.0)),
                    value: 10,
                })
                .collect(),
            obstacles: Vec::new(),
            run: RunState {
                score: 0,
                lives: 3,
                time_remaining: 60,
            },
            state: GameState::Running,
        }
    }

    #[test]
    fn idles_without_treasure() {
        assert_eq!(
            steer(&snapshot(Vec2::new(100.0, 100.0), &[])),
            HeldDirections::NONE
        );
    }

    #[test]
    fn heads_for_the_closest_treasure() {
        let held = steer(&snapshot(
            Vec2::new(100.0, 100.0),
            &[Vec2::new(500.0, 300.0), Vec2::new(20.0, 250.0)],
        ));

        assert!(held.is_held(Direction::Left));
        assert!(held.is_held(Direction::Down));
        assert!(!held.is_held(Direction::Right));
        assert!(!held.is_held(Direction::Up));
    }

    #[test]
    fn stops_pushing_once_aligned() {
        // Diver center (116, 116) against treasure center (116.5, 40.5).
        let held = steer(&snapshot(
            Vec2::new(100.0, 100.0),
            &[Vec2::new(104.0, 28.0)],
        ));

        assert!(held.is_held(Direction::Up));
        assert!(!held.is_held(Direction::Left));
        assert!(!held.is_held(Direction::Right));
    }
}
