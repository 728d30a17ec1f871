//! Water tank geometry and seeded entity placement for the diving demo.

use glam::{BVec2, Vec2};
use playground_core::Aabb;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

const PLACEMENT_ATTEMPTS_PER_OBSTACLE: usize = 32;

/// Reasons an arena description may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ArenaError {
    /// Width or height is zero, negative or not finite.
    #[error("arena must have a positive finite size, got {width}x{height}")]
    InvalidSize {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
    /// The water line lies outside the arena.
    #[error("water line {water_line} lies outside an arena {height} units tall")]
    WaterLineOutside {
        /// Requested water line.
        water_line: f32,
        /// Arena height.
        height: f32,
    },
    /// The seabed band does not fit inside the arena.
    #[error("seabed depth {seabed_depth} does not fit an arena {height} units tall")]
    SeabedOutside {
        /// Requested seabed depth.
        seabed_depth: f32,
        /// Arena height.
        height: f32,
    },
    /// A body placed at the requested corner would leave the swimmable area.
    #[error("start ({x}, {y}) lies outside the swimmable area (0, 0)..=({max_x}, {max_y})")]
    StartOutside {
        /// Requested horizontal coordinate.
        x: f32,
        /// Requested vertical coordinate.
        y: f32,
        /// Largest horizontal coordinate allowed.
        max_x: f32,
        /// Largest vertical coordinate allowed.
        max_y: f32,
    },
}

/// Rectangular water tank the diver swims in.
///
/// Everything above `water_line` is air; the bottom `seabed_depth` units are
/// sand the diver cannot enter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    size: Vec2,
    water_line: f32,
    seabed_depth: f32,
}

impl Arena {
    /// Validates and builds an arena description.
    pub fn new(size: Vec2, water_line: f32, seabed_depth: f32) -> Result<Self, ArenaError> {
        if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
            return Err(ArenaError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }
        if !(0.0..=size.y).contains(&water_line) {
            return Err(ArenaError::WaterLineOutside {
                water_line,
                height: size.y,
            });
        }
        if !(0.0..size.y).contains(&seabed_depth) {
            return Err(ArenaError::SeabedOutside {
                seabed_depth,
                height: size.y,
            });
        }

        Ok(Self {
            size,
            water_line,
            seabed_depth,
        })
    }

    /// Width and height of the tank.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Vertical coordinate of the water surface.
    #[must_use]
    pub const fn water_line(&self) -> f32 {
        self.water_line
    }

    /// Height of the sand band at the bottom of the tank.
    #[must_use]
    pub const fn seabed_depth(&self) -> f32 {
        self.seabed_depth
    }

    /// Reports whether a body whose top edge sits at `y` is in the water.
    #[must_use]
    pub fn is_submerged(&self, y: f32) -> bool {
        y >= self.water_line
    }

    /// Largest top-left corner a body of `agent_size` may occupy.
    #[must_use]
    pub fn agent_limits(&self, agent_size: Vec2) -> Vec2 {
        Vec2::new(
            self.size.x - agent_size.x,
            self.size.y - self.seabed_depth,
        )
        .max(Vec2::ZERO)
    }

    /// Clamps a top-left corner into the swimmable area.
    ///
    /// The returned mask marks the axes that had to be corrected.
    #[must_use]
    pub fn clamp(&self, position: Vec2, agent_size: Vec2) -> (Vec2, BVec2) {
        let clamped = position.clamp(Vec2::ZERO, self.agent_limits(agent_size));
        (clamped, clamped.cmpne(position))
    }

    /// Checks that a body of `agent_size` may rest with its corner at `position`.
    pub fn ensure_reachable(&self, position: Vec2, agent_size: Vec2) -> Result<(), ArenaError> {
        let (_, corrected) = self.clamp(position, agent_size);
        if corrected.any() || !position.is_finite() {
            let limits = self.agent_limits(agent_size);
            return Err(ArenaError::StartOutside {
                x: position.x,
                y: position.y,
                max_x: limits.x,
                max_y: limits.y,
            });
        }
        Ok(())
    }
}

/// Sizes and sampling bands used when scattering entities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRules {
    /// Number of obstacles generated per arena.
    pub obstacle_count: usize,
    /// Edge length of a square obstacle.
    pub obstacle_size: f32,
    /// Right-hand and vertical margins kept free of obstacle origins.
    pub obstacle_margin: Vec2,
    /// Edge length of a square treasure.
    pub treasure_size: f32,
    /// Right-hand and vertical margins kept free of treasure origins.
    pub treasure_margin: Vec2,
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self {
            obstacle_count: 8,
            obstacle_size: 30.0,
            obstacle_margin: Vec2::new(40.0, 100.0),
            treasure_size: 25.0,
            treasure_margin: Vec2::new(30.0, 80.0),
        }
    }
}

/// Deterministic generator for obstacle and treasure boxes.
#[derive(Clone, Debug)]
pub struct LayoutGenerator {
    rng: ChaCha8Rng,
    rules: LayoutRules,
}

impl LayoutGenerator {
    /// Creates a generator whose output depends only on `seed` and `rules`.
    #[must_use]
    pub fn new(seed: u64, rules: LayoutRules) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            rules,
        }
    }

    /// Rules the generator samples with.
    #[must_use]
    pub const fn rules(&self) -> &LayoutRules {
        &self.rules
    }

    /// Scatters the configured number of obstacles, none overlapping `keep_clear`.
    ///
    /// Placement gives up after a bounded number of attempts, so a crowded
    /// arena may receive fewer obstacles than requested.
    pub fn obstacles(&mut self, arena: &Arena, keep_clear: Aabb) -> Vec<Aabb> {
        let size = Vec2::splat(self.rules.obstacle_size);
        let margin = self.rules.obstacle_margin;
        let mut placed = Vec::with_capacity(self.rules.obstacle_count);
        let mut attempts = self
            .rules
            .obstacle_count
            .saturating_mul(PLACEMENT_ATTEMPTS_PER_OBSTACLE);

        while placed.len() < self.rules.obstacle_count && attempts > 0 {
            attempts -= 1;
            let candidate = Aabb::new(self.sample_origin(arena, margin), size);
            if !candidate.overlaps(&keep_clear) {
                placed.push(candidate);
            }
        }

        placed
    }

    /// Places a single treasure box.
    pub fn treasure(&mut self, arena: &Arena) -> Aabb {
        let size = Vec2::splat(self.rules.treasure_size);
        Aabb::new(self.sample_origin(arena, self.rules.treasure_margin), size)
    }

    fn sample_origin(&mut self, arena: &Arena, margin: Vec2) -> Vec2 {
        let size = arena.size();
        let x = sample_axis(&mut self.rng, 0.0, size.x - margin.x);
        let y = sample_axis(&mut self.rng, margin.y, size.y - margin.y);
        Vec2::new(x, y)
    }
}

fn sample_axis(rng: &mut ChaCha8Rng, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank() -> Arena {
        Arena::new(Vec2::new(600.0, 400.0), 64.0, 64.0).expect("valid tank")
    }

    fn start_box() -> Aabb {
        Aabb::new(Vec2::new(200.0, 100.0), Vec2::splat(32.0))
    }

    #[test]
    fn rejects_degenerate_geometry() {
        assert!(matches!(
            Arena::new(Vec2::new(0.0, 400.0), 64.0, 64.0),
            Err(ArenaError::InvalidSize { .. })
        ));
        assert!(matches!(
            Arena::new(Vec2::new(600.0, 400.0), 401.0, 64.0),
            Err(ArenaError::WaterLineOutside { .. })
        ));
        assert!(matches!(
            Arena::new(Vec2::new(600.0, 400.0), 64.0, 400.0),
            Err(ArenaError::SeabedOutside { .. })
        ));
    }

    #[test]
    fn submersion_starts_at_the_water_line() {
        let arena = tank();
        assert!(!arena.is_submerged(63.9));
        assert!(arena.is_submerged(64.0));
    }

    #[test]
    fn clamp_reports_corrected_axes() {
        let arena = tank();
        let agent = Vec2::splat(32.0);

        let (inside, mask) = arena.clamp(Vec2::new(100.0, 100.0), agent);
        assert_eq!(inside, Vec2::new(100.0, 100.0));
        assert!(!mask.any());

        let (corner, mask) = arena.clamp(Vec2::new(-5.0, 1_000.0), agent);
        assert_eq!(corner, Vec2::new(0.0, 336.0));
        assert!(mask.x && mask.y);

        let (edge, mask) = arena.clamp(Vec2::new(900.0, 10.0), agent);
        assert_eq!(edge, Vec2::new(568.0, 10.0));
        assert!(mask.x && !mask.y);
    }

    #[test]
    fn start_must_leave_room_for_the_agent() {
        let arena = tank();
        let agent = Vec2::splat(32.0);

        assert!(arena.ensure_reachable(Vec2::new(568.0, 336.0), agent).is_ok());
        assert_eq!(
            arena.ensure_reachable(Vec2::new(569.0, 100.0), agent),
            Err(ArenaError::StartOutside {
                x: 569.0,
                y: 100.0,
                max_x: 568.0,
                max_y: 336.0,
            })
        );
        assert!(arena.ensure_reachable(Vec2::new(10.0, -1.0), agent).is_err());
    }

    #[test]
    fn same_seed_yields_same_layout() {
        let arena = tank();
        let mut first = LayoutGenerator::new(7, LayoutRules::default());
        let mut second = LayoutGenerator::new(7, LayoutRules::default());

        assert_eq!(
            first.obstacles(&arena, start_box()),
            second.obstacles(&arena, start_box())
        );
        assert_eq!(first.treasure(&arena), second.treasure(&arena));
    }

    #[test]
    fn obstacles_avoid_the_start_box_and_stay_in_band() {
        let arena = tank();
        for seed in 0..32 {
            let mut generator = LayoutGenerator::new(seed, LayoutRules::default());
            let obstacles = generator.obstacles(&arena, start_box());
            assert_eq!(obstacles.len(), 8);
            for obstacle in obstacles {
                assert!(!obstacle.overlaps(&start_box()));
                let origin = obstacle.origin();
                assert!((0.0..560.0).contains(&origin.x));
                assert!((100.0..300.0).contains(&origin.y));
            }
        }
    }

    #[test]
    fn treasure_lands_inside_its_band() {
        let arena = tank();
        let mut generator = LayoutGenerator::new(99, LayoutRules::default());
        for _ in 0..64 {
            let origin = generator.treasure(&arena).origin();
            assert!((0.0..570.0).contains(&origin.x));
            assert!((80.0..320.0).contains(&origin.y));
        }
    }

    #[test]
    fn narrow_arena_collapses_band_to_its_lower_edge() {
        let arena = Arena::new(Vec2::new(20.0, 100.0), 10.0, 10.0).expect("small tank");
        let mut generator = LayoutGenerator::new(1, LayoutRules::default());
        assert_eq!(generator.treasure(&arena).origin(), Vec2::new(0.0, 80.0));
    }
}
