//! Message surface of the diving game.

use std::time::Duration;

use glam::Vec2;

use crate::{Aabb, Direction};

/// Directions currently held down by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HeldDirections {
    /// Whether the up control is held.
    pub up: bool,
    /// Whether the down control is held.
    pub down: bool,
    /// Whether the left control is held.
    pub left: bool,
    /// Whether the right control is held.
    pub right: bool,
}

impl HeldDirections {
    /// Input with nothing held.
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Returns a copy with the provided direction held.
    #[must_use]
    pub fn with(mut self, direction: Direction) -> Self {
        match direction {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
        self
    }

    /// Reports whether the provided direction is held.
    #[must_use]
    pub const fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Sum of the unit vectors of every held direction.
    #[must_use]
    pub fn axis(&self) -> Vec2 {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_held(*direction))
            .fold(Vec2::ZERO, |axis, direction| axis + direction.unit())
    }
}

/// Commands the host may submit to the diving game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiveCommand {
    /// Starts a fresh run.
    Start,
    /// Toggles between running and paused.
    TogglePause,
    /// Restores the initial run state and regenerates treasure.
    Reset,
    /// Latches the directions currently held by the player.
    SetInput {
        /// Held directions applied from the next physics tick onward.
        held: HeldDirections,
    },
    /// Advances the game clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Lifecycle of a diving run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Waiting for the player to start.
    #[default]
    NotStarted,
    /// Physics and countdown are live.
    Running,
    /// Clock frozen until the player resumes.
    Paused,
    /// The run ended; only a reset continues.
    Over,
}

/// Reason a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameOverReason {
    /// The countdown reached zero.
    Time,
    /// The diver ran out of lives.
    Lives,
}

/// Identifier assigned to a treasure when it spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreasureId(u32);

impl TreasureId {
    /// Creates a new treasure identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Score, lives and time left in a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunState {
    /// Points collected so far.
    pub score: u32,
    /// Lives left.
    pub lives: u32,
    /// Whole seconds left on the countdown.
    pub time_remaining: u32,
}

/// Events broadcast by the diving game after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiveEvent {
    /// The game moved to a new lifecycle state.
    GameStateChanged {
        /// State that became active.
        state: GameState,
    },
    /// A physics tick completed; the host should redraw.
    StateChanged {
        /// Number of physics ticks since the run started.
        tick: u64,
    },
    /// The diver picked up a treasure.
    TreasureCollected {
        /// Points the treasure was worth.
        value: u32,
        /// Score after collecting it.
        total_score: u32,
    },
    /// A treasure appeared in the arena.
    TreasureSpawned {
        /// Identifier of the new treasure.
        treasure: TreasureId,
    },
    /// The diver hit an obstacle outside the invulnerability window.
    LifeLost {
        /// Lives left after the hit.
        remaining_lives: u32,
    },
    /// The countdown ticked.
    TimeRemaining {
        /// Whole seconds left.
        seconds: u32,
    },
    /// The run ended.
    GameOver {
        /// Why the run ended.
        reason: GameOverReason,
        /// Score at the end of the run.
        final_score: u32,
    },
}

/// Immutable representation of a single treasure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreasureSnapshot {
    /// Identifier assigned when the treasure spawned.
    pub id: TreasureId,
    /// Region the treasure occupies.
    pub bounds: Aabb,
    /// Points awarded on collection.
    pub value: u32,
}

/// Read-only snapshot of the diving arena used for presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaSnapshot {
    /// Width and height of the arena.
    pub size: Vec2,
    /// Y coordinate separating air (above) from water (below).
    pub water_line: f32,
    /// Height of the sand band along the bottom of the arena.
    pub seabed_depth: f32,
    /// Region currently occupied by the diver.
    pub diver: Aabb,
    /// Current diver velocity in arena units per tick.
    pub velocity: Vec2,
    /// Treasures waiting to be collected, ordered by identifier.
    pub treasures: Vec<TreasureSnapshot>,
    /// Static obstacles.
    pub obstacles: Vec<Aabb>,
    /// Score, lives and time left.
    pub run: RunState,
    /// Lifecycle state of the run.
    pub state: GameState,
}
