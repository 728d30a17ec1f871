#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Diving game: fixed-timestep kinematics in air and water, treasure and
//! obstacle collisions, and the score, lives and countdown of a run.
//!
//! The runner owns a [`Scheduler`] with three timers. The physics tick and the
//! one-second countdown repeat while the run is live; every collected treasure
//! arms a one-shot respawn. The host only ever feeds elapsed time, so pausing
//! is simply not advancing the clock.

use std::time::Duration;

use glam::Vec2;
use playground_core::{
    Aabb, ArenaSnapshot, DiveCommand, DiveEvent, GameOverReason, GameState, HeldDirections,
    RunState, TreasureId, TreasureSnapshot,
};
use playground_scheduler::Scheduler;
use playground_world::arena::{Arena, ArenaError, LayoutGenerator, LayoutRules};
use tracing::{debug, info};

/// Physical constants, timers and limits of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Downward acceleration applied every tick.
    pub gravity: f32,
    /// Additional vertical acceleration applied in water; negative lifts.
    pub buoyancy: f32,
    /// Velocity multiplier applied every tick above the water line.
    pub air_resistance: f32,
    /// Velocity multiplier applied every tick below the water line.
    pub water_resistance: f32,
    /// Impulse added per held direction per tick.
    pub move_speed: f32,
    /// Width and height of the tank.
    pub arena_size: Vec2,
    /// Vertical coordinate of the water surface.
    pub water_line: f32,
    /// Height of the sand band the diver cannot enter.
    pub seabed_depth: f32,
    /// Top-left corner the diver starts from and respawns at.
    pub start: Vec2,
    /// Width and height of the diver.
    pub diver_size: Vec2,
    /// Points awarded per treasure.
    pub treasure_value: u32,
    /// Treasures placed when a run is prepared.
    pub initial_treasures: usize,
    /// Upper bound on treasures present at once.
    pub max_treasures: usize,
    /// Lives at the start of a run.
    pub lives: u32,
    /// Seconds on the countdown at the start of a run.
    pub time_limit: u32,
    /// Simulated time between physics ticks.
    pub tick_interval: Duration,
    /// Simulated time between countdown decrements.
    pub countdown_interval: Duration,
    /// Invulnerability window after an obstacle hit.
    pub hit_cooldown: Duration,
    /// Delay between collecting a treasure and its replacement appearing.
    pub respawn_delay: Duration,
    /// Obstacle and treasure placement rules.
    pub layout: LayoutRules,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            buoyancy: -0.45,
            air_resistance: 0.98,
            water_resistance: 0.95,
            move_speed: 1.5,
            arena_size: Vec2::new(600.0, 400.0),
            water_line: 64.0,
            seabed_depth: 64.0,
            start: Vec2::new(200.0, 100.0),
            diver_size: Vec2::splat(32.0),
            treasure_value: 10,
            initial_treasures: 3,
            max_treasures: 5,
            lives: 3,
            time_limit: 60,
            tick_interval: Duration::from_millis(16),
            countdown_interval: Duration::from_secs(1),
            hit_cooldown: Duration::from_millis(1000),
            respawn_delay: Duration::from_millis(1000),
            layout: LayoutRules::default(),
        }
    }
}

/// Position and velocity of the diver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    /// Top-left corner of the diver.
    pub position: Vec2,
    /// Displacement applied per tick.
    pub velocity: Vec2,
}

impl Kinematics {
    /// Diver resting at `position`.
    #[must_use]
    pub const fn at_rest(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Treasure {
    id: TreasureId,
    bounds: Aabb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DiveTimer {
    Physics,
    Countdown,
    Respawn,
}

/// Pure state machine behind the diving game.
#[derive(Debug)]
pub struct BuoyancyRunner {
    tuning: Tuning,
    arena: Arena,
    layout: LayoutGenerator,
    kinematics: Kinematics,
    held: HeldDirections,
    treasures: Vec<Treasure>,
    obstacles: Vec<Aabb>,
    next_treasure: u32,
    run: RunState,
    state: GameState,
    ticks: u64,
    last_hit: Option<Duration>,
    scheduler: Scheduler<DiveTimer>,
}

impl BuoyancyRunner {
    /// Prepares a run whose obstacle and treasure placement derives from `seed`.
    ///
    /// Fails when the arena is malformed or the start position lies outside
    /// the swimmable area.
    ///
    /// Obstacles are generated once here and survive resets. Spawn events for
    /// the initial treasure are not reported; read them from the snapshot.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, ArenaError> {
        let arena = Arena::new(tuning.arena_size, tuning.water_line, tuning.seabed_depth)?;
        arena.ensure_reachable(tuning.start, tuning.diver_size)?;
        let mut layout = LayoutGenerator::new(seed, tuning.layout);
        let start_box = Aabb::new(tuning.start, tuning.diver_size);
        let obstacles = layout.obstacles(&arena, start_box);

        let mut runner = Self {
            tuning,
            arena,
            layout,
            kinematics: Kinematics::at_rest(tuning.start),
            held: HeldDirections::NONE,
            treasures: Vec::new(),
            obstacles,
            next_treasure: 0,
            run: initial_run(&tuning),
            state: GameState::NotStarted,
            ticks: 0,
            last_hit: None,
            scheduler: Scheduler::new(),
        };
        runner.fill_treasure(&mut Vec::new());
        Ok(runner)
    }

    /// Applies a host command, appending the resulting events to `out`.
    pub fn apply(&mut self, command: DiveCommand, out: &mut Vec<DiveEvent>) {
        match command {
            DiveCommand::Start => self.start(out),
            DiveCommand::TogglePause => self.toggle_pause(out),
            DiveCommand::Reset => self.reset(out),
            DiveCommand::SetInput { held } => self.set_input(held),
            DiveCommand::Tick { dt } => self.advance(dt, out),
        }
    }

    /// Starts the run and arms the physics and countdown timers.
    ///
    /// Ignored unless the run has not started yet.
    pub fn start(&mut self, out: &mut Vec<DiveEvent>) {
        if self.state != GameState::NotStarted {
            debug!(state = ?self.state, "start ignored");
            return;
        }

        self.scheduler.cancel_all();
        let _physics = self
            .scheduler
            .schedule_repeating(self.tuning.tick_interval, DiveTimer::Physics);
        let _countdown = self
            .scheduler
            .schedule_repeating(self.tuning.countdown_interval, DiveTimer::Countdown);
        self.transition(GameState::Running, out);
    }

    /// Switches between running and paused; ignored in other states.
    pub fn toggle_pause(&mut self, out: &mut Vec<DiveEvent>) {
        match self.state {
            GameState::Running => self.transition(GameState::Paused, out),
            GameState::Paused => self.transition(GameState::Running, out),
            GameState::NotStarted | GameState::Over => {}
        }
    }

    /// Latches the held directions for subsequent ticks.
    pub fn set_input(&mut self, held: HeldDirections) {
        self.held = held;
    }

    /// Advances the run clock and executes every timer that falls due.
    ///
    /// Time only flows while the run is live.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<DiveEvent>) {
        if self.state != GameState::Running {
            return;
        }

        self.scheduler.advance(dt);
        while let Some(timer) = self.scheduler.pop_due() {
            match timer {
                DiveTimer::Physics => self.tick(out),
                DiveTimer::Countdown => self.countdown_tick(out),
                DiveTimer::Respawn => self.respawn(out),
            }
        }
    }

    /// Runs one physics step: input, forces, integration, clamping and collisions.
    pub fn tick(&mut self, out: &mut Vec<DiveEvent>) {
        if self.state != GameState::Running {
            return;
        }

        self.integrate();
        self.collect_treasure(out);
        self.check_obstacles(out);

        self.ticks = self.ticks.saturating_add(1);
        out.push(DiveEvent::StateChanged { tick: self.ticks });
    }

    /// Removes one second from the countdown, ending the run at zero.
    pub fn countdown_tick(&mut self, out: &mut Vec<DiveEvent>) {
        if self.state != GameState::Running {
            return;
        }

        self.run.time_remaining = self.run.time_remaining.saturating_sub(1);
        out.push(DiveEvent::TimeRemaining {
            seconds: self.run.time_remaining,
        });

        if self.run.time_remaining == 0 {
            self.end_run(GameOverReason::Time, out);
        }
    }

    /// Restores the initial run and regenerates treasure; obstacles stay.
    pub fn reset(&mut self, out: &mut Vec<DiveEvent>) {
        self.scheduler.cancel_all();
        self.run = initial_run(&self.tuning);
        self.kinematics = Kinematics::at_rest(self.tuning.start);
        self.last_hit = None;
        self.ticks = 0;
        self.treasures.clear();
        self.fill_treasure(out);
        self.transition(GameState::NotStarted, out);
    }

    /// Adds a treasure at an explicit location, respecting the treasure cap.
    pub fn place_treasure(&mut self, bounds: Aabb, out: &mut Vec<DiveEvent>) -> Option<TreasureId> {
        if self.treasures.len() >= self.tuning.max_treasures {
            return None;
        }

        let id = TreasureId::new(self.next_treasure);
        self.next_treasure = self.next_treasure.saturating_add(1);
        self.treasures.push(Treasure { id, bounds });
        out.push(DiveEvent::TreasureSpawned { treasure: id });
        Some(id)
    }

    /// Adds an obstacle at an explicit location.
    ///
    /// Unlike generated obstacles, no check against the start box is made.
    pub fn place_obstacle(&mut self, bounds: Aabb) {
        self.obstacles.push(bounds);
    }

    /// Captures the presentation state of the run.
    #[must_use]
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            size: self.arena.size(),
            water_line: self.arena.water_line(),
            seabed_depth: self.arena.seabed_depth(),
            diver: self.diver_bounds(),
            velocity: self.kinematics.velocity,
            treasures: self
                .treasures
                .iter()
                .map(|treasure| TreasureSnapshot {
                    id: treasure.id,
                    bounds: treasure.bounds,
                    value: self.tuning.treasure_value,
                })
                .collect(),
            obstacles: self.obstacles.clone(),
            run: self.run,
            state: self.state,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Score, lives and time left.
    #[must_use]
    pub fn run(&self) -> RunState {
        self.run
    }

    /// Diver position and velocity.
    #[must_use]
    pub fn kinematics(&self) -> Kinematics {
        self.kinematics
    }

    /// Tank geometry.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Tuning the runner was built with.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Region currently occupied by the diver.
    #[must_use]
    pub fn diver_bounds(&self) -> Aabb {
        Aabb::new(self.kinematics.position, self.tuning.diver_size)
    }

    fn integrate(&mut self) {
        let tuning = &self.tuning;
        let body = &mut self.kinematics;

        body.velocity += self.held.axis() * tuning.move_speed;

        if self.arena.is_submerged(body.position.y) {
            body.velocity.y += tuning.gravity + tuning.buoyancy;
            body.velocity *= tuning.water_resistance;
        } else {
            body.velocity.y += tuning.gravity;
            body.velocity *= tuning.air_resistance;
        }

        let (position, clamped) = self
            .arena
            .clamp(body.position + body.velocity, tuning.diver_size);
        body.position = position;
        if clamped.x {
            body.velocity.x = 0.0;
        }
        if clamped.y {
            body.velocity.y = 0.0;
        }
    }

    fn collect_treasure(&mut self, out: &mut Vec<DiveEvent>) {
        let diver = self.diver_bounds();
        let before = self.treasures.len();
        self.treasures
            .retain(|treasure| !treasure.bounds.overlaps(&diver));
        let collected = before - self.treasures.len();

        for _ in 0..collected {
            self.run.score = self.run.score.saturating_add(self.tuning.treasure_value);
            out.push(DiveEvent::TreasureCollected {
                value: self.tuning.treasure_value,
                total_score: self.run.score,
            });
            let _respawn = self
                .scheduler
                .schedule_once(self.tuning.respawn_delay, DiveTimer::Respawn);
        }

        if collected > 0 {
            debug!(collected, score = self.run.score, "treasure collected");
        }
    }

    fn check_obstacles(&mut self, out: &mut Vec<DiveEvent>) {
        let now = self.scheduler.now();
        let cooling_down = self
            .last_hit
            .is_some_and(|hit| now.saturating_sub(hit) < self.tuning.hit_cooldown);
        if cooling_down {
            return;
        }

        let diver = self.diver_bounds();
        if !self.obstacles.iter().any(|obstacle| obstacle.overlaps(&diver)) {
            return;
        }

        self.last_hit = Some(now);
        self.run.lives = self.run.lives.saturating_sub(1);
        self.kinematics = Kinematics::at_rest(self.tuning.start);
        debug!(lives = self.run.lives, "obstacle hit");
        out.push(DiveEvent::LifeLost {
            remaining_lives: self.run.lives,
        });

        if self.run.lives == 0 {
            self.end_run(GameOverReason::Lives, out);
        }
    }

    fn respawn(&mut self, out: &mut Vec<DiveEvent>) {
        if self.treasures.len() >= self.tuning.max_treasures {
            debug!("treasure respawn skipped at cap");
            return;
        }
        self.spawn_treasure(out);
    }

    fn fill_treasure(&mut self, out: &mut Vec<DiveEvent>) {
        let target = self.tuning.initial_treasures.min(self.tuning.max_treasures);
        while self.treasures.len() < target {
            self.spawn_treasure(out);
        }
    }

    fn spawn_treasure(&mut self, out: &mut Vec<DiveEvent>) {
        let bounds = self.layout.treasure(&self.arena);
        let _ = self.place_treasure(bounds, out);
    }

    fn end_run(&mut self, reason: GameOverReason, out: &mut Vec<DiveEvent>) {
        self.scheduler.cancel_all();
        self.transition(GameState::Over, out);
        info!(?reason, score = self.run.score, "run over");
        out.push(DiveEvent::GameOver {
            reason,
            final_score: self.run.score,
        });
    }

    fn transition(&mut self, state: GameState, out: &mut Vec<DiveEvent>) {
        debug!(from = ?self.state, to = ?state, "game state changed");
        self.state = state;
        out.push(DiveEvent::GameStateChanged { state });
    }
}

fn initial_run(tuning: &Tuning) -> RunState {
    RunState {
        score: 0,
        lives: tuning.lives,
        time_remaining: tuning.time_limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_nets_an_upward_pull() {
        let tuning = Tuning::default();
        assert!(tuning.gravity + tuning.buoyancy < 0.0);
    }

    #[test]
    fn generated_layout_keeps_start_clear() {
        let runner = BuoyancyRunner::new(Tuning::default(), 42).expect("default arena");
        let snapshot = runner.snapshot();

        assert_eq!(snapshot.obstacles.len(), 8);
        assert_eq!(snapshot.treasures.len(), 3);
        assert!(snapshot
            .obstacles
            .iter()
            .all(|obstacle| !obstacle.overlaps(&snapshot.diver)));
    }

    #[test]
    fn initial_pool_respects_the_cap() {
        let tuning = Tuning {
            initial_treasures: 9,
            max_treasures: 2,
            ..Tuning::default()
        };
        let runner = BuoyancyRunner::new(tuning, 1).expect("default arena");
        assert_eq!(runner.snapshot().treasures.len(), 2);
    }

    #[test]
    fn opposite_inputs_cancel() {
        let held = HeldDirections::NONE
            .with(playground_core::Direction::Left)
            .with(playground_core::Direction::Right);
        assert_eq!(held.axis(), Vec2::ZERO);
    }
}
