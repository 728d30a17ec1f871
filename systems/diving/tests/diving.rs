use std::time::Duration;

use glam::Vec2;
use playground_core::{
    Aabb, Direction, DiveCommand, DiveEvent, GameOverReason, GameState, HeldDirections,
};
use playground_system_diving::{BuoyancyRunner, Tuning};
use playground_world::arena::{ArenaError, LayoutRules};

fn empty_tank(start: Vec2) -> Tuning {
    Tuning {
        start,
        initial_treasures: 0,
        layout: LayoutRules {
            obstacle_count: 0,
            ..LayoutRules::default()
        },
        ..Tuning::default()
    }
}

fn started(tuning: Tuning) -> (BuoyancyRunner, Vec<DiveEvent>) {
    let mut runner = BuoyancyRunner::new(tuning, 0).expect("valid tuning");
    let mut events = Vec::new();
    runner.start(&mut events);
    (runner, events)
}

#[test]
fn resting_diver_in_air_falls_by_gravity_scaled_by_air_resistance() {
    let tuning = empty_tank(Vec2::new(200.0, 20.0));
    let (mut runner, mut events) = started(tuning);

    runner.tick(&mut events);

    let body = runner.kinematics();
    let expected_velocity = tuning.gravity * tuning.air_resistance;
    assert_eq!(body.velocity, Vec2::new(0.0, expected_velocity));
    assert_eq!(body.position, Vec2::new(200.0, 20.0 + expected_velocity));
    assert_eq!(events.last(), Some(&DiveEvent::StateChanged { tick: 1 }));
}

#[test]
fn submerged_diver_drifts_upward() {
    let tuning = empty_tank(Vec2::new(200.0, 200.0));
    let (mut runner, mut events) = started(tuning);

    runner.tick(&mut events);

    let body = runner.kinematics();
    assert!(body.velocity.y < 0.0);
    assert!(body.position.y < 200.0);
}

#[test]
fn overlapping_treasure_is_collected_once() {
    let tuning = empty_tank(Vec2::new(200.0, 100.0));
    let mut runner = BuoyancyRunner::new(tuning, 0).expect("valid tuning");
    let mut events = Vec::new();
    let treasure = runner
        .place_treasure(
            Aabb::new(Vec2::new(200.0, 100.0), Vec2::splat(25.0)),
            &mut events,
        )
        .expect("below the cap");
    runner.start(&mut events);

    runner.tick(&mut events);

    let snapshot = runner.snapshot();
    assert_eq!(snapshot.run.score, 10);
    assert!(snapshot.treasures.iter().all(|entry| entry.id != treasure));
    assert!(events.contains(&DiveEvent::TreasureCollected {
        value: 10,
        total_score: 10,
    }));
}

#[test]
fn last_life_lost_ends_the_run() {
    let tuning = Tuning {
        lives: 1,
        ..empty_tank(Vec2::new(200.0, 100.0))
    };
    let (mut runner, mut events) = started(tuning);
    runner.place_obstacle(Aabb::new(Vec2::new(210.0, 110.0), Vec2::splat(30.0)));

    runner.tick(&mut events);

    assert_eq!(runner.run().lives, 0);
    assert_eq!(runner.state(), GameState::Over);
    assert!(events.contains(&DiveEvent::LifeLost { remaining_lives: 0 }));
    assert!(events.contains(&DiveEvent::GameOver {
        reason: GameOverReason::Lives,
        final_score: 0,
    }));
}

#[test]
fn hit_returns_diver_to_start() {
    let tuning = empty_tank(Vec2::new(100.0, 100.0));
    let (mut runner, mut events) = started(tuning);
    runner.place_obstacle(Aabb::new(Vec2::new(300.0, 90.0), Vec2::splat(30.0)));
    runner.set_input(HeldDirections::NONE.with(Direction::Right));

    for _ in 0..100 {
        runner.tick(&mut events);
        if runner.run().lives < tuning.lives {
            break;
        }
    }

    assert_eq!(runner.run().lives, tuning.lives - 1);
    let body = runner.kinematics();
    assert_eq!(body.position, tuning.start);
    assert_eq!(body.velocity, Vec2::ZERO);
}

#[test]
fn clamped_axes_lose_their_velocity() {
    let tuning = empty_tank(Vec2::new(2.0, 300.0));
    let (mut runner, mut events) = started(tuning);
    let limits = runner.arena().agent_limits(tuning.diver_size);
    runner.set_input(HeldDirections::NONE.with(Direction::Left).with(Direction::Down));

    for _ in 0..120 {
        runner.tick(&mut events);
        let body = runner.kinematics();
        assert!((0.0..=limits.x).contains(&body.position.x));
        assert!((0.0..=limits.y).contains(&body.position.y));
        if body.position.x == 0.0 {
            assert_eq!(body.velocity.x, 0.0);
        }
        if body.position.y == limits.y {
            assert_eq!(body.velocity.y, 0.0);
        }
    }

    assert_eq!(runner.kinematics().position, Vec2::new(0.0, limits.y));
}

#[test]
fn surface_clamps_an_ascending_diver() {
    let tuning = empty_tank(Vec2::new(200.0, 10.0));
    let (mut runner, mut events) = started(tuning);
    runner.set_input(HeldDirections::NONE.with(Direction::Up));

    for _ in 0..60 {
        runner.tick(&mut events);
        let body = runner.kinematics();
        assert!(body.position.y >= 0.0);
        if body.position.y == 0.0 {
            assert_eq!(body.velocity.y, 0.0);
        }
    }
}

#[test]
fn treasure_and_obstacle_outcomes_stay_separate() {
    for seed in 0..8 {
        let mut runner = BuoyancyRunner::new(Tuning::default(), seed).expect("default tuning");
        let mut events = Vec::new();
        runner.start(&mut events);
        let pattern = [
            HeldDirections::NONE.with(Direction::Right).with(Direction::Down),
            HeldDirections::NONE.with(Direction::Down),
            HeldDirections::NONE.with(Direction::Left).with(Direction::Down),
            HeldDirections::NONE.with(Direction::Up),
        ];

        for held in pattern.into_iter().cycle().take(40) {
            let before = runner.run();
            events.clear();
            runner.set_input(held);
            runner.advance(Duration::from_millis(250), &mut events);
            let after = runner.run();

            let collected = events
                .iter()
                .filter(|event| matches!(event, DiveEvent::TreasureCollected { .. }))
                .count() as u32;
            let hits = events
                .iter()
                .filter(|event| matches!(event, DiveEvent::LifeLost { .. }))
                .count() as u32;

            assert_eq!(after.score, before.score + collected * 10);
            assert_eq!(before.lives - after.lives, hits);
            assert!(after.score >= before.score);
            assert!(after.time_remaining <= before.time_remaining);
        }
    }
}

#[test]
fn cooldown_absorbs_repeated_hits() {
    let tuning = empty_tank(Vec2::new(200.0, 100.0));
    let (mut runner, mut events) = started(tuning);
    runner.place_obstacle(Aabb::new(Vec2::new(150.0, 40.0), Vec2::splat(150.0)));

    runner.tick(&mut events);
    runner.tick(&mut events);
    assert_eq!(runner.run().lives, 2, "second overlap falls inside the window");

    runner.advance(Duration::from_millis(900), &mut events);
    assert_eq!(runner.run().lives, 2);

    runner.advance(Duration::from_millis(200), &mut events);
    assert_eq!(runner.run().lives, 1, "window expired after one second");
}

#[test]
fn countdown_ends_the_run_on_time() {
    let tuning = Tuning {
        time_limit: 2,
        ..empty_tank(Vec2::new(200.0, 100.0))
    };
    let (mut runner, mut events) = started(tuning);

    runner.advance(Duration::from_secs(5), &mut events);

    assert_eq!(runner.state(), GameState::Over);
    assert_eq!(runner.run().time_remaining, 0);
    let countdown: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            DiveEvent::TimeRemaining { seconds } => Some(*seconds),
            _ => None,
        })
        .collect();
    assert_eq!(countdown, vec![1, 0]);
    assert_eq!(
        events.last(),
        Some(&DiveEvent::GameOver {
            reason: GameOverReason::Time,
            final_score: 0,
        })
    );
}

#[test]
fn run_over_on_time_freezes_the_diver() {
    let tuning = Tuning {
        time_limit: 1,
        ..empty_tank(Vec2::new(200.0, 20.0))
    };
    let (mut runner, mut events) = started(tuning);
    runner.advance(Duration::from_secs(1), &mut events);
    assert_eq!(runner.state(), GameState::Over);

    let frozen = runner.snapshot();
    events.clear();
    runner.set_input(HeldDirections::NONE.with(Direction::Down));
    runner.tick(&mut events);
    runner.countdown_tick(&mut events);
    runner.advance(Duration::from_secs(10), &mut events);
    runner.start(&mut events);
    runner.toggle_pause(&mut events);

    assert!(events.is_empty());
    assert_eq!(runner.snapshot(), frozen);
    assert_eq!(runner.kinematics().position, frozen.diver.origin());
    assert_eq!(runner.run().time_remaining, 0);
}

#[test]
fn start_outside_a_narrow_arena_is_rejected() {
    let tuning = Tuning {
        arena_size: Vec2::new(150.0, 400.0),
        ..empty_tank(Vec2::new(200.0, 100.0))
    };

    assert_eq!(
        BuoyancyRunner::new(tuning, 0).map(|_| ()),
        Err(ArenaError::StartOutside {
            x: 200.0,
            y: 100.0,
            max_x: 118.0,
            max_y: 336.0,
        })
    );
}

#[test]
fn respawning_after_a_hit_stays_inside_the_arena() {
    let tuning = Tuning {
        arena_size: Vec2::new(150.0, 400.0),
        ..empty_tank(Vec2::new(100.0, 100.0))
    };
    let (mut runner, mut events) = started(tuning);
    runner.place_obstacle(Aabb::new(Vec2::new(100.0, 80.0), Vec2::splat(40.0)));

    runner.tick(&mut events);

    let limits = runner.arena().agent_limits(runner.tuning().diver_size);
    let position = runner.kinematics().position;
    assert_eq!(runner.run().lives, 2);
    assert!(position.cmpge(Vec2::ZERO).all());
    assert!(position.cmple(limits).all());
}

#[test]
fn finished_run_ignores_everything_but_reset() {
    let tuning = Tuning {
        lives: 1,
        ..empty_tank(Vec2::new(200.0, 100.0))
    };
    let (mut runner, mut events) = started(tuning);
    runner.place_obstacle(Aabb::new(Vec2::new(200.0, 100.0), Vec2::splat(30.0)));
    runner.tick(&mut events);
    assert_eq!(runner.state(), GameState::Over);

    let frozen = runner.snapshot();
    events.clear();
    runner.set_input(HeldDirections::NONE.with(Direction::Right));
    runner.tick(&mut events);
    runner.countdown_tick(&mut events);
    runner.advance(Duration::from_secs(10), &mut events);
    runner.start(&mut events);
    runner.toggle_pause(&mut events);

    assert!(events.is_empty());
    assert_eq!(runner.snapshot(), frozen);

    runner.reset(&mut events);
    assert_eq!(runner.state(), GameState::NotStarted);
    assert_eq!(runner.run().lives, 1);
}

#[test]
fn pause_freezes_the_clock() {
    let tuning = empty_tank(Vec2::new(200.0, 200.0));
    let (mut runner, mut events) = started(tuning);
    runner.advance(Duration::from_millis(100), &mut events);

    runner.toggle_pause(&mut events);
    assert_eq!(runner.state(), GameState::Paused);
    let paused = runner.snapshot();
    runner.set_input(HeldDirections::NONE.with(Direction::Down));
    runner.advance(Duration::from_secs(5), &mut events);
    assert_eq!(runner.snapshot(), paused);

    runner.toggle_pause(&mut events);
    runner.advance(Duration::from_millis(900), &mut events);
    assert_eq!(runner.run().time_remaining, 59);
    assert!(runner.kinematics().position.y > paused.diver.origin().y);
}

#[test]
fn collected_treasure_respawns_after_delay() {
    let tuning = empty_tank(Vec2::new(200.0, 100.0));
    let mut runner = BuoyancyRunner::new(tuning, 5).expect("valid tuning");
    let mut events = Vec::new();
    let _ = runner.place_treasure(
        Aabb::new(Vec2::new(200.0, 100.0), Vec2::splat(25.0)),
        &mut events,
    );
    runner.start(&mut events);
    runner.advance(Duration::from_millis(16), &mut events);
    assert!(runner.snapshot().treasures.is_empty());

    events.clear();
    runner.advance(Duration::from_millis(900), &mut events);
    assert!(!events
        .iter()
        .any(|event| matches!(event, DiveEvent::TreasureSpawned { .. })));

    runner.advance(Duration::from_millis(200), &mut events);
    assert!(events
        .iter()
        .any(|event| matches!(event, DiveEvent::TreasureSpawned { .. })));
}

#[test]
fn respawn_is_skipped_at_the_cap() {
    let tuning = Tuning {
        max_treasures: 1,
        ..empty_tank(Vec2::new(200.0, 100.0))
    };
    let mut runner = BuoyancyRunner::new(tuning, 5).expect("valid tuning");
    let mut events = Vec::new();
    let _ = runner.place_treasure(
        Aabb::new(Vec2::new(200.0, 100.0), Vec2::splat(25.0)),
        &mut events,
    );
    runner.start(&mut events);
    runner.tick(&mut events);
    let _ = runner
        .place_treasure(
            Aabb::new(Vec2::new(500.0, 300.0), Vec2::splat(25.0)),
            &mut events,
        )
        .expect("pool emptied by collection");

    events.clear();
    runner.advance(Duration::from_secs(2), &mut events);
    assert_eq!(runner.snapshot().treasures.len(), 1);
    assert!(!events
        .iter()
        .any(|event| matches!(event, DiveEvent::TreasureSpawned { .. })));
}

#[test]
fn reset_keeps_obstacles_and_refills_treasure() {
    let mut runner = BuoyancyRunner::new(Tuning::default(), 11).expect("default tuning");
    let mut events = Vec::new();
    let obstacles = runner.snapshot().obstacles;

    runner.start(&mut events);
    runner.advance(Duration::from_secs(3), &mut events);
    runner.reset(&mut events);

    let snapshot = runner.snapshot();
    assert_eq!(snapshot.obstacles, obstacles);
    assert_eq!(snapshot.treasures.len(), 3);
    assert_eq!(snapshot.state, GameState::NotStarted);
    assert_eq!(snapshot.run.time_remaining, 60);
    assert_eq!(snapshot.run.score, 0);
    assert_eq!(snapshot.diver.origin(), Vec2::new(200.0, 100.0));

    events.clear();
    runner.advance(Duration::from_secs(3), &mut events);
    assert!(events.is_empty(), "timers cancelled by reset");
}

#[test]
fn start_only_fires_from_not_started() {
    let mut runner = BuoyancyRunner::new(Tuning::default(), 3).expect("default tuning");
    let mut events = Vec::new();

    runner.apply(DiveCommand::Start, &mut events);
    runner.apply(DiveCommand::Start, &mut events);

    assert_eq!(
        events,
        vec![DiveEvent::GameStateChanged {
            state: GameState::Running,
        }]
    );
}

#[test]
fn apply_routes_commands() {
    let mut runner = BuoyancyRunner::new(empty_tank(Vec2::new(200.0, 200.0)), 3)
        .expect("valid tuning");
    let mut events = Vec::new();

    runner.apply(DiveCommand::Start, &mut events);
    runner.apply(
        DiveCommand::SetInput {
            held: HeldDirections::NONE.with(Direction::Right),
        },
        &mut events,
    );
    runner.apply(
        DiveCommand::Tick {
            dt: Duration::from_millis(160),
        },
        &mut events,
    );
    assert!(runner.kinematics().position.x > 200.0);

    runner.apply(DiveCommand::TogglePause, &mut events);
    assert_eq!(runner.state(), GameState::Paused);
    runner.apply(DiveCommand::Reset, &mut events);
    assert_eq!(runner.state(), GameState::NotStarted);
}
