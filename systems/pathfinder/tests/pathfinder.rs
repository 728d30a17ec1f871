use std::time::Duration;

use playground_core::{CellCoord, Direction, MazeCommand, MazeEvent, MoveResult, SolverState};
use playground_system_pathfinder::{AutoSolve, Config, GridPathfinder, Solution};
use playground_world::{Grid, CLASSIC_START};
use proptest::prelude::*;

const REPLAY: Duration = Duration::from_millis(500);

fn corridor() -> GridPathfinder {
    let grid = Grid::parse(
        "
        ##########
        #........#
        ########.#
        ########.#
        ########.#
        ########.#
        ##########
        ",
    )
    .expect("valid corridor");

    GridPathfinder::new(
        grid,
        CellCoord::new(1, 1),
        CellCoord::new(8, 5),
        Config::new(REPLAY),
    )
    .expect("landmarks are open")
}

#[test]
fn corridor_solution_follows_the_only_route() {
    let pathfinder = corridor();
    let solution = pathfinder.solve();
    let path = solution.path().expect("corridor is solvable");

    assert_eq!(
        path.len(),
        CellCoord::new(1, 1).manhattan_distance(CellCoord::new(8, 5)) as usize
    );
    assert_eq!(path.cells().first(), Some(&CellCoord::new(2, 1)));
    assert_eq!(path.cells().last(), Some(&CellCoord::new(8, 5)));
}

#[test]
fn replay_reaches_goal_with_one_move_per_step() {
    let mut pathfinder = corridor();
    let mut events = Vec::new();

    let outcome = pathfinder.auto_solve(&mut events);
    assert_eq!(outcome, AutoSolve::Started { steps: 11 });
    assert_eq!(pathfinder.solver(), SolverState::AutoSolving);
    assert_eq!(pathfinder.move_count(), 1, "first step is immediate");

    pathfinder.advance(REPLAY * 9, &mut events);
    assert_eq!(pathfinder.move_count(), 10);
    assert_eq!(pathfinder.solver(), SolverState::AutoSolving);

    pathfinder.advance(REPLAY * 5, &mut events);
    assert_eq!(pathfinder.solver(), SolverState::Complete);
    assert_eq!(pathfinder.agent(), CellCoord::new(8, 5));
    assert_eq!(pathfinder.move_count(), 11);
    assert_eq!(
        events.last(),
        Some(&MazeEvent::GoalReached { move_count: 11 })
    );
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, MazeEvent::GoalReached { .. }))
            .count(),
        1
    );
}

#[test]
fn enclosed_goal_is_not_found() {
    let grid = Grid::parse(
        "
        #######
        #.....#
        #..####
        #..#.##
        #..####
        #######
        ",
    )
    .expect("valid picture");
    let mut pathfinder = GridPathfinder::new(
        grid,
        CellCoord::new(1, 1),
        CellCoord::new(4, 3),
        Config::default(),
    )
    .expect("landmarks are open");

    assert_eq!(pathfinder.solve(), Solution::NotFound);

    let mut events = Vec::new();
    assert_eq!(pathfinder.auto_solve(&mut events), AutoSolve::NotFound);
    assert_eq!(events, vec![MazeEvent::PathNotFound]);
    assert_eq!(pathfinder.solver(), SolverState::Idle);
}

#[test]
fn blocked_moves_leave_state_untouched() {
    let mut pathfinder = GridPathfinder::classic(Config::default());
    let before = pathfinder.snapshot();
    let mut events = Vec::new();

    assert_eq!(
        pathfinder.try_move(Direction::Up, &mut events),
        MoveResult::Blocked
    );
    assert_eq!(
        pathfinder.try_move(Direction::Left, &mut events),
        MoveResult::Blocked
    );

    assert_eq!(pathfinder.snapshot(), before);
    assert_eq!(
        events,
        vec![
            MazeEvent::MoveBlocked {
                from: CLASSIC_START,
                direction: Direction::Up,
            },
            MazeEvent::MoveBlocked {
                from: CLASSIC_START,
                direction: Direction::Left,
            },
        ]
    );
}

#[test]
fn edge_of_grid_blocks_moves() {
    let grid = Grid::parse("..").expect("two cells");
    let mut pathfinder = GridPathfinder::new(
        grid,
        CellCoord::new(0, 0),
        CellCoord::new(1, 0),
        Config::default(),
    )
    .expect("landmarks are open");
    let mut events = Vec::new();

    assert_eq!(
        pathfinder.try_move(Direction::Left, &mut events),
        MoveResult::Blocked
    );
    assert_eq!(
        pathfinder.try_move(Direction::Down, &mut events),
        MoveResult::Blocked
    );
    assert_eq!(pathfinder.agent(), CellCoord::new(0, 0));
}

#[test]
fn manual_moves_are_rejected_while_replaying_and_after_completion() {
    let mut pathfinder = GridPathfinder::classic(Config::default());
    let mut events = Vec::new();
    let _ = pathfinder.auto_solve(&mut events);

    let before = pathfinder.snapshot();
    assert_eq!(
        pathfinder.try_move(Direction::Down, &mut events),
        MoveResult::Rejected
    );
    assert_eq!(pathfinder.snapshot(), before);
    assert_eq!(pathfinder.auto_solve(&mut events), AutoSolve::Rejected);

    pathfinder.advance(Duration::from_secs(60), &mut events);
    assert_eq!(pathfinder.solver(), SolverState::Complete);
    assert_eq!(
        pathfinder.try_move(Direction::Left, &mut events),
        MoveResult::Rejected
    );
}

#[test]
fn manual_walk_completes_the_classic_maze() {
    let mut pathfinder = GridPathfinder::classic(Config::default());
    let mut events = Vec::new();
    let route = [
        Direction::Down,
        Direction::Down,
        Direction::Right,
        Direction::Right,
        Direction::Down,
        Direction::Down,
        Direction::Right,
        Direction::Right,
        Direction::Right,
        Direction::Right,
        Direction::Right,
    ];

    for direction in route {
        assert_eq!(
            pathfinder.try_move(direction, &mut events),
            MoveResult::Moved
        );
    }

    assert_eq!(pathfinder.solver(), SolverState::Complete);
    assert_eq!(pathfinder.move_count(), 11);
    assert!(events.contains(&MazeEvent::GoalReached { move_count: 11 }));
}

#[test]
fn reset_cancels_replay() {
    let mut pathfinder = GridPathfinder::classic(Config::default());
    let mut events = Vec::new();
    let _ = pathfinder.auto_solve(&mut events);
    pathfinder.advance(REPLAY * 2, &mut events);
    assert_eq!(pathfinder.move_count(), 3);

    pathfinder.reset(&mut events);
    events.clear();
    let after_reset = pathfinder.snapshot();

    pathfinder.advance(Duration::from_secs(30), &mut events);
    assert!(events.is_empty(), "cancelled replay must stay silent");
    assert_eq!(pathfinder.snapshot(), after_reset);
    assert_eq!(after_reset.agent, CLASSIC_START);
    assert_eq!(after_reset.move_count, 0);
    assert_eq!(after_reset.solver, SolverState::Idle);
}

#[test]
fn reset_is_idempotent() {
    let mut pathfinder = GridPathfinder::classic(Config::default());
    let mut events = Vec::new();
    let _ = pathfinder.try_move(Direction::Down, &mut events);

    pathfinder.reset(&mut events);
    let once = pathfinder.snapshot();
    pathfinder.reset(&mut events);
    assert_eq!(pathfinder.snapshot(), once);
}

#[test]
fn apply_routes_commands() {
    let mut pathfinder = GridPathfinder::classic(Config::default());
    let mut events = Vec::new();

    pathfinder.apply(
        MazeCommand::Step {
            direction: Direction::Down,
        },
        &mut events,
    );
    assert_eq!(pathfinder.agent(), CellCoord::new(1, 2));

    pathfinder.apply(MazeCommand::AutoSolve, &mut events);
    pathfinder.apply(MazeCommand::Tick { dt: REPLAY * 20 }, &mut events);
    assert_eq!(pathfinder.solver(), SolverState::Complete);

    pathfinder.apply(MazeCommand::Reset, &mut events);
    assert_eq!(pathfinder.agent(), CLASSIC_START);
}

#[test]
fn construction_rejects_walled_landmarks() {
    let result = GridPathfinder::new(
        Grid::classic(),
        CellCoord::new(0, 0),
        CellCoord::new(8, 5),
        Config::default(),
    );
    assert!(result.is_err());
}

fn any_direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #[test]
    fn accepted_moves_are_counted_exactly(moves in prop::collection::vec(any_direction(), 0..40)) {
        let mut pathfinder = GridPathfinder::classic(Config::default());
        let mut events = Vec::new();
        let mut accepted = 0;

        for direction in moves {
            let before = pathfinder.snapshot();
            match pathfinder.try_move(direction, &mut events) {
                MoveResult::Moved => {
                    accepted += 1;
                    prop_assert_eq!(before.agent.manhattan_distance(pathfinder.agent()), 1);
                }
                MoveResult::Blocked | MoveResult::Rejected => {
                    prop_assert_eq!(pathfinder.snapshot(), before);
                }
            }
            prop_assert!(pathfinder.grid().is_open(pathfinder.agent()));
            prop_assert_eq!(pathfinder.move_count(), accepted);
        }

        pathfinder.reset(&mut events);
        prop_assert_eq!(pathfinder.move_count(), 0);
    }
}
