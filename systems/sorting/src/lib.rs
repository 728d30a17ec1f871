#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sorting-algorithm visualizer that replays planned steps on a timer.
//!
//! A run is planned eagerly on a copy of the array with [`plan`]; the
//! animator then applies one step each time its delay elapses.

use std::{collections::VecDeque, ops::RangeInclusive, time::Duration};

use playground_core::{SortAlgorithm, SortCommand, SortEvent, SortState, SortStep, StepPace};
use playground_scheduler::Scheduler;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(300);
const DEFAULT_LENGTH: usize = 10;
const VALUE_RANGE: RangeInclusive<u32> = 10..=99;

/// Configuration parameters required to construct the animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    step_interval: Duration,
    length: usize,
}

impl Config {
    /// Creates a configuration with the provided step cadence and array length.
    #[must_use]
    pub const fn new(step_interval: Duration, length: usize) -> Self {
        Self {
            step_interval,
            length,
        }
    }

    /// Delay of a full-paced step.
    #[must_use]
    pub const fn step_interval(&self) -> Duration {
        self.step_interval
    }

    /// Number of values generated per array.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    fn delay(&self, pace: StepPace) -> Duration {
        match pace {
            StepPace::Full => self.step_interval,
            StepPace::Half => self.step_interval / 2,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_INTERVAL, DEFAULT_LENGTH)
    }
}

/// Outcome of a run request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum RunOutcome {
    /// The run was planned and its replay began.
    Started {
        /// Number of planned steps.
        steps: u32,
    },
    /// Another run is still animating.
    Rejected,
}

/// Plans every visual step `algorithm` takes to sort `values` ascending.
///
/// Applying the steps in order with [`apply_step`] sorts a copy of `values`.
#[must_use]
pub fn plan(algorithm: SortAlgorithm, values: &[u32]) -> Vec<SortStep> {
    let mut scratch = values.to_vec();
    let mut steps = Vec::new();

    match algorithm {
        SortAlgorithm::Bubble => bubble(&mut scratch, &mut steps),
        SortAlgorithm::Selection => selection(&mut scratch, &mut steps),
        SortAlgorithm::Insertion => insertion(&mut scratch, &mut steps),
        SortAlgorithm::Quick => quick(&mut scratch, &mut steps),
    }

    steps
}

/// Applies a single step to `values`; comparisons and pivots leave it untouched.
pub fn apply_step(values: &mut [u32], step: SortStep) {
    match step {
        SortStep::Swap { left, right } => {
            if left < values.len() && right < values.len() {
                values.swap(left, right);
            }
        }
        SortStep::Overwrite { index, value } => {
            if let Some(slot) = values.get_mut(index) {
                *slot = value;
            }
        }
        SortStep::Compare { .. } | SortStep::Pivot { .. } => {}
    }
}

fn record(values: &mut [u32], steps: &mut Vec<SortStep>, step: SortStep) {
    apply_step(values, step);
    steps.push(step);
}

fn bubble(values: &mut [u32], steps: &mut Vec<SortStep>) {
    let n = values.len();
    for pass in 0..n.saturating_sub(1) {
        for j in 0..n - pass - 1 {
            record(
                values,
                steps,
                SortStep::Compare {
                    left: j,
                    right: j + 1,
                    pace: StepPace::Full,
                },
            );
            if values[j] > values[j + 1] {
                record(values, steps, SortStep::Swap { left: j, right: j + 1 });
            }
        }
    }
}

fn selection(values: &mut [u32], steps: &mut Vec<SortStep>) {
    let n = values.len();
    for i in 0..n.saturating_sub(1) {
        let mut min_index = i;
        for j in i + 1..n {
            record(
                values,
                steps,
                SortStep::Compare {
                    left: min_index,
                    right: j,
                    pace: StepPace::Half,
                },
            );
            if values[j] < values[min_index] {
                min_index = j;
            }
        }
        if min_index != i {
            record(
                values,
                steps,
                SortStep::Swap {
                    left: i,
                    right: min_index,
                },
            );
        }
    }
}

fn insertion(values: &mut [u32], steps: &mut Vec<SortStep>) {
    for i in 1..values.len() {
        let key = values[i];
        record(values, steps, SortStep::Pivot { index: i });

        let mut hole = i;
        while hole > 0 {
            record(
                values,
                steps,
                SortStep::Compare {
                    left: hole - 1,
                    right: hole,
                    pace: StepPace::Half,
                },
            );
            if values[hole - 1] <= key {
                break;
            }
            let shifted = values[hole - 1];
            record(
                values,
                steps,
                SortStep::Overwrite {
                    index: hole,
                    value: shifted,
                },
            );
            hole -= 1;
        }

        record(
            values,
            steps,
            SortStep::Overwrite {
                index: hole,
                value: key,
            },
        );
    }
}

fn quick(values: &mut [u32], steps: &mut Vec<SortStep>) {
    let mut ranges = Vec::new();
    if values.len() > 1 {
        ranges.push((0, values.len() - 1));
    }

    while let Some((low, high)) = ranges.pop() {
        let pivot = partition(values, steps, low, high);
        if pivot + 1 < high {
            ranges.push((pivot + 1, high));
        }
        if pivot > low + 1 {
            ranges.push((low, pivot - 1));
        }
    }
}

fn partition(values: &mut [u32], steps: &mut Vec<SortStep>, low: usize, high: usize) -> usize {
    let pivot = values[high];
    record(values, steps, SortStep::Pivot { index: high });

    let mut boundary = low;
    for j in low..high {
        record(
            values,
            steps,
            SortStep::Compare {
                left: j,
                right: high,
                pace: StepPace::Half,
            },
        );
        if values[j] < pivot {
            record(
                values,
                steps,
                SortStep::Swap {
                    left: boundary,
                    right: j,
                },
            );
            boundary += 1;
        }
    }

    record(
        values,
        steps,
        SortStep::Swap {
            left: boundary,
            right: high,
        },
    );
    boundary
}

#[derive(Clone, Copy, Debug)]
struct NextStep;

#[derive(Clone, Copy, Debug)]
struct ActiveRun {
    algorithm: SortAlgorithm,
    comparisons: u32,
    writes: u32,
}

/// Pure state machine behind the sorting visualizer.
#[derive(Debug)]
pub struct SortAnimator {
    config: Config,
    original: Vec<u32>,
    values: Vec<u32>,
    state: SortState,
    pending: VecDeque<SortStep>,
    active: Option<ActiveRun>,
    scheduler: Scheduler<NextStep>,
}

impl SortAnimator {
    /// Creates an animator holding an array generated from `seed`.
    #[must_use]
    pub fn new(config: Config, seed: u64) -> Self {
        let values = generate_values(config.length, seed);
        Self {
            config,
            original: values.clone(),
            values,
            state: SortState::Idle,
            pending: VecDeque::new(),
            active: None,
            scheduler: Scheduler::new(),
        }
    }

    /// Applies a host command, appending the resulting events to `out`.
    pub fn apply(&mut self, command: SortCommand, out: &mut Vec<SortEvent>) {
        match command {
            SortCommand::Generate { seed } => self.generate(seed, out),
            SortCommand::Reset => self.reset(out),
            SortCommand::Run { algorithm } => {
                let _ = self.run(algorithm, out);
            }
            SortCommand::Tick { dt } => self.advance(dt, out),
        }
    }

    /// Replaces the array with fresh values; ignored while animating.
    pub fn generate(&mut self, seed: u64, out: &mut Vec<SortEvent>) {
        if self.state == SortState::Animating {
            return;
        }

        self.original = generate_values(self.config.length, seed);
        self.values = self.original.clone();
        self.state = SortState::Idle;
        out.push(SortEvent::ArrayGenerated {
            values: self.values.clone(),
        });
    }

    /// Restores the most recently generated array; ignored while animating.
    pub fn reset(&mut self, out: &mut Vec<SortEvent>) {
        if self.state == SortState::Animating {
            return;
        }

        self.values = self.original.clone();
        self.state = SortState::Idle;
        out.push(SortEvent::ArrayReset);
    }

    /// Plans `algorithm` over the current array and starts replaying it.
    pub fn run(&mut self, algorithm: SortAlgorithm, out: &mut Vec<SortEvent>) -> RunOutcome {
        if self.state == SortState::Animating {
            debug!(%algorithm, "run rejected while animating");
            return RunOutcome::Rejected;
        }

        let steps = plan(algorithm, &self.values);
        let count = u32::try_from(steps.len()).unwrap_or(u32::MAX);
        debug!(%algorithm, steps = count, "sort started");

        self.pending = steps.into();
        self.active = Some(ActiveRun {
            algorithm,
            comparisons: 0,
            writes: 0,
        });
        self.state = SortState::Animating;
        out.push(SortEvent::SortStarted {
            algorithm,
            steps: count,
        });
        self.arm_next(out);

        RunOutcome::Started { steps: count }
    }

    /// Advances the animation clock, applying every step that falls due.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<SortEvent>) {
        self.scheduler.advance(dt);
        while let Some(NextStep) = self.scheduler.pop_due() {
            let Some(step) = self.pending.pop_front() else {
                continue;
            };

            apply_step(&mut self.values, step);
            if let Some(active) = self.active.as_mut() {
                match step {
                    SortStep::Compare { .. } => active.comparisons += 1,
                    SortStep::Swap { .. } | SortStep::Overwrite { .. } => active.writes += 1,
                    SortStep::Pivot { .. } => {}
                }
            }
            out.push(SortEvent::StepApplied { step });
            self.arm_next(out);
        }
    }

    /// Current array contents.
    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Most recently generated array.
    #[must_use]
    pub fn original(&self) -> &[u32] {
        &self.original
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SortState {
        self.state
    }

    /// Step that will be applied next, if a run is animating.
    #[must_use]
    pub fn upcoming(&self) -> Option<SortStep> {
        self.pending.front().copied()
    }

    fn arm_next(&mut self, out: &mut Vec<SortEvent>) {
        match self.pending.front() {
            Some(step) => {
                let delay = self.config.delay(step.pace());
                let _ = self.scheduler.schedule_once(delay, NextStep);
            }
            None => self.finish(out),
        }
    }

    fn finish(&mut self, out: &mut Vec<SortEvent>) {
        self.state = SortState::Sorted;
        if let Some(active) = self.active.take() {
            info!(
                algorithm = %active.algorithm,
                comparisons = active.comparisons,
                writes = active.writes,
                "sort finished"
            );
            out.push(SortEvent::SortFinished {
                algorithm: active.algorithm,
                comparisons: active.comparisons,
                writes: active.writes,
            });
        }
    }
}

fn generate_values(length: usize, seed: u64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..length).map(|_| rng.gen_range(VALUE_RANGE)).collect()
}
