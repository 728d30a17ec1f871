//! Message surface of the sorting-algorithm visualizer.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

/// Sorting algorithms the visualizer can animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    /// Repeatedly swaps adjacent out-of-order pairs.
    Bubble,
    /// Selects the minimum of the unsorted tail and swaps it to the front.
    Selection,
    /// Shifts each element left into the sorted prefix.
    Insertion,
    /// Recursive Lomuto-partition quick sort with the last element as pivot.
    Quick,
}

impl SortAlgorithm {
    /// Every algorithm in presentation order.
    pub const ALL: [SortAlgorithm; 4] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Selection,
        SortAlgorithm::Insertion,
        SortAlgorithm::Quick,
    ];

    /// Lowercase name used on the command line and in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Selection => "selection",
            Self::Insertion => "insertion",
            Self::Quick => "quick",
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown sort algorithm `{value}`"))
    }
}

/// How long a step lingers relative to the configured step interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepPace {
    /// The full step interval.
    Full,
    /// Half the step interval; used for scanning comparisons.
    Half,
}

/// One visual step of a sorting run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortStep {
    /// Two positions are being compared.
    Compare {
        /// Left-hand index of the comparison.
        left: usize,
        /// Right-hand index of the comparison.
        right: usize,
        /// How long the step lingers.
        pace: StepPace,
    },
    /// Two positions exchange their values.
    Swap {
        /// First index of the exchange.
        left: usize,
        /// Second index of the exchange.
        right: usize,
    },
    /// A position receives a new value; used by insertion sort shifts.
    Overwrite {
        /// Index written to.
        index: usize,
        /// Value stored at the index.
        value: u32,
    },
    /// A position is highlighted as the current pivot or key.
    Pivot {
        /// Highlighted index.
        index: usize,
    },
}

impl SortStep {
    /// Pace at which the step is replayed.
    #[must_use]
    pub const fn pace(&self) -> StepPace {
        match self {
            Self::Compare { pace, .. } => *pace,
            Self::Swap { .. } | Self::Overwrite { .. } | Self::Pivot { .. } => StepPace::Full,
        }
    }

    /// Indices the host should highlight while the step is shown.
    #[must_use]
    pub fn highlighted(&self) -> Vec<usize> {
        match *self {
            Self::Compare { left, right, .. } | Self::Swap { left, right } => vec![left, right],
            Self::Overwrite { index, .. } | Self::Pivot { index } => vec![index],
        }
    }
}

/// Lifecycle of the visualizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SortState {
    /// Waiting for the player to pick an algorithm.
    #[default]
    Idle,
    /// Replaying a planned step list; other requests are rejected.
    Animating,
    /// The last run completed; the array is sorted.
    Sorted,
}

/// Commands the host may submit to the sorting visualizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortCommand {
    /// Replaces the array with freshly generated values.
    Generate {
        /// Seed for the value generator.
        seed: u64,
    },
    /// Restores the most recently generated array.
    Reset,
    /// Starts animating the provided algorithm.
    Run {
        /// Algorithm to animate.
        algorithm: SortAlgorithm,
    },
    /// Advances the visualizer clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the sorting visualizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SortEvent {
    /// A new array was generated.
    ArrayGenerated {
        /// Values of the new array.
        values: Vec<u32>,
    },
    /// The array was restored to its generated order.
    ArrayReset,
    /// A run started.
    SortStarted {
        /// Algorithm being animated.
        algorithm: SortAlgorithm,
        /// Number of planned steps.
        steps: u32,
    },
    /// A planned step was applied to the array.
    StepApplied {
        /// Step that was applied.
        step: SortStep,
    },
    /// The run completed.
    SortFinished {
        /// Algorithm that completed.
        algorithm: SortAlgorithm,
        /// Comparisons performed.
        comparisons: u32,
        /// Swaps and overwrites performed.
        writes: u32,
    },
}
