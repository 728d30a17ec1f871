//! TOML settings file shared by every subcommand.

use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use glam::Vec2;
use playground_system_diving::Tuning;
use playground_system_pathfinder::Config as MazeConfig;
use playground_system_sorting::Config as SortConfig;
use serde::Deserialize;
use tracing::debug;

/// Settings loaded from an optional TOML file; absent fields keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) maze: MazeSettings,
    pub(crate) dive: DiveSettings,
    pub(crate) sort: SortSettings,
    pub(crate) display: DisplaySettings,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MazeSettings {
    pub(crate) replay_interval_ms: u64,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            replay_interval_ms: millis(MazeConfig::default().replay_interval()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DiveSettings {
    pub(crate) gravity: f32,
    pub(crate) buoyancy: f32,
    pub(crate) air_resistance: f32,
    pub(crate) water_resistance: f32,
    pub(crate) move_speed: f32,
    pub(crate) arena_width: f32,
    pub(crate) arena_height: f32,
    pub(crate) water_line: f32,
    pub(crate) seabed_depth: f32,
    pub(crate) treasure_value: u32,
    pub(crate) max_treasures: usize,
    pub(crate) lives: u32,
    pub(crate) time_limit: u32,
    pub(crate) tick_ms: u64,
    pub(crate) countdown_ms: u64,
    pub(crate) hit_cooldown_ms: u64,
    pub(crate) respawn_delay_ms: u64,
}

impl Default for DiveSettings {
    fn default() -> Self {
        let tuning = Tuning::default();
        Self {
            gravity: tuning.gravity,
            buoyancy: tuning.buoyancy,
            air_resistance: tuning.air_resistance,
            water_resistance: tuning.water_resistance,
            move_speed: tuning.move_speed,
            arena_width: tuning.arena_size.x,
            arena_height: tuning.arena_size.y,
            water_line: tuning.water_line,
            seabed_depth: tuning.seabed_depth,
            treasure_value: tuning.treasure_value,
            max_treasures: tuning.max_treasures,
            lives: tuning.lives,
            time_limit: tuning.time_limit,
            tick_ms: millis(tuning.tick_interval),
            countdown_ms: millis(tuning.countdown_interval),
            hit_cooldown_ms: millis(tuning.hit_cooldown),
            respawn_delay_ms: millis(tuning.respawn_delay),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SortSettings {
    pub(crate) step_interval_ms: u64,
    pub(crate) length: usize,
}

impl Default for SortSettings {
    fn default() -> Self {
        let config = SortConfig::default();
        Self {
            step_interval_ms: millis(config.step_interval()),
            length: config.length(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DisplaySettings {
    pub(crate) arena_columns: usize,
    pub(crate) arena_rows: usize,
    pub(crate) bar_height: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            arena_columns: 60,
            arena_rows: 20,
            bar_height: 10,
        }
    }
}

impl Settings {
    /// Reads the settings file at `path`, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file at {}", path.display()))?;
        let settings = Self::parse(&contents)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parses settings from TOML text and validates timer intervals and dive physics.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(contents).context("failed to parse settings toml contents")?;

        ensure!(
            settings.maze.replay_interval_ms > 0,
            "maze.replay_interval_ms must be positive"
        );
        ensure!(settings.dive.tick_ms > 0, "dive.tick_ms must be positive");
        ensure!(
            settings.dive.countdown_ms > 0,
            "dive.countdown_ms must be positive"
        );
        ensure!(
            settings.sort.step_interval_ms > 1,
            "sort.step_interval_ms must be at least 2"
        );

        let dive = &settings.dive;
        ensure!(dive.gravity > 0.0, "dive.gravity must be positive");
        ensure!(
            dive.gravity + dive.buoyancy < 0.0,
            "dive.buoyancy must outweigh gravity so a submerged diver rises \
             (gravity {} + buoyancy {} is not negative)",
            dive.gravity,
            dive.buoyancy
        );
        ensure!(
            0.0 < dive.water_resistance
                && dive.water_resistance < dive.air_resistance
                && dive.air_resistance < 1.0,
            "resistances must satisfy 0 < water_resistance < air_resistance < 1 \
             (water {}, air {})",
            dive.water_resistance,
            dive.air_resistance
        );

        Ok(settings)
    }

    pub(crate) fn maze_config(&self) -> MazeConfig {
        MazeConfig::new(Duration::from_millis(self.maze.replay_interval_ms))
    }

    pub(crate) fn tuning(&self) -> Tuning {
        let dive = &self.dive;
        Tuning {
            gravity: dive.gravity,
            buoyancy: dive.buoyancy,
            air_resistance: dive.air_resistance,
            water_resistance: dive.water_resistance,
            move_speed: dive.move_speed,
            arena_size: Vec2::new(dive.arena_width, dive.arena_height),
            water_line: dive.water_line,
            seabed_depth: dive.seabed_depth,
            treasure_value: dive.treasure_value,
            max_treasures: dive.max_treasures,
            lives: dive.lives,
            time_limit: dive.time_limit,
            tick_interval: Duration::from_millis(dive.tick_ms),
            countdown_interval: Duration::from_millis(dive.countdown_ms),
            hit_cooldown: Duration::from_millis(dive.hit_cooldown_ms),
            respawn_delay: Duration::from_millis(dive.respawn_delay_ms),
            ..Tuning::default()
        }
    }

    pub(crate) fn sort_config(&self) -> SortConfig {
        SortConfig::new(
            Duration::from_millis(self.sort.step_interval_ms),
            self.sort.length,
        )
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
