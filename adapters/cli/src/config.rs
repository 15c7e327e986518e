//! Layered game configuration: defaults, then an optional TOML file, then flags.

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use robot_merge_core::{Adjacency, SpawnPolicy};
use robot_merge_system_spawning::{Config as SpawningConfig, DEFAULT_SPAWN_INTERVAL};
use robot_merge_world::WorldConfig;
use serde::Deserialize;

/// Command-line flags accepted by the binary.
#[derive(Debug, Parser)]
#[command(name = "robot-merge", about = "Move and merge robots on a 5x5 board")]
pub(crate) struct Args {
    /// Seed for every random draw the board makes.
    #[arg(long)]
    seed: Option<u64>,
    /// When uncontrolled robots appear.
    #[arg(long, value_enum)]
    spawn_policy: Option<SpawnPolicyArg>,
    /// Milliseconds between automatic spawns under the on-tick policy.
    #[arg(long)]
    tick_interval_ms: Option<u64>,
    /// Which tiles count as neighbours of the controlled robot.
    #[arg(long, value_enum)]
    adjacency: Option<AdjacencyArg>,
    /// TOML file with default values for the flags above.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, action = ArgAction::Set)]
    vsync: Option<bool>,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SpawnPolicyArg {
    PlayerDriven,
    OnTick,
}

impl From<SpawnPolicyArg> for SpawnPolicy {
    fn from(value: SpawnPolicyArg) -> Self {
        match value {
            SpawnPolicyArg::PlayerDriven => Self::PlayerDriven,
            SpawnPolicyArg::OnTick => Self::OnTick,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AdjacencyArg {
    FlatOffsets,
    Geometric,
}

impl From<AdjacencyArg> for Adjacency {
    fn from(value: AdjacencyArg) -> Self {
        match value {
            AdjacencyArg::FlatOffsets => Self::FlatOffsets,
            AdjacencyArg::Geometric => Self::Geometric,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    seed: Option<u64>,
    spawn_policy: Option<SpawnPolicy>,
    tick_interval_ms: Option<u64>,
    adjacency: Option<Adjacency>,
    vsync: Option<bool>,
    show_fps: Option<bool>,
}

/// Fully resolved settings for one game session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GameConfig {
    pub(crate) world: WorldConfig,
    pub(crate) spawning: SpawningConfig,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl GameConfig {
    /// Reads the optional config file named by `args` and layers the flags on top.
    pub(crate) fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                parse_file_config(&contents)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => FileConfig::default(),
        };
        Ok(merge(file, args))
    }
}

fn parse_file_config(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).context("failed to parse config toml contents")
}

fn merge(file: FileConfig, args: &Args) -> GameConfig {
    let defaults = WorldConfig::default();
    let seed = args.seed.or(file.seed).unwrap_or(defaults.seed());
    let adjacency = args
        .adjacency
        .map(Adjacency::from)
        .or(file.adjacency)
        .unwrap_or(defaults.adjacency());
    let policy = args
        .spawn_policy
        .map(SpawnPolicy::from)
        .or(file.spawn_policy)
        .unwrap_or_default();
    let spawn_interval = args
        .tick_interval_ms
        .or(file.tick_interval_ms)
        .map_or(DEFAULT_SPAWN_INTERVAL, Duration::from_millis);

    GameConfig {
        world: WorldConfig::new(seed, adjacency),
        spawning: SpawningConfig::new(policy, spawn_interval),
        vsync: args.vsync.or(file.vsync).unwrap_or(true),
        show_fps: args.show_fps || file.show_fps.unwrap_or(false),
    }
}
