#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for emitting robot spawn commands.
//!
//! Whenever the world releases control, the system requests a fresh controlled
//! robot so the player always has something to move. Under
//! [`SpawnPolicy::OnTick`] it additionally requests one uncontrolled robot per
//! elapsed spawn interval.

use std::time::Duration;

use robot_merge_core::{Command, Event, SpawnPolicy};

/// Interval between automatic spawns under [`SpawnPolicy::OnTick`].
pub const DEFAULT_SPAWN_INTERVAL: Duration = Duration::from_millis(1_000);

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    policy: SpawnPolicy,
    spawn_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided policy and spawn cadence.
    #[must_use]
    pub const fn new(policy: SpawnPolicy, spawn_interval: Duration) -> Self {
        Self {
            policy,
            spawn_interval,
        }
    }

    /// Policy deciding whether ticks spawn robots.
    #[must_use]
    pub const fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    /// Time that must elapse between automatic spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(SpawnPolicy::default(), DEFAULT_SPAWN_INTERVAL)
    }
}

/// Pure system that turns world events into spawn commands.
#[derive(Debug)]
pub struct Spawning {
    policy: SpawnPolicy,
    spawn_interval: Duration,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            policy: config.policy,
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes events to emit spawn commands in event order.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::ControlReleased => out.push(Command::SpawnControlledRobot),
                Event::TimeAdvanced { dt } if self.policy == SpawnPolicy::OnTick => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                    for _ in 0..self.resolve_spawn_attempts() {
                        out.push(Command::SpawnRobot);
                    }
                }
                _ => {}
            }
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }
}
