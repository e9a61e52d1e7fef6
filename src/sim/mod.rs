//! Game simulation module
//!
//! Owns the runner game state. The [`World`] is the only place that mutates
//! it; everything else reads snapshots.

pub mod geometry;
pub mod runner;

pub use geometry::Rect;
pub use runner::{
    Obstacle, RunnerConfig, RunnerSimulation, RunnerSnapshot, RunnerState, TickEvents,
};

/// Game world state
pub struct World {
    /// Total number of simulation ticks elapsed (paused frames excluded)
    tick_count: u64,
    /// Whether the simulation is paused
    paused: bool,
    /// Random number generator seed
    rng_seed: u64,
    runner: RunnerSimulation,
}

impl World {
    /// Creates a world with default runner constants and a random seed
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world with the given runner constants and seed
    pub fn with_config(config: RunnerConfig, seed: u64) -> Self {
        Self {
            tick_count: 0,
            paused: false,
            rng_seed: seed,
            runner: RunnerSimulation::new(config, seed),
        }
    }

    /// Builder method to set a specific RNG seed
    ///
    /// Rebuilds the runner so obstacle generation follows the new seed.
    pub fn with_seed(self, seed: u64) -> Self {
        Self::with_config(self.runner.config().clone(), seed)
    }

    /// Builder method to set the paused state
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Advances the world by one frame
    pub fn tick(&mut self) -> TickEvents {
        if self.paused {
            return TickEvents::default();
        }

        self.tick_count += 1;
        self.runner.tick()
    }

    /// Returns the current tick count
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Pauses the simulation
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes the simulation
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggles pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Returns whether the simulation is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns the RNG seed
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    pub fn runner(&self) -> &RunnerSimulation {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut RunnerSimulation {
        &mut self.runner
    }
}

impl Default for World {
    fn default() -> Self {
        Self::with_config(RunnerConfig::default(), rand::random())
    }
}
