//! Runner simulation health check

use crate::health::check::{CheckLog, CheckResult, SystemCheck};
use crate::sim::{RunnerConfig, World};

/// Drives a seeded world through jump, spawn, pause and reset
pub struct RunnerCheck {
    config: RunnerConfig,
}

impl RunnerCheck {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }
}

impl Default for RunnerCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for RunnerCheck {
    fn name(&self) -> &'static str {
        "Runner"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Simulation physics, spawning and lifecycle")
    }

    fn check(&self) -> CheckResult {
        let mut log = CheckLog::new();
        let mut world = World::with_config(self.config.clone(), 42);

        world.tick();
        let state = world.runner().state();
        log.record(
            state.running && state.is_grounded() && state.score == 1,
            format!("First tick: grounded, score {}", state.score),
        );

        let jumped = world.runner_mut().jump();
        world.tick();
        log.record(
            jumped && !world.runner().state().is_grounded(),
            format!(
                "Jump lifts player to offset {:.2}",
                world.runner().state().vertical_offset
            ),
        );
        log.record(
            !world.runner_mut().jump(),
            "Second jump while airborne is ignored",
        );

        let spawn_rate = self.config.spawn_rate;
        while world.runner().is_running() && world.runner().state().frame_counter < spawn_rate {
            world.tick();
        }
        if spawn_rate > 0 {
            log.record(
                !world.runner().state().obstacles.is_empty(),
                format!("Obstacle spawned by frame {spawn_rate}"),
            );
        }

        world.pause();
        let frame = world.runner().state().frame_counter;
        world.tick();
        log.record(
            world.runner().state().frame_counter == frame,
            "Paused world does not advance",
        );
        world.resume();

        world.runner_mut().reset();
        let state = world.runner().state();
        log.record(
            state.running && state.score == 0 && state.obstacles.is_empty(),
            format!(
                "Reset restores initial state (best score kept: {})",
                world.runner().best_score()
            ),
        );

        log.finish(format!("{} ticks simulated", world.tick_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::CheckStatus;

    #[test]
    fn test_default_runner_passes() {
        let result = RunnerCheck::new().check();
        assert_eq!(result.status, CheckStatus::Pass, "{:?}", result.details);
    }

    #[test]
    fn test_zero_jump_force_fails() {
        let config = RunnerConfig {
            jump_force: 0.0,
            ..RunnerConfig::default()
        };
        assert!(RunnerCheck::with_config(config).check().status.is_fail());
    }
}
