//! Side-scrolling runner simulation
//!
//! One call to [`RunnerSimulation::tick`] advances the game by exactly one
//! rendered frame: gravity, landing, obstacle spawn and scroll, collision,
//! pruning and scoring, in that order. The only inputs are the jump and reset
//! operations and the simulation's own seeded RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Physics and playfield constants for the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Added to vertical velocity every tick (positive pulls toward the floor)
    pub gravity: f32,
    /// Vertical velocity applied by a jump (negative is upward)
    pub jump_force: f32,
    pub player_size: f32,
    /// Fixed horizontal position of the player's left edge
    pub player_x: f32,
    /// Distance every obstacle scrolls left per tick
    pub obstacle_speed: f32,
    /// A new obstacle spawns whenever the frame counter is a multiple of this
    pub spawn_rate: u64,
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Gap between the floor line and the bottom of the playfield
    pub floor_margin: f32,
    pub obstacle_min_width: f32,
    pub obstacle_max_width: f32,
    pub obstacle_min_height: f32,
    pub obstacle_max_height: f32,
    /// Displayed score is the tick score divided by this
    pub score_divisor: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            gravity: 0.65,
            jump_force: -13.0,
            player_size: 40.0,
            player_x: 50.0,
            obstacle_speed: 9.0,
            spawn_rate: 75,
            playfield_width: 1000.0,
            playfield_height: 300.0,
            floor_margin: 20.0,
            obstacle_min_width: 30.0,
            obstacle_max_width: 60.0,
            obstacle_min_height: 40.0,
            obstacle_max_height: 100.0,
            score_divisor: 10,
        }
    }
}

impl RunnerConfig {
    /// Y coordinate of the floor line
    pub fn floor_y(&self) -> f32 {
        self.playfield_height - self.floor_margin
    }

    /// Player box for a given vertical offset (0 = standing on the floor)
    pub fn player_rect(&self, vertical_offset: f32) -> Rect {
        Rect::new(
            self.player_x,
            self.floor_y() - self.player_size + vertical_offset,
            self.player_size,
            self.player_size,
        )
    }

    /// Obstacle box, measured up from the floor line
    pub fn obstacle_rect(&self, obstacle: &Obstacle) -> Rect {
        Rect::new(
            obstacle.x,
            self.floor_y() - obstacle.height,
            obstacle.width,
            obstacle.height,
        )
    }
}

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    /// True once the obstacle has fully left the playfield on the left
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width <= 0.0
    }
}

/// Mutable per-session runner state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerState {
    /// Height above the floor, negative while airborne, never positive
    pub vertical_offset: f32,
    pub vertical_velocity: f32,
    /// Obstacles in spawn order, which is also left-to-right order
    pub obstacles: Vec<Obstacle>,
    pub frame_counter: u64,
    /// False after a collision until the next reset
    pub running: bool,
    /// Ticks survived
    pub score: u64,
}

impl Default for RunnerState {
    fn default() -> Self {
        Self {
            vertical_offset: 0.0,
            vertical_velocity: 0.0,
            obstacles: Vec::new(),
            frame_counter: 0,
            running: true,
            score: 0,
        }
    }
}

impl RunnerState {
    pub fn is_grounded(&self) -> bool {
        self.vertical_offset == 0.0
    }
}

/// What happened during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub spawned: bool,
    pub collided: bool,
    pub pruned: usize,
}

/// Read-only copy of the runner handed to the render layer
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerSnapshot {
    pub playfield: [f32; 2],
    pub floor_y: f32,
    pub player: Rect,
    pub obstacles: Vec<Rect>,
    pub frame_counter: u64,
    pub running: bool,
    pub score: u64,
    pub display_score: u64,
    pub best_score: u64,
}

/// Runner game simulation
pub struct RunnerSimulation {
    config: RunnerConfig,
    state: RunnerState,
    best_score: u64,
    rng: StdRng,
}

impl RunnerSimulation {
    /// Creates a runner with the given constants and RNG seed
    pub fn new(config: RunnerConfig, seed: u64) -> Self {
        Self {
            config,
            state: RunnerState::default(),
            best_score: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advances the simulation by one frame
    ///
    /// A no-op once a collision has stopped the run.
    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::default();
        if !self.state.running {
            return events;
        }

        self.state.vertical_velocity += self.config.gravity;
        self.state.vertical_offset += self.state.vertical_velocity;

        // Landed
        if self.state.vertical_offset > 0.0 {
            self.state.vertical_offset = 0.0;
            self.state.vertical_velocity = 0.0;
        }

        self.state.frame_counter += 1;
        if self.config.spawn_rate > 0 && self.state.frame_counter % self.config.spawn_rate == 0 {
            let obstacle = self.spawn_obstacle();
            self.state.obstacles.push(obstacle);
            events.spawned = true;
        }

        for obstacle in &mut self.state.obstacles {
            obstacle.x -= self.config.obstacle_speed;
        }

        let player = self.config.player_rect(self.state.vertical_offset);
        if self
            .state
            .obstacles
            .iter()
            .any(|obstacle| player.intersects(&self.config.obstacle_rect(obstacle)))
        {
            self.state.running = false;
            events.collided = true;
            return events;
        }

        let before = self.state.obstacles.len();
        self.state.obstacles.retain(|obstacle| !obstacle.is_off_screen());
        events.pruned = before - self.state.obstacles.len();

        self.state.score += 1;
        self.best_score = self.best_score.max(self.display_score());

        events
    }

    /// Applies the jump impulse if the player is grounded and the run is live
    ///
    /// Returns whether the impulse was applied.
    pub fn jump(&mut self) -> bool {
        if !self.state.running || !self.state.is_grounded() {
            return false;
        }
        self.state.vertical_velocity = self.config.jump_force;
        true
    }

    /// Restores the initial state; the best score is kept
    pub fn reset(&mut self) {
        self.state = RunnerState::default();
    }

    fn spawn_obstacle(&mut self) -> Obstacle {
        let width = sample(
            &mut self.rng,
            self.config.obstacle_min_width,
            self.config.obstacle_max_width,
        );
        let height = sample(
            &mut self.rng,
            self.config.obstacle_min_height,
            self.config.obstacle_max_height,
        );
        Obstacle {
            x: self.config.playfield_width,
            width,
            height,
        }
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Score as shown to the player
    pub fn display_score(&self) -> u64 {
        self.state.score / self.config.score_divisor.max(1)
    }

    /// Highest displayed score since the simulation was created
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Copies the current state into render-ready form
    pub fn snapshot(&self) -> RunnerSnapshot {
        RunnerSnapshot {
            playfield: [self.config.playfield_width, self.config.playfield_height],
            floor_y: self.config.floor_y(),
            player: self.config.player_rect(self.state.vertical_offset),
            obstacles: self
                .state
                .obstacles
                .iter()
                .map(|obstacle| self.config.obstacle_rect(obstacle))
                .collect(),
            frame_counter: self.state.frame_counter,
            running: self.state.running,
            score: self.state.score,
            display_score: self.display_score(),
            best_score: self.best_score,
        }
    }
}

/// Uniform sample from `[min, max)`, or `min` when the range is empty
fn sample(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
