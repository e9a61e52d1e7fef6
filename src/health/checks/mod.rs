//! Built-in health checks for core systems

pub mod assistant;
pub mod build_info;
pub mod config;
pub mod input;
pub mod runner;

pub use assistant::AssistantCheck;
pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use input::InputCheck;
pub use runner::RunnerCheck;
