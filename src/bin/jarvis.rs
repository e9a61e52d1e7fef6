use std::fs::File;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use neural_runner::app::App;
use neural_runner::build_info;
use neural_runner::config::AppConfig;
use neural_runner::health;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Neural Runner: gesture-controlled runner with a voice assistant
#[derive(Debug, Parser)]
#[command(name = "jarvis", version)]
struct Args {
    /// Configuration profile (overrides APP_PROFILE)
    #[arg(short, long)]
    profile: Option<String>,

    /// Run without the terminal UI; stdin lines are voice commands
    #[arg(long)]
    headless: bool,

    /// Stop a headless run after this many frames
    #[arg(long, requires = "headless")]
    frames: Option<u64>,

    /// Seed for obstacle generation
    #[arg(long)]
    seed: Option<u64>,

    /// Run the health checks and exit
    #[arg(long, conflicts_with = "headless")]
    health: bool,
}

fn load_config(profile: Option<&str>) -> anyhow::Result<AppConfig> {
    let config = match profile {
        Some(profile) => AppConfig::load(profile),
        None => AppConfig::load_from_env(),
    };
    config.context("failed to load configuration")
}

/// Terminal mode logs to a file so output does not tear the screen
fn init_logging(config: &AppConfig, to_file: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .context("invalid log filter")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if to_file {
        let file = File::create(&config.log.file)
            .with_context(|| format!("failed to create {}", config.log.file.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(args.profile.as_deref())?;

    if args.health {
        init_logging(&config, false)?;
        let report = health::run_checks_for(&config);
        health::print_report(&report);
        std::process::exit(report.exit_code());
    }

    init_logging(&config, !args.headless)?;
    info!(version = %build_info::version_string(), "jarvis starting");

    let app = App::new(config, args.seed);
    if args.headless {
        let summary = app.run_headless(args.frames).await?;
        println!(
            "frames: {}  score: {}  best: {}",
            summary.frames, summary.score, summary.best_score
        );
    } else if let Err(e) = app.run_terminal().await {
        warn!(error = %e, "Terminal session failed");
        return Err(e.into());
    }
    Ok(())
}
