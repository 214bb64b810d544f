//! Zinnia demo runner.
//!
//! Builds the headless demo scene from [`zinnia::demo`], plays a number of
//! frames and reports what the active collision protocol did.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --frames 120 --json
//! RUST_LOG=debug cargo run -- --config zinnia.ini
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;

use zinnia::demo;
use zinnia::resources::config::ZinniaConfig;

/// Zinnia active collision demo
#[derive(Parser)]
#[command(version, about = "Runs the Zinnia active collision demo scene headless.")]
struct Cli {
    /// INI file with rule, nav mesh and velocity settings.
    #[arg(long, value_name = "PATH", default_value = "./zinnia.ini")]
    config: PathBuf,

    /// Write the default configuration and exit.
    /// Optionally provide a path (default: ./zinnia.ini).
    #[arg(long, value_name = "PATH")]
    write_config: Option<Option<PathBuf>>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Early-exit: write a default config and quit
    if let Some(maybe_path) = cli.write_config {
        let path = maybe_path.unwrap_or_else(|| PathBuf::from("./zinnia.ini"));
        let config = ZinniaConfig::with_path(&path);
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Config written to {}", path.display());
        return;
    }

    let mut config = ZinniaConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{e}; using defaults");
    }

    let mut world = World::new();
    let scene = demo::setup(&mut world, &config);
    log::info!("Running {} frames of {:.4}s", cli.frames, cli.dt);
    let summary = demo::run(&mut world, &scene, cli.frames, cli.dt);

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing summary: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    log::info!(
        "{} publishes, {} consumptions, {} registrations, {} unregistrations",
        summary.published.len(),
        summary.consumed,
        summary.registrations,
        summary.unregistrations
    );
    log::info!(
        "Registered consumers at exit: {:?}, heartbeats: {}, grip changes: {}",
        summary.registered,
        summary.heartbeats,
        summary.grip_changes
    );
    log::info!("Cube came to rest at {:?}", summary.cube_position);
    for check in &summary.teleports {
        log::info!(
            "Teleport to {:?}: {}",
            check.point,
            if check.valid { "valid" } else { "rejected" }
        );
    }
}
