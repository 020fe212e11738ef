use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use constellation::ConstellationApp;
use constellation::config::Settings;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with `tuning` and `palette` overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ambient particle count.
    #[arg(long)]
    particles: Option<usize>,

    /// Seed for a reproducible field.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    show_fps: bool,

    /// Print the effective settings as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(particles) = args.particles {
        settings.tuning.target_count = particles;
        settings.tuning = settings.tuning.sanitized();
    }

    if args.print_config {
        println!("{}", settings.to_json()?);
        return Ok(());
    }

    let seed = args.seed;
    let show_fps = args.show_fps;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("constellation"),
        ..Default::default()
    };

    eframe::run_native(
        "constellation",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ConstellationApp::new(
                cc, settings, seed, show_fps,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to open window: {error}"))
}
