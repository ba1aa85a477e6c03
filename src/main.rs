//! Main entry point for the backdrop3d viewer

mod app;
mod cli;

use backdrop3d::Preset;
use clap::Parser;

use crate::cli::Cli;

fn main() -> backdrop3d::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still wins over the flags
    let default_filter = match (cli.verbose, cli.quiet) {
        (0, true) => "error",
        (0, false) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let build = |preset: Preset| {
        let descriptor = preset.descriptor(cli.seed);
        match cli.particles {
            Some(count) => descriptor.with_particle_count(count),
            None => descriptor,
        }
    };

    if cli.headless {
        let summary = app::run_headless(build(cli.scene), cli.fps, cli.pixel_ratio, cli.frames)?;
        println!("Scene:          {}", summary.scene);
        println!("Frames:         {}", summary.frames);
        println!("Elapsed:        {:.2}s", summary.elapsed);
        println!("Nodes:          {}", summary.nodes);
        println!("Listeners:      {}", summary.listeners);
        println!("Mean luminance: {:.4}", summary.mean_luminance);
        return Ok(());
    }

    app::run_terminal(cli.scene, build, cli.fps, cli.pixel_ratio, cli.debug)
}
