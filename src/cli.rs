//! Command-line interface

use clap::Parser;

use backdrop3d::Preset;

#[derive(Parser, Debug)]
#[command(name = "backdrop3d")]
#[command(about = "Pointer-reactive 3D background animations in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Scene to render
    #[arg(short, long, value_enum, default_value_t = Preset::Globe)]
    pub scene: Preset,

    /// Target frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Seed for every random placement in the scene
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Override the particle count of particle scenes
    #[arg(long)]
    pub particles: Option<usize>,

    /// Supersampling factor, clamped into [1, 2]
    #[arg(long, default_value_t = 1.0)]
    pub pixel_ratio: f32,

    /// Simulate without a terminal and print a summary
    #[arg(long)]
    pub headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Start with the debug overlay shown
    #[arg(short, long)]
    pub debug: bool,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["backdrop3d"]);
        assert_eq!(cli.scene, Preset::Globe);
        assert_eq!(cli.fps, 60);
        assert!(!cli.headless);
    }

    #[test]
    fn test_scene_names() {
        let cli = Cli::parse_from(["backdrop3d", "--scene", "wireframe-terrain", "--headless", "--frames", "5", "-vv"]);
        assert_eq!(cli.scene, Preset::WireframeTerrain);
        assert_eq!(cli.frames, 5);
        assert_eq!(cli.verbose, 2);
        assert!(Cli::try_parse_from(["backdrop3d", "--scene", "nope"]).is_err());
    }

    #[test]
    fn test_fps_range() {
        assert!(Cli::try_parse_from(["backdrop3d", "--fps", "0"]).is_err());
    }
}
