//! # photon-trace
//!
//! A recursive Whitted-style ray tracer that renders 3D scenes directly in
//! your terminal using Unicode braille patterns and ANSI true-color escape
//! codes.
//!
//! ## Architecture
//!
//! - **Geometric primitives**: sphere, hemisphere, plane, disk, cylinder,
//!   cone — all closed-form intersectors, plus Möller-Trumbore triangle
//!   meshes culled by a per-mesh AABB.
//! - **Shading**: Blinn-Phong direct lighting with transparent (tinted)
//!   shadows, recursive mirror reflection and Snell's-law refraction.
//! - **Camera**: a pinhole model with jittered per-pixel supersampling —
//!   no lens/depth-of-field simulation.
//! - **Rendering**: one OS thread per 64x64 tile, no thread pool.
//! - **Output modes**: Braille (2x4 subpixel), TrueColor, HalfBlock, ASCII.

mod camera;
mod integrator;
mod light;
mod material;
mod math;
mod mesh;
mod presets;
mod primitive;
mod render;
mod scene;
mod shading;
mod stats;

use clap::Parser;
use presets::ScenePreset;
use render::{display_framebuffer, render, OutputMode, RenderConfig};
use std::path::PathBuf;

/// photon-trace — render 3D scenes in your terminal
#[derive(Parser, Debug)]
#[command(
    name = "photon-trace",
    version,
    about = "A recursive ray tracer that renders straight to your terminal",
    long_about = "Renders closed-form geometry and triangle meshes with recursive \
                  reflection/refraction and Blinn-Phong shading, one OS thread per \
                  64x64 tile. Supports multiple terminal output modes from high-res \
                  braille patterns to simple ASCII art.",
    after_help = "EXAMPLES:\n  \
                  photon-trace --scene showcase --mode halfblock\n  \
                  photon-trace --scene optics --depth 6 --super 4\n  \
                  photon-trace --scene minimal --width 240 --height 120 --mode braille\n  \
                  photon-trace --scene stress --preview"
)]
struct Cli {
    /// Scene preset to render
    #[arg(short, long, value_enum, default_value_t = ScenePreset::Showcase)]
    scene: ScenePreset,

    /// Output width in pixels (actual character width depends on mode)
    #[arg(short = 'W', long, default_value_t = 120)]
    width: u32,

    /// Output height in pixels
    #[arg(short = 'H', long, default_value_t = 60)]
    height: u32,

    /// Maximum recursion depth for reflection/refraction bounces
    #[arg(short = 'd', long = "depth", default_value_t = 5)]
    max_depth: u32,

    /// Jittered supersamples per pixel. 1 disables supersampling.
    #[arg(long = "super", default_value_t = 4)]
    supersamples: u32,

    /// Terminal output encoding mode
    #[arg(short, long, value_enum, default_value_t = CliOutputMode::Halfblock)]
    mode: CliOutputMode,

    /// Skip lighting/shadows/recursion entirely and show flat base colours
    #[arg(long)]
    preview: bool,

    /// Also write the rendered frame to this path as a binary PPM file
    #[arg(long)]
    ppm: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputMode {
    /// Unicode braille patterns — highest effective resolution (2x4 subpixel)
    Braille,
    /// Full-block characters with 24-bit true color
    Truecolor,
    /// Half-block characters (▀) — 2 vertical pixels per cell
    Halfblock,
    /// ASCII grayscale density ramp
    Ascii,
}

impl From<CliOutputMode> for OutputMode {
    fn from(m: CliOutputMode) -> Self {
        match m {
            CliOutputMode::Braille => OutputMode::Braille,
            CliOutputMode::Truecolor => OutputMode::TrueColor,
            CliOutputMode::Halfblock => OutputMode::HalfBlock,
            CliOutputMode::Ascii => OutputMode::Ascii,
        }
    }
}

fn print_header(scene_name: &str, cli: &Cli) {
    let mode_name = match cli.mode {
        CliOutputMode::Braille => "Braille (2×4 subpixel)",
        CliOutputMode::Truecolor => "TrueColor (24-bit)",
        CliOutputMode::Halfblock => "HalfBlock (2x vertical)",
        CliOutputMode::Ascii => "ASCII grayscale",
    };
    eprintln!();
    eprintln!("  ╔═══════════════════════════════════════════════╗");
    eprintln!("  ║  photon-trace   Terminal Ray Tracer            ║");
    eprintln!("  ╚═══════════════════════════════════════════════╝");
    eprintln!();
    eprintln!("  Scene:      {scene_name}");
    eprintln!("  Resolution: {}×{} ({mode_name})", cli.width, cli.height);
    eprintln!("  Field of view: {:.1}°", camera::default_vfov_degrees());
    if cli.preview {
        eprintln!("  Mode:       preview (flat shading)");
    } else {
        eprintln!("  Depth:      {}", cli.max_depth.max(1));
        eprintln!("  Supersamples: {}", cli.supersamples.max(1));
    }
    eprintln!();
}

fn main() {
    let cli = Cli::parse();

    let scene = cli.scene.build(cli.width, cli.height, cli.max_depth.max(1), cli.supersamples.max(1));
    let scene_name = cli.scene.name();

    print_header(scene_name, &cli);

    let config = RenderConfig {
        output_mode: cli.mode.into(),
        preview: cli.preview,
    };

    let (framebuffer, stats, elapsed) = render(&scene, &config);

    stats.print_summary(elapsed, scene.width, scene.height, scene.supersamples);
    eprintln!();

    display_framebuffer(&framebuffer, config.output_mode);

    if let Some(path) = &cli.ppm {
        match framebuffer.write_ppm(path.to_string_lossy().as_ref()) {
            Ok(()) => eprintln!("\n  Wrote {}", path.display()),
            Err(e) => eprintln!("\n  Failed to write {}: {e}", path.display()),
        }
    }

    eprintln!();
    eprintln!("  Rendered with photon-trace v{}", env!("CARGO_PKG_VERSION"));
}
