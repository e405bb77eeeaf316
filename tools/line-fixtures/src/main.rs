// Copyright 2025. Fixture renderer and comparison CLI for rgba-line.
//
// Usage:
//   line-fixtures render <algorithm> <composite> [--width W] [--height H] -o <output.bmp|raw>
//   line-fixtures fixtures <dir> [--format bmp|raw]
//   line-fixtures compare <file_a> <file_b> [-d <diff.bmp>]
//   line-fixtures list

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use line_fixtures::render::{self, Algorithm};
use line_fixtures::{compare_buffers, generate_diff_image, load_image, save_image};
use rgba_line::Composite;

#[derive(Parser, Debug)]
#[command(
    name = "line-fixtures",
    version,
    about = "Render and compare rgba-line fixtures",
    long_about = None
)]
struct Arguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the four-line scene to an image file
    Render {
        #[arg(value_enum)]
        algorithm: Algorithm,

        /// `none`, `normal`, or any SVG compositing operation name
        #[arg(value_parser = render::parse_composite)]
        composite: Composite,

        #[arg(long, default_value_t = render::DEFAULT_SIZE)]
        width: u32,

        #[arg(long, default_value_t = render::DEFAULT_SIZE)]
        height: u32,

        /// Output file (.bmp or .raw)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render every reference fixture into a directory
    Fixtures {
        dir: PathBuf,

        #[arg(long, default_value = "bmp")]
        format: String,
    },

    /// Compare two image files pixel by pixel
    Compare {
        a: PathBuf,
        b: PathBuf,

        /// Write a diff image here
        #[arg(short, long)]
        diff: Option<PathBuf>,
    },

    /// List the reference fixture names
    List,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arguments = Arguments::parse();
    match run(arguments.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when a comparison found differences.
fn run(command: Command) -> Result<bool> {
    match command {
        Command::Render {
            algorithm,
            composite,
            width,
            height,
            output,
        } => {
            let buf = render::render_scene(algorithm, composite, width, height);
            save(&output, &buf)?;
        }
        Command::Fixtures { dir, format } => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            for name in render::available_fixtures() {
                if let Some(buf) = render::render_fixture(name) {
                    save(&dir.join(format!("{}.{}", name, format)), &buf)?;
                }
            }
        }
        Command::Compare { a, b, diff } => {
            let img_a = load(&a)?;
            let img_b = load(&b)?;

            let result = compare_buffers(&img_a, &img_b)?;
            println!("{}", result);

            if let Some(path) = diff {
                save(&path, &generate_diff_image(&img_a, &img_b)?)?;
            }
            return Ok(result.identical());
        }
        Command::List => {
            println!("Available fixtures:");
            for name in render::available_fixtures() {
                println!("  {}", name);
            }
        }
    }
    Ok(true)
}

fn load(path: &Path) -> Result<rgba_line::PixelBuffer> {
    load_image(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn save(path: &Path, buf: &rgba_line::PixelBuffer) -> Result<()> {
    save_image(path, buf).with_context(|| format!("Failed to save {}", path.display()))?;
    log::info!("Saved {} ({}x{})", path.display(), buf.width(), buf.height());
    Ok(())
}
