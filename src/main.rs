use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use csdkit::config::packages::{CMD_CAPTURE, CMD_MOVE, CMD_NODECTK, CMD_RESIZE};
use csdkit::host::MemoryPhoto;
use csdkit::{CommandContext, CommandTable, StandaloneHost, X11WindowSystem};

mod app_bootstrap;

/// Photo name the capture subcommand writes into
const CAPTURE_PHOTO: &str = "capture";

#[derive(Parser)]
#[command(name = "csdkit", version, about = "Client-side decoration helpers and X11 capture")]
struct Cli {
    /// X display to connect to (defaults to $DISPLAY)
    #[arg(long, global = true)]
    display: Option<String>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask the window manager to drop the frame around a window
    Nodectk {
        /// Window id (decimal or 0x hex)
        window: String,
    },
    /// Start an interactive window-manager move
    Move { window: String },
    /// Start an interactive window-manager resize
    Resize {
        window: String,
        /// nw, north, ne, east, se, south, sw or west
        direction: String,
    },
    /// Capture a region of a window (or `root`) to a PNG file
    #[command(allow_negative_numbers = true)]
    Capture {
        /// `root` or a window id
        window: String,
        x: String,
        y: String,
        width: String,
        height: String,
        #[arg(short, long, default_value = "capture.png")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = app_bootstrap::load_settings(cli.log_level.clone(), cli.display.clone());
    app_bootstrap::init_logging(&settings);

    match run(cli.command, settings.display.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("csdkit: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, display: Option<&str>) -> Result<()> {
    let ws = X11WindowSystem::connect(display)?;
    let table = CommandTable::with_all();
    let mut host = StandaloneHost::new();

    let invoke = |host: &mut StandaloneHost, name: &str, args: &[&str]| -> Result<()> {
        let mut ctx = CommandContext::new(&ws, host);
        table.invoke(&mut ctx, name, args)?;
        Ok(())
    };

    match command {
        Command::Nodectk { window } => invoke(&mut host, CMD_NODECTK, &[window.as_str()]),
        Command::Move { window } => invoke(&mut host, CMD_MOVE, &[window.as_str()]),
        Command::Resize { window, direction } => {
            invoke(&mut host, CMD_RESIZE, &[window.as_str(), direction.as_str()])
        }
        Command::Capture {
            window,
            x,
            y,
            width,
            height,
            output,
        } => {
            host.create_photo(CAPTURE_PHOTO);
            invoke(
                &mut host,
                CMD_CAPTURE,
                &[
                    CAPTURE_PHOTO,
                    window.as_str(),
                    x.as_str(),
                    y.as_str(),
                    width.as_str(),
                    height.as_str(),
                ],
            )?;
            let photo = host
                .take_photo(CAPTURE_PHOTO)
                .context("capture photo disappeared")?;
            save_png(photo, &output)
        }
    }
}

fn save_png(photo: MemoryPhoto, path: &Path) -> Result<()> {
    let (width, height) = (photo.width(), photo.height());
    if width == 0 || height == 0 {
        bail!("nothing captured: region is {}x{}", width, height);
    }

    let image = image::RgbaImage::from_raw(width, height, photo.into_pixels())
        .context("photo buffer does not match its size")?;
    image
        .save(path)
        .with_context(|| format!("Failed to write {:?}", path))?;

    println!("Saved {}x{} capture to {}", width, height, path.display());
    Ok(())
}
