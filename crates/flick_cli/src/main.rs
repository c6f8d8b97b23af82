//! Flick CLI
//!
//! Drive the scroll engine from the terminal: synthesize drags, replay
//! scripted gestures frame by frame, and inspect the effective configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flick_scroll::ScrollConfig;

mod gesture;
mod replay;

use gesture::{parse_frame_ms, parse_size, DragAxis, GestureScript, StraightDrag};
use replay::{Replay, DEFAULT_FRAME_MS};

#[derive(Parser)]
#[command(name = "flick")]
#[command(author, version, about = "Kinetic scroll engine playground")]
struct Cli {
    /// Scroll configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Built-in configuration to start from when no file is given
    #[arg(long, global = true, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a straight drag and print every frame
    Drag {
        /// Content size as WIDTHxHEIGHT
        #[arg(long, default_value = "320x2000", value_parser = parse_size)]
        content: [i32; 2],
        /// Viewport size as WIDTHxHEIGHT
        #[arg(long, default_value = "320x480", value_parser = parse_size)]
        viewport: [i32; 2],
        /// Content travel in pixels (negative drags back toward the start)
        #[arg(short, long, default_value_t = 200.0, allow_negative_numbers = true)]
        distance: f32,
        /// Drag duration in milliseconds
        #[arg(long, default_value_t = 120.0)]
        duration: f64,
        /// Rest before lifting the pointer, in milliseconds
        #[arg(long, default_value_t = 0.0)]
        pause: f64,
        #[arg(long, value_enum, default_value_t = DragAxis::Vertical)]
        axis: DragAxis,
        /// Frame interval of the replay clock
        #[arg(long, default_value_t = DEFAULT_FRAME_MS, value_parser = parse_frame_ms)]
        frame_ms: f64,
    },
    /// Replay a gesture script
    Replay {
        /// Script file (TOML with [[events]])
        script: PathBuf,
        /// Frame interval; overrides the script's frame_ms
        #[arg(long, value_parser = parse_frame_ms)]
        frame_ms: Option<f64>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Default,
    NoBounce,
    AlwaysVisible,
    Hidden,
}

impl Preset {
    fn config(self) -> ScrollConfig {
        match self {
            Preset::Default => ScrollConfig::default(),
            Preset::NoBounce => ScrollConfig::no_bounce(),
            Preset::AlwaysVisible => ScrollConfig::always_visible_indicators(),
            Preset::Hidden => ScrollConfig::hidden_indicators(),
        }
    }
}

fn load_config(cli: &Cli) -> Result<ScrollConfig> {
    match &cli.config {
        Some(path) => ScrollConfig::load(path)
            .with_context(|| format!("Failed to load scroll config {}", path.display())),
        None => Ok(cli.preset.config()),
    }
}

fn print_replay(replay: &Replay) {
    for frame in &replay.frames {
        println!("{}", frame);
    }

    let n = replay.notifications;
    println!();
    println!(
        "frames: {}  offset changes: {}  started: {}  flings: {}  finished: {}",
        replay.frames.len(),
        n.offset_changes,
        n.interactions_started,
        n.flings_started,
        n.interactions_finished
    );
    if let Some(last) = replay.final_frame() {
        println!(
            "final offset: ({}, {})  state: {:?}",
            last.offset.x, last.offset.y, last.state
        );
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Drag {
            content,
            viewport,
            distance,
            duration,
            pause,
            axis,
            frame_ms,
        } => {
            let script = GestureScript::straight_drag(&StraightDrag {
                content,
                viewport,
                axis,
                distance,
                duration_ms: duration,
                pause_ms: pause,
                sample_ms: frame_ms / 2.0,
            })
            .context("Invalid drag parameters")?;
            tracing::info!(
                "Dragging {}px along {:?} over {}ms",
                distance,
                axis,
                duration
            );
            print_replay(&replay::run(config, &script, frame_ms));
        }
        Commands::Replay { script, frame_ms } => {
            let gesture = GestureScript::load(&script)?;
            let frame_ms = frame_ms.or(gesture.frame_ms).unwrap_or(DEFAULT_FRAME_MS);
            tracing::info!(
                "Replaying {} events from {}",
                gesture.events.len(),
                script.display()
            );
            print_replay(&replay::run(config, &gesture, frame_ms));
        }
        Commands::Config => {
            let text = config
                .to_toml()
                .context("Failed to serialize scroll config")?;
            print!("{}", text);
        }
    }

    Ok(())
}
