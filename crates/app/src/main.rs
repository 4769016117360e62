mod pacer;
mod terminal;

use std::{
    io,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::Rng;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use volume_wave_core::{AppConfig, SharedVolume, VolumeSource, WaveView};

use crate::{
    pacer::Pacer,
    terminal::{TerminalCanvas, TerminalSession},
};

/// Cells are far coarser than screen pixels; shrink the stock bar sizes.
const TERMINAL_DENSITY: f32 = 0.25;
const DRIFT_INTERVAL: Duration = Duration::from_millis(700);

fn main() -> volume_wave_core::Result<()> {
    let cli = Cli::parse();
    init_tracing(match cli.command {
        Commands::Live { .. } => "warn",
        Commands::Frames { .. } => "info",
    });

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Live {
            density,
            seed,
            paused,
            drift,
        } => {
            let mut config = config;
            config.wave.density = density.unwrap_or(if cli.config.is_some() {
                config.wave.density
            } else {
                TERMINAL_DENSITY
            });
            config.wave.paused |= paused;
            config.validate()?;
            run_live(&config, seed, drift)
        }
        Commands::Frames {
            count,
            width,
            height,
            seed,
            volume,
        } => run_frames(&config, count, width, height, seed, volume),
    }
}

fn run_live(config: &AppConfig, seed: Option<u64>, drift: bool) -> volume_wave_core::Result<()> {
    tracing::info!(?seed, drift, "starting live mode");

    let volume = SharedVolume::new(config.volume.initial, config.volume.max);
    let mut view = WaveView::new(&config.wave, volume.clone());
    if let Some(seed) = seed {
        view = view.with_seed(seed);
    }

    let session = TerminalSession::enter()?;
    let (cols, rows) = terminal::wave_area()?;
    let mut canvas = TerminalCanvas::new(cols, rows);
    let (width, height) = terminal::pixel_size(cols, rows);
    view.on_size_changed(width, height);

    let drifter = drift.then(|| Drifter::spawn(volume.clone()));
    let mut visible = true;
    let mut pacer = Pacer::new(config.frame_interval());
    let mut stdout = io::stdout();

    'frames: loop {
        let mut dirty = false;
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break 'frames,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break 'frames
                    }
                    KeyCode::Char('p') => view.pause(),
                    KeyCode::Char('r') => view.resume(),
                    KeyCode::Char('h') => {
                        visible = !visible;
                        view.on_visibility_changed(visible);
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                        volume.step_volume(1);
                    }
                    KeyCode::Char('-') | KeyCode::Down => {
                        volume.step_volume(-1);
                    }
                    _ => {}
                },
                Event::Resize(cols, _) => {
                    let rows = terminal::wave_area()?.1;
                    canvas.resize(cols, rows);
                    let (width, height) = terminal::pixel_size(cols, rows);
                    view.on_size_changed(width, height);
                }
                _ => {}
            }
            dirty = true;
        }

        view.poll_volume();
        view.on_frame(pacer.wait());

        if view.take_redraw() || dirty {
            canvas.clear();
            if visible {
                view.draw(&mut canvas)?;
            }
            canvas.present(&mut stdout, &status_line(&view, &volume, visible))?;
        }
    }

    view.detach();
    if let Some(drifter) = drifter {
        drifter.stop();
    }
    drop(session);
    tracing::info!("live mode finished");
    Ok(())
}

fn status_line(view: &WaveView<SharedVolume>, volume: &SharedVolume, visible: bool) -> String {
    let level = volume.level();
    format!(
        " {:?}{}{} | volume {}/{} | {} of {} lit | p pause  r resume  h hide  +/- volume  q quit",
        view.state(),
        if view.is_user_paused() { " (user)" } else { "" },
        if visible { "" } else { " [hidden]" },
        level.current,
        level.max,
        view.field().highlight_count(),
        view.field().column_count(),
    )
}

fn run_frames(
    config: &AppConfig,
    count: usize,
    width: f32,
    height: f32,
    seed: u64,
    volume: Option<i32>,
) -> volume_wave_core::Result<()> {
    tracing::info!(count, width, height, seed, "rendering frames headless");

    let source = SharedVolume::new(
        volume.unwrap_or(config.volume.initial),
        config.volume.max,
    );
    let mut view = WaveView::new(&config.wave, source).with_seed(seed);
    view.on_size_changed(width, height);

    let delta = config.frame_interval();
    for frame in 0..count {
        let progress = view.on_frame(delta);
        let line = json!({
            "frame": frame,
            "progress": progress,
            "state": view.state(),
            "field": view.field().snapshot(),
        });
        println!("{}", serde_json::to_string(&line)?);
    }

    view.detach();
    Ok(())
}

/// Background thread nudging the volume around, the way a user pressing the
/// hardware keys would.
struct Drifter {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Drifter {
    fn spawn(volume: SharedVolume) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let handle = thread::spawn(move || {
            let mut rng = rand::rng();
            let mut last = Instant::now();
            while flag.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(50));
                if last.elapsed() < DRIFT_INTERVAL {
                    continue;
                }
                last = Instant::now();
                let delta = if rng.random::<bool>() { 1 } else { -1 };
                volume.step_volume(delta);
            }
        });
        Self { running, handle }
    }

    fn stop(self) {
        self.running.store(false, Ordering::Relaxed);
        if self.handle.join().is_err() {
            tracing::warn!("volume drift thread panicked");
        }
    }
}

fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated volume wave in the terminal", long_about = None)]
struct Cli {
    /// JSON configuration file; missing keys use the defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Animate the wave interactively in the terminal.
    Live {
        /// Pixels per density-independent unit (one pixel is one cell wide).
        #[arg(long)]
        density: Option<f32>,
        /// Seed for the column layout.
        #[arg(long)]
        seed: Option<u64>,
        /// Start paused until `r` is pressed.
        #[arg(long)]
        paused: bool,
        /// Change the volume randomly from a background thread.
        #[arg(long)]
        drift: bool,
    },
    /// Run the animation without a display and print every frame as JSON.
    Frames {
        /// Number of frames to emit.
        #[arg(short = 'n', long, default_value_t = 60)]
        count: usize,
        #[arg(long, default_value_t = 100.0)]
        width: f32,
        #[arg(long, default_value_t = 48.0)]
        height: f32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Volume step to highlight against the configured maximum.
        #[arg(long)]
        volume: Option<i32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_frames_command() {
        let cli = Cli::parse_from(["volume-wave", "frames", "-n", "3", "--volume", "4"]);
        match cli.command {
            Commands::Frames { count, volume, seed, .. } => {
                assert_eq!(count, 3);
                assert_eq!(volume, Some(4));
                assert_eq!(seed, 0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["volume-wave", "live", "--config", "wave.json", "--drift"]);
        assert_eq!(cli.config, Some(PathBuf::from("wave.json")));
        assert!(matches!(cli.command, Commands::Live { drift: true, .. }));
    }
}
