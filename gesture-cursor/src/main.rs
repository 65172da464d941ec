//! Gesture Cursor - hand-gesture pointer control
//!
//! Reads hand landmark detections as JSON lines and writes pointer commands
//! as JSON lines. Logs go to stderr so stdout can carry the command stream.

use gesture_cursor::app::cli::{Cli, Commands, ConfigAction};
use gesture_cursor::app::config::Config;
use gesture_cursor::control::ControlQueue;
use gesture_cursor::gesture::GestureEngine;
use gesture_cursor::pointer::JsonLinesSink;
use gesture_cursor::time::MonotonicClock;
use gesture_cursor::tracking::JsonLinesSource;
use gesture_cursor::workflow::{Session, SessionSummary};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Run {
            input,
            output,
            screen_width,
            screen_height,
            max_frames,
            mirror_x,
        } => {
            let mut config = load_config(&cli.config)?;
            if let Some(width) = screen_width {
                config.screen.width = width;
            }
            if let Some(height) = screen_height {
                config.screen.height = height;
            }
            config.tracking.mirror_x |= mirror_x;
            config.validate()?;
            run_session(&input, &output, max_frames, &config)?;
        }
        Commands::Init { force } => {
            run_init(force, &config_path)?;
        }
        Commands::Config { action } => {
            run_config(action, &config_path)?;
        }
    }

    Ok(())
}

fn load_config(path: &Option<PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    Ok(config)
}

fn open_input(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    if Cli::is_stdio(path) {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("Cannot open input {:?}: {}", path, e))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    if Cli::is_stdio(path) {
        return Ok(Box::new(io::stdout().lock()));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("Cannot create output {:?}: {}", path, e))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn run_session(
    input: &Path,
    output: &Path,
    max_frames: Option<u64>,
    config: &Config,
) -> anyhow::Result<()> {
    let engine = GestureEngine::new(config.gesture_config(), config.screen);

    let source = JsonLinesSource::new(open_input(input)?)
        .with_min_confidence(config.tracking.min_confidence)
        .with_mirror_x(config.tracking.mirror_x);
    let sink = JsonLinesSink::new(open_output(output)?);

    // Ctrl+C asks the loop to stop between frames
    let (mut control_tx, control_rx) = ControlQueue::new().split();
    ctrlc::set_handler(move || {
        control_tx.request_stop();
    })?;

    info!("Reading landmarks... Press Ctrl+C to stop");

    let mut session = Session::new(engine, source, sink, MonotonicClock::new())
        .with_control(control_rx)
        .with_max_frames(max_frames);

    let summary = session.run()?;
    print_summary(&summary);

    if summary.hand_frames == 0 && summary.frames > 0 {
        warn!("No hand was detected in {} frames", summary.frames);
    }

    Ok(())
}

fn print_summary(summary: &SessionSummary) {
    eprintln!("\nSession summary ({:?}):", summary.stop_reason);
    eprintln!(
        "  Frames:        {} ({} with hand, {} disabled)",
        summary.frames, summary.hand_frames, summary.disabled_frames
    );
    eprintln!("  Commands:      {}", summary.commands);
    eprintln!("  Left clicks:   {}", summary.left_clicks);
    eprintln!("  Right clicks:  {}", summary.right_clicks);
    eprintln!(
        "  Scrolls:       {} (net {})",
        summary.scroll_events, summary.scroll_total
    );
    eprintln!(
        "  Drags:         {} ({} dropped, {} released)",
        summary.drags, summary.drops, summary.forced_releases
    );
}

fn run_init(force: bool, config_path: &PathBuf) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    let config = Config::default();
    config.save(config_path)?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    Ok(())
}

fn run_config(action: ConfigAction, config_path: &PathBuf) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_or_default(config_path)?;
            println!("Configuration ({:?}):\n", config_path);
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Get { key } => {
            let config = load_or_default(config_path)?;
            println!("{} = {}", key, config.get_value(&key)?);
        }
        ConfigAction::Set { key, value } => {
            if !config_path.exists() {
                anyhow::bail!("No config file found. Run 'gesture-cursor init' first.");
            }

            let mut config = Config::load(config_path)?;
            config.set_value(&key, &value)?;
            config.save(config_path)?;
            println!("Set {} = {}", key, config.get_value(&key)?);
        }
        ConfigAction::Reset { force } => {
            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            Config::default().save(config_path)?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
    }

    Ok(())
}

fn load_or_default(path: &PathBuf) -> anyhow::Result<Config> {
    if path.exists() {
        Ok(Config::load(path)?)
    } else {
        Ok(Config::default())
    }
}
