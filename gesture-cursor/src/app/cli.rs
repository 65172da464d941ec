//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Gesture Cursor - Drive the mouse pointer with hand gestures
#[derive(Parser, Debug)]
#[command(name = "gesture-cursor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the gesture loop over a stream of landmark detections
    Run {
        /// Landmark JSON lines ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Pointer command JSON lines ("-" for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Screen width in pixels (overrides config)
        #[arg(long)]
        screen_width: Option<u32>,

        /// Screen height in pixels (overrides config)
        #[arg(long)]
        screen_height: Option<u32>,

        /// Stop after this many frames
        #[arg(long)]
        max_frames: Option<u64>,

        /// Flip landmark x coordinates (overrides config)
        #[arg(long)]
        mirror_x: bool,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "cursor.smoothing", "screen.width")
        key: String,

        /// Value to set
        value: String,
    },

    /// Get a specific configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether a path argument names stdin/stdout.
    pub fn is_stdio(path: &Path) -> bool {
        path.as_os_str() == "-"
    }
}
