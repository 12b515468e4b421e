//! CLI argument definitions and command dispatch.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::Mode;

/// Field Notes CLI - collect location/sample photos and export them with
/// CSV/JSON metadata.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "fnotes", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "FNOTES_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (repeat for more detail)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub no_color: bool,

    /// Configuration file (TOML or YAML)
    #[arg(long, short = 'c', global = true, env = "FNOTES_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Effective output mode after the --robot shorthand.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.robot {
            return Mode::Json;
        }
        match self.format {
            OutputFormat::Text => Mode::Text,
            OutputFormat::Json => Mode::Json,
            OutputFormat::JsonCompact => Mode::JsonCompact,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Collection ===
    /// One-shot collection: new location, capture the given frames, save
    Collect(CollectArgs),

    /// Interactive collection session
    Shell(ShellArgs),

    // === Configuration ===
    /// Write a starter configuration file
    Init(InitArgs),

    /// Show the effective configuration
    Config(ConfigArgs),

    // === Utilities ===
    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct CollectArgs {
    /// Project name (falls back to the config file)
    #[arg(long, short = 'p', env = "FNOTES_PROJECT")]
    pub project: Option<String>,

    /// Location note (required, free text)
    #[arg(long, short = 'n')]
    pub note: String,

    /// Save folder (falls back to output_dir in the config)
    #[arg(long, short = 'o', env = "FNOTES_OUT")]
    pub out: Option<PathBuf>,

    /// Image frames to capture, in order
    #[arg(value_name = "IMAGE", required = true)]
    pub frames: Vec<PathBuf>,

    /// Advance the sample counter between frames (one sample per frame)
    #[arg(long)]
    pub split: bool,

    /// JPEG re-encode quality (1-100, overrides the config)
    #[arg(long)]
    pub quality: Option<u8>,

    /// GPS latitude for the location
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// GPS longitude for the location
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// GPS accuracy in meters
    #[arg(long)]
    pub acc: Option<f64>,

    /// Skip GPS tagging even when coordinates are configured
    #[arg(long)]
    pub no_gps: bool,
}

#[derive(Parser, Debug)]
pub struct ShellArgs {
    /// Project name (falls back to the config file)
    #[arg(long, short = 'p', env = "FNOTES_PROJECT")]
    pub project: Option<String>,

    /// Save folder (falls back to output_dir in the config)
    #[arg(long, short = 'o', env = "FNOTES_OUT")]
    pub out: Option<PathBuf>,

    /// JPEG re-encode quality (1-100, overrides the config)
    #[arg(long)]
    pub quality: Option<u8>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long, short = 'F')]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show the configuration file path only
    #[arg(long)]
    pub path: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
