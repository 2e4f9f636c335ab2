use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The polybuild developers",
    version,
    about = "polybuild CLI - Assemble polymer residue graphs and export them to polyply.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a script of builder events (one event per line) against a fresh session.
    Run(RunArgs),
    /// Lay out a residue graph file (node-link JSON or .itp) and draw it as SVG.
    Render(RenderArgs),
    /// List the force-field libraries, or the monomers one of them defines.
    Library(LibraryArgs),
    /// Generate an .itp topology from a saved residue graph with polyply.
    GenItp(GenItpArgs),
}

/// Options shared by every command that builds a session configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding one sub-directory per force-field library.
    #[arg(short = 'd', long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Seed for layout jitter and atactic assignment, for reproducible output.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Override the canvas width from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub width: Option<f64>,

    /// Override the canvas height from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub height: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S canvas.zoom-step=0.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the event script.
    #[arg(required = true, value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Select this force field before the first scripted event.
    #[arg(short, long, value_name = "NAME")]
    pub force_field: Option<String>,

    /// Save the final residue graph as node-link JSON.
    #[arg(short, long, value_name = "PATH")]
    pub graph: Option<PathBuf>,

    /// Draw the final frame as an SVG document.
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Exit with an error when any scripted event fails.
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the `render` subcommand.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Residue graph to draw (.json node-link or .itp).
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Path for the SVG document.
    #[arg(required = true, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Zoom level; negative values zoom in.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_name = "FLOAT")]
    pub zoom: f64,

    /// Horizontal pan in device units.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_name = "FLOAT")]
    pub pan_x: f64,

    /// Vertical pan in device units.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_name = "FLOAT")]
    pub pan_y: f64,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the `library` subcommand.
#[derive(Args, Debug)]
pub struct LibraryArgs {
    /// Force field whose monomers to list; lists the libraries when omitted.
    #[arg(value_name = "FORCE_FIELD")]
    pub force_field: Option<String>,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the `gen-itp` subcommand.
#[derive(Args, Debug)]
pub struct GenItpArgs {
    /// Saved residue graph (node-link JSON).
    #[arg(required = true, value_name = "GRAPH")]
    pub graph: PathBuf,

    /// Path for the generated topology.
    #[arg(required = true, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Force-field library passed to the generator.
    #[arg(short, long, required = true, value_name = "NAME")]
    pub force_field: String,

    /// Molecule name written into the topology.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Additional .itp file with block definitions.
    #[arg(long, value_name = "PATH")]
    pub include: Option<PathBuf>,

    #[command(flatten)]
    pub session: SessionArgs,
}
