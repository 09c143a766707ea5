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
    version,
    about = "Throwlab CLI - Thermodynamic diagnosis of fragrance throw in candle waxes: cold and hot throw, maximum load, cure time and wax comparison.",
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

    /// Set the number of threads used to compare wax archetypes.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full throw diagnosis of a fragrance in a wax or wax blend.
    Diagnose(DiagnoseArgs),
    /// Build the throw profile of a fragrance in every wax archetype and rank them.
    Compare(CompareArgs),
    /// Derive the thermophysical profile of a wax blend.
    Blend(BlendArgs),
    /// List the available wax archetypes.
    Waxes(WaxesArgs),
}

/// Arguments for the `diagnose` subcommand.
#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    // --- Inputs ---
    /// Path to the fragrance formula in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub fragrance: PathBuf,

    /// Path to the molecule database (.csv or .toml).
    /// Overrides `molecules` from the config file.
    #[arg(short, long, value_name = "PATH")]
    pub molecules: Option<PathBuf>,

    /// Path to a wax archetype table replacing the built-in one.
    #[arg(long, value_name = "PATH")]
    pub waxes: Option<PathBuf>,

    /// Path to an analysis configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path for the JSON report. Printed to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Wax selection ---
    #[command(flatten)]
    pub wax: WaxChoice,

    // --- Analysis overrides ---
    /// Measured flash point of the whole fragrance in °C.
    #[arg(long, value_name = "CELSIUS")]
    pub flash_point: Option<f64>,

    /// Skip the comparison against every wax archetype.
    #[arg(long)]
    pub no_compare: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S flash-point=62
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// A single archetype or a blend, never both.
#[derive(Args, Debug, Clone, Default)]
#[group(required = false, multiple = false)]
pub struct WaxChoice {
    /// Key of the wax archetype (e.g., 'paraffin', 'soy').
    #[arg(short, long, value_name = "KEY")]
    pub wax: Option<String>,

    /// Wax blend as 'key=share' pairs (e.g., 'paraffin=80,microcrystalline=20').
    #[arg(short, long, value_name = "SPEC")]
    pub blend: Option<String>,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Path to the fragrance formula in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub fragrance: PathBuf,

    /// Path to the molecule database (.csv or .toml).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub molecules: PathBuf,

    /// Path to a wax archetype table replacing the built-in one.
    #[arg(long, value_name = "PATH")]
    pub waxes: Option<PathBuf>,

    /// Path for the JSON report. Printed to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `blend` subcommand.
#[derive(Args, Debug)]
pub struct BlendArgs {
    /// Wax blend as 'key=share' pairs (e.g., 'paraffin=80,coconut=20').
    #[arg(required = true, value_name = "SPEC")]
    pub spec: String,

    /// Path to a wax archetype table replacing the built-in one.
    #[arg(long, value_name = "PATH")]
    pub waxes: Option<PathBuf>,
}

/// Arguments for the `waxes` subcommand.
#[derive(Args, Debug)]
pub struct WaxesArgs {
    /// Path to a wax archetype table replacing the built-in one.
    #[arg(long, value_name = "PATH")]
    pub waxes: Option<PathBuf>,
}
