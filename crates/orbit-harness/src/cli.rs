use clap::{Args, Parser, Subcommand, ValueEnum};
use orbit_layout::LayoutBounds;

use crate::error::Result;
use crate::logging::init_subscriber;
use crate::replay::{ReplayArgs, run_replay};

#[derive(Debug, Parser)]
#[command(
    name = "orbit-harness",
    about = "Replay and configuration tooling for the Orbit dashboard layout",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a scripted interaction and print the state after each step.
    Replay(ReplayArgs),

    /// Print layout bounds as TOML.
    Defaults(DefaultsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DefaultsArgs {
    /// Which shipped bounds to print.
    #[arg(long, value_enum, default_value_t = Preset::Wide)]
    pub preset: Preset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Wide,
    NarrowChat,
}

impl Preset {
    #[must_use]
    pub const fn bounds(self) -> LayoutBounds {
        match self {
            Self::Wide => LayoutBounds::WIDE_RANGE,
            Self::NarrowChat => LayoutBounds::NARROW_CHAT,
        }
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_subscriber(cli.log_json);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => run_replay(args),
        Commands::Defaults(args) => {
            print!("{}", render_defaults(args.preset)?);
            Ok(())
        }
    }
}

pub fn render_defaults(preset: Preset) -> Result<String> {
    Ok(preset.bounds().to_toml_string()?)
}
