//! Command-line surface: `remarkutil count` and `remarkutil diff`.

mod count;
mod diff;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{FilterSpec, RemarkUtilConfig};
use crate::remark::RemarkType;

pub use count::{CountArgs, run_count};
pub use diff::{DiffArgs, run_diff};

/// Count and diff compiler optimization remarks.
#[derive(Parser, Debug)]
#[command(name = "remarkutil", version)]
pub struct RootCli {
    #[command(subcommand)]
    pub command: Command,
    /// Log level (trace|debug|info|warn|error). `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
    /// TOML file with default filter, count and diff settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collect remarks based on specified criteria.
    Count(CountArgs),
    /// Diff remarks between two remark files.
    Diff(DiffArgs),
}

/// Remark filter flags shared by both subcommands. A literal flag wins over
/// its `r`-prefixed regex twin.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only keep remarks with this name.
    #[arg(long)]
    pub remark_name: Option<String>,
    /// Only keep remarks whose name matches this regex.
    #[arg(long = "rremark-name")]
    pub remark_name_regex: Option<String>,
    /// Only keep remarks emitted by this pass.
    #[arg(long)]
    pub pass_name: Option<String>,
    /// Only keep remarks whose pass name matches this regex.
    #[arg(long = "rpass-name")]
    pub pass_name_regex: Option<String>,
    /// Only keep remarks with an argument equal to this value.
    #[arg(long = "filter-arg-by")]
    pub arg_value: Option<String>,
    /// Only keep remarks with an argument value matching this regex.
    #[arg(long = "rfilter-arg-by")]
    pub arg_value_regex: Option<String>,
    /// Only keep remarks of this type.
    #[arg(long, value_enum)]
    pub remark_type: Option<RemarkType>,
}

impl FilterArgs {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            remark_name: self.remark_name.clone(),
            remark_name_regex: self.remark_name_regex.clone(),
            pass_name: self.pass_name.clone(),
            pass_name_regex: self.pass_name_regex.clone(),
            arg_value: self.arg_value.clone(),
            arg_value_regex: self.arg_value_regex.clone(),
            remark_type: self.remark_type,
        }
    }
}

/// Initializes stderr logging. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Runs the parsed command line.
pub fn run(cli: &RootCli) -> Result<()> {
    let defaults = RemarkUtilConfig::load(cli.config.as_deref())?;
    match &cli.command {
        Command::Count(args) => run_count(args, &defaults),
        Command::Diff(args) => run_diff(args, &defaults),
    }
}
