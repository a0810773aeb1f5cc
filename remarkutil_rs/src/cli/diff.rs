use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use super::FilterArgs;
use crate::colors::{ColorMode, Painter};
use crate::config::{DiffConfig, RemarkUtilConfig};
use crate::diff::{DiffOptions, diff_remarks};
use crate::io::{Output, read_input};
use crate::parser::RemarkFormat;
use crate::report::{DiffStyle, write_diff_human, write_diff_json};

#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    /// Baseline remark file (A).
    pub file_a: PathBuf,
    /// Remark file to compare against the baseline (B).
    pub file_b: PathBuf,
    /// Input remark format of both files.
    #[arg(long, value_enum)]
    pub parser: Option<RemarkFormat>,
    /// Output file (`-` for stdout).
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: PathBuf,
    /// Also print the arguments both versions of a remark agree on.
    #[arg(short = 'v', long)]
    pub verbose: bool,
    /// Ignore remarks that don't exist in both files.
    #[arg(long = "only-show-common-remarks")]
    pub only_common: bool,
    /// Show only remarks that exist exclusively in A or in B.
    #[arg(long = "only-show-different-remarks")]
    pub only_different: bool,
    /// Only show same-header remarks whose type differs.
    #[arg(long = "show-remark-type-diff-only")]
    pub type_diff_only: bool,
    /// Only show same-header remarks whose arguments differ.
    #[arg(long = "show-arg-diff-only")]
    pub arg_diff_only: bool,
    /// Treat argument debug locations as part of the argument.
    #[arg(long = "use-strict-compare")]
    pub strict_arg_compare: bool,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Report format.
    #[arg(long, value_enum, default_value_t = DiffStyle::Human)]
    pub report_style: DiffStyle,
    /// Colorize human output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

impl DiffArgs {
    /// Boolean switches are enabled by either the flag or the config file.
    pub fn resolve(&self, defaults: &RemarkUtilConfig) -> DiffConfig {
        let file = &defaults.diff.options;
        DiffConfig {
            format: self.parser.or(defaults.diff.parser).unwrap_or_default(),
            filter: self.filter.to_spec().over(&defaults.filter),
            options: DiffOptions {
                only_common: self.only_common || file.only_common,
                only_different: self.only_different || file.only_different,
                type_diff_only: self.type_diff_only || file.type_diff_only,
                arg_diff_only: self.arg_diff_only || file.arg_diff_only,
                strict_arg_compare: self.strict_arg_compare || file.strict_arg_compare,
                verbose: self.verbose || file.verbose,
            },
        }
    }
}

pub fn run_diff(args: &DiffArgs, defaults: &RemarkUtilConfig) -> Result<()> {
    let config = args.resolve(defaults);
    debug!(?config, "diff configuration");

    let buffer_a = read_input(&args.file_a)?;
    let buffer_b = read_input(&args.file_b)?;
    let diffs = diff_remarks(&config, &buffer_a, &buffer_b).with_context(|| {
        format!(
            "failed to diff '{}' against '{}'",
            args.file_a.display(),
            args.file_b.display()
        )
    })?;

    let mut out = Output::open(&args.output)?;
    let file_a = args.file_a.to_string_lossy();
    let file_b = args.file_b.to_string_lossy();
    match args.report_style {
        DiffStyle::Human => {
            let painter = if out.is_terminal() {
                Painter::new(args.color)
            } else if args.color == ColorMode::Always {
                Painter::new(ColorMode::Always)
            } else {
                Painter::plain()
            };
            write_diff_human(&mut out, &diffs, &config.options, painter)?;
        }
        DiffStyle::Json => write_diff_json(&mut out, &diffs, &config.options, &file_a, &file_b)?,
    }
    out.flush()?;
    info!(
        locations = diffs.iter().filter(|d| !d.is_empty()).count(),
        "diff report written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Command, RootCli};
    use clap::Parser;

    fn diff_args(argv: &[&str]) -> DiffArgs {
        let cli = RootCli::parse_from(std::iter::once("remarkutil").chain(argv.iter().copied()));
        match cli.command {
            Command::Diff(args) => args,
            other => panic!("expected diff, got {other:?}"),
        }
    }

    #[test]
    fn test_flags_map_to_options() {
        let config = diff_args(&[
            "diff",
            "a.yaml",
            "b.yaml",
            "-v",
            "--only-show-common-remarks",
            "--use-strict-compare",
        ])
        .resolve(&RemarkUtilConfig::default());
        assert!(config.options.verbose);
        assert!(config.options.only_common);
        assert!(config.options.strict_arg_compare);
        assert!(!config.options.only_different);
    }

    #[test]
    fn test_file_switches_are_ored() {
        let defaults =
            RemarkUtilConfig::parse("[diff]\nparser = \"json\"\ntype_diff_only = true\n").unwrap();
        let config = diff_args(&["diff", "a", "b", "--show-arg-diff-only"]).resolve(&defaults);
        assert!(config.options.type_diff_only);
        assert!(config.options.arg_diff_only);
        assert_eq!(config.format, RemarkFormat::Json);
    }
}
