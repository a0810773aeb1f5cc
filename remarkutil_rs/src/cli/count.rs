use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use super::FilterArgs;
use crate::config::{CountConfig, RemarkUtilConfig};
use crate::counter::{CountBy, count_remarks};
use crate::group::GroupBy;
use crate::io::{Output, read_input};
use crate::parser::RemarkFormat;
use crate::report::{CountStyle, write_count};

#[derive(Args, Debug, Clone)]
pub struct CountArgs {
    /// Remark file to read (`-` for stdin).
    #[arg(default_value = "-")]
    pub input: PathBuf,
    /// Input remark format.
    #[arg(long, value_enum)]
    pub parser: Option<RemarkFormat>,
    /// Output file (`-` for stdout).
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: PathBuf,
    /// What to count: remark occurrences or the values of numeric keys.
    #[arg(long, value_enum)]
    pub count_by: Option<CountBy>,
    /// How to group the counts.
    #[arg(long, value_enum)]
    pub group_by: Option<GroupBy>,
    /// Argument keys to sum with `--count-by key`.
    #[arg(long, value_delimiter = ',')]
    pub keys: Vec<String>,
    /// Regexes selecting argument keys to sum with `--count-by key`.
    #[arg(long, value_delimiter = ',')]
    pub rkeys: Vec<String>,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Report format.
    #[arg(long, value_enum, default_value_t = CountStyle::Csv)]
    pub report_style: CountStyle,
}

impl CountArgs {
    /// Flags override the config file; the file overrides built-in defaults.
    pub fn resolve(&self, defaults: &RemarkUtilConfig) -> CountConfig {
        let file = &defaults.count;
        let (keys, rkeys) = if self.keys.is_empty() && self.rkeys.is_empty() {
            (file.keys.clone(), file.rkeys.clone())
        } else {
            (self.keys.clone(), self.rkeys.clone())
        };
        CountConfig {
            format: self.parser.or(file.parser).unwrap_or_default(),
            count_by: self.count_by.or(file.count_by).unwrap_or_default(),
            group_by: self.group_by.or(file.group_by).unwrap_or_default(),
            keys,
            rkeys,
            filter: self.filter.to_spec().over(&defaults.filter),
        }
    }
}

pub fn run_count(args: &CountArgs, defaults: &RemarkUtilConfig) -> Result<()> {
    let config = args.resolve(defaults);
    debug!(?config, "count configuration");

    let buffer = read_input(&args.input)?;
    let report = count_remarks(&config, &buffer)
        .with_context(|| format!("failed to count remarks in '{}'", args.input.display()))?;

    let mut out = Output::open(&args.output)?;
    write_count(&mut out, &report, args.report_style)?;
    out.flush()?;
    info!(
        groups = report.rows.len(),
        columns = report.columns.len(),
        "count report written"
    );
    Ok(())
}
