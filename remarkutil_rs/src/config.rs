//! Configuration for the count and diff commands.
//!
//! Each command runs off one immutable value ([`CountConfig`] or
//! [`DiffConfig`]) built once by the CLI layer. Defaults may come from an
//! optional TOML file:
//!
//! ```toml
//! [filter]
//! pass_name = "inline"
//! remark_type = "missed"
//!
//! [count]
//! group_by = "function"
//! count_by = "key"
//! rkeys = ["^Num"]
//!
//! [diff]
//! only_common = true
//! strict_arg_compare = true
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::counter::CountBy;
use crate::diff::DiffOptions;
use crate::error::{RemarkError, Result};
use crate::group::GroupBy;
use crate::parser::RemarkFormat;
use crate::remark::RemarkType;

/// Raw filter settings. For each of name, pass and argument value the
/// literal form takes precedence over the `_regex` form.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub remark_name: Option<String>,
    pub remark_name_regex: Option<String>,
    pub pass_name: Option<String>,
    pub pass_name_regex: Option<String>,
    pub arg_value: Option<String>,
    pub arg_value_regex: Option<String>,
    pub remark_type: Option<RemarkType>,
}

impl FilterSpec {
    /// Overlays `self` on `base`. A literal/regex pair is taken from `self`
    /// as a whole when either half is set there.
    pub fn over(self, base: &FilterSpec) -> FilterSpec {
        fn pair(
            top: (Option<String>, Option<String>),
            base: (&Option<String>, &Option<String>),
        ) -> (Option<String>, Option<String>) {
            if top.0.is_some() || top.1.is_some() {
                top
            } else {
                (base.0.clone(), base.1.clone())
            }
        }

        let (remark_name, remark_name_regex) = pair(
            (self.remark_name, self.remark_name_regex),
            (&base.remark_name, &base.remark_name_regex),
        );
        let (pass_name, pass_name_regex) = pair(
            (self.pass_name, self.pass_name_regex),
            (&base.pass_name, &base.pass_name_regex),
        );
        let (arg_value, arg_value_regex) = pair(
            (self.arg_value, self.arg_value_regex),
            (&base.arg_value, &base.arg_value_regex),
        );
        FilterSpec {
            remark_name,
            remark_name_regex,
            pass_name,
            pass_name_regex,
            arg_value,
            arg_value_regex,
            remark_type: self.remark_type.or(base.remark_type),
        }
    }
}

/// Settings of one `count` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountConfig {
    pub format: RemarkFormat,
    pub count_by: CountBy,
    pub group_by: GroupBy,
    /// Literal argument keys to sum (keyed counting only).
    pub keys: Vec<String>,
    /// Argument key patterns to sum, used when `keys` is empty.
    pub rkeys: Vec<String>,
    pub filter: FilterSpec,
}

/// Settings of one `diff` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    pub format: RemarkFormat,
    pub filter: FilterSpec,
    pub options: DiffOptions,
}

/// `[count]` table of the config file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CountDefaults {
    pub parser: Option<RemarkFormat>,
    pub count_by: Option<CountBy>,
    pub group_by: Option<GroupBy>,
    pub keys: Vec<String>,
    pub rkeys: Vec<String>,
}

/// `[diff]` table of the config file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DiffDefaults {
    pub parser: Option<RemarkFormat>,
    #[serde(flatten)]
    pub options: DiffOptions,
}

/// Root of the config file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RemarkUtilConfig {
    pub filter: FilterSpec,
    pub count: CountDefaults,
    pub diff: DiffDefaults,
}

impl RemarkUtilConfig {
    /// Loads a config file. Unlike a missing implicit config, an explicitly
    /// named file that cannot be read or parsed is an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RemarkError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|message| RemarkError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::default()),
        }
    }
}
