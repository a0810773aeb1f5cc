use serde::Deserialize;
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};

use crate::error::{RemarkError, Result};
use crate::remark::{Argument, Remark, RemarkType, SourceLocation};

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct YamlBody {
    pass: String,
    name: String,
    function: String,
    #[serde(default)]
    debug_loc: Option<YamlLoc>,
    #[serde(default)]
    hotness: Option<u64>,
    #[serde(default)]
    args: Vec<Mapping>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct YamlLoc {
    file: String,
    line: u32,
    column: u32,
}

impl From<YamlLoc> for SourceLocation {
    fn from(loc: YamlLoc) -> Self {
        SourceLocation {
            file: loc.file,
            line: loc.line,
            column: loc.column,
        }
    }
}

/// Reads the multi-document YAML emitted by `-fsave-optimization-record`.
///
/// ```yaml
/// --- !Missed
/// Pass:     inline
/// Name:     NoDefinition
/// DebugLoc: { File: test.c, Line: 3, Column: 12 }
/// Function: foo
/// Args:
///   - Callee: bar
///   - String: ' will not be inlined'
/// ...
/// ```
pub struct YamlRemarkParser<'a> {
    documents: serde_yaml::Deserializer<'a>,
    done: bool,
}

impl<'a> YamlRemarkParser<'a> {
    pub fn new(buffer: &'a str) -> Self {
        Self {
            documents: serde_yaml::Deserializer::from_str(buffer),
            done: false,
        }
    }
}

impl Iterator for YamlRemarkParser<'_> {
    type Item = Result<Remark>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let Some(document) = self.documents.next() else {
                self.done = true;
                break;
            };
            let parsed = match Value::deserialize(document) {
                // Empty documents (a bare `---` or trailing `...`) carry no remark.
                Ok(Value::Null) => continue,
                Ok(value) => remark_from_value(value),
                Err(e) => Err(RemarkError::parse(e.to_string())),
            };
            if parsed.is_err() {
                self.done = true;
            }
            return Some(parsed);
        }
        None
    }
}

fn remark_from_value(value: Value) -> Result<Remark> {
    let Value::Tagged(tagged) = value else {
        return Err(RemarkError::parse(
            "remark document has no type tag (expected e.g. `--- !Missed`)",
        ));
    };
    let TaggedValue { tag, value } = *tagged;
    let remark_type: RemarkType = tag.to_string().parse().map_err(RemarkError::parse)?;
    let body: YamlBody =
        serde_yaml::from_value(value).map_err(|e| RemarkError::parse(e.to_string()))?;
    let args = body
        .args
        .into_iter()
        .map(argument_from_mapping)
        .collect::<Result<Vec<_>>>()?;

    Ok(Remark {
        remark_type,
        pass_name: body.pass,
        remark_name: body.name,
        function_name: body.function,
        location: body.debug_loc.map(SourceLocation::from),
        hotness: body.hotness,
        args,
    })
}

/// An argument is a mapping with exactly one `Key: value` entry and an
/// optional `DebugLoc` entry.
fn argument_from_mapping(mapping: Mapping) -> Result<Argument> {
    let mut entry: Option<(String, String)> = None;
    let mut location = None;

    for (key, value) in mapping {
        let key = scalar_text(&key)
            .ok_or_else(|| RemarkError::parse("remark argument key is not a scalar"))?;
        if key == "DebugLoc" {
            let loc: YamlLoc =
                serde_yaml::from_value(value).map_err(|e| RemarkError::parse(e.to_string()))?;
            location = Some(SourceLocation::from(loc));
            continue;
        }
        if entry.is_some() {
            return Err(RemarkError::parse(format!(
                "remark argument has more than one key (extra key '{key}')"
            )));
        }
        let value = scalar_text(&value).ok_or_else(|| {
            RemarkError::parse(format!("remark argument '{key}' has a non-scalar value"))
        })?;
        entry = Some((key, value));
    }

    let (key, value) = entry.ok_or_else(|| RemarkError::parse("remark argument has no key"))?;
    Ok(Argument {
        key,
        value,
        location,
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
