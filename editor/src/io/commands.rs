//! Command batches: a JSON array of commands, or one command per line.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

/// Read raw `{type, payload}` values in file order.
///
/// Commands stay unparsed so the session can classify unknown or malformed
/// ones as rejections instead of failing the whole batch.
pub fn read_commands(path: &Path) -> Result<Vec<Value>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read commands {}", path.display()))?;
    parse_commands(&contents).with_context(|| format!("parse commands {}", path.display()))
}

pub fn parse_commands(contents: &str) -> Result<Vec<Value>> {
    if contents.trim_start().starts_with('[') {
        let value: Value = serde_json::from_str(contents).context("parse json array")?;
        return match value {
            Value::Array(items) => Ok(items),
            _ => Err(anyhow!("expected a json array")),
        };
    }
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", index + 1))
        })
        .collect()
}
