//! Document load/save helpers with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::Draft;
use serde_json::Value;
use tracing::debug;

use super::config::write_atomic;
use crate::core::document::DecisionSet;
use crate::core::invariants::validate_invariants;
use crate::core::normalize::{Normalized, normalize};

pub const DOCUMENT_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/decision_set/v1.schema.json"
));

pub fn read_raw(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read document {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse document {}", path.display()))
}

/// Load a raw document and normalize it. Only unreadable or non-JSON files fail.
pub fn load_document(path: &Path) -> Result<Normalized> {
    let raw = read_raw(path)?;
    let normalized = normalize(&raw);
    debug!(
        path = %path.display(),
        repairs = normalized.repairs.len(),
        "loaded document"
    );
    Ok(normalized)
}

pub fn render_document(doc: &DecisionSet, pretty: bool) -> Result<String> {
    let mut buf = if pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    }
    .context("serialize document")?;
    buf.push('\n');
    Ok(buf)
}

/// Atomically write the document with a trailing newline.
pub fn write_document(path: &Path, doc: &DecisionSet, pretty: bool) -> Result<()> {
    write_atomic(path, &render_document(doc, pretty)?)?;
    debug!(path = %path.display(), "wrote document");
    Ok(())
}

/// Strict check of a stored document: schema conformance plus semantic
/// invariants. Nothing is repaired.
pub fn validate_document(schema_path: &Path, document_path: &Path) -> Result<DecisionSet> {
    let schema_contents = fs::read_to_string(schema_path)
        .with_context(|| format!("read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_contents)
        .with_context(|| format!("parse schema {}", schema_path.display()))?;
    let raw = read_raw(document_path)?;
    validate_schema(&raw, &schema)?;
    let doc: DecisionSet = serde_json::from_value(raw)
        .with_context(|| format!("deserialize document {}", document_path.display()))?;
    let errors = validate_invariants(&doc);
    if !errors.is_empty() {
        bail!("invariant violations:\n- {}", errors.join("\n- "));
    }
    Ok(doc)
}

/// Validate JSON instance against a JSON Schema (Draft 2020-12).
fn validate_schema(instance: &Value, schema: &Value) -> Result<()> {
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(schema)
        .map_err(|err| anyhow!("invalid schema: {}", err))?;
    let messages: Vec<String> = compiled
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        bail!("schema validation failed:\n- {}", messages.join("\n- "));
    }
    Ok(())
}
