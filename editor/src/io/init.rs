//! Initialization helpers for `.rule-editor/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::json;

use super::config::{EditorConfig, write_config};
use super::document_store::{DOCUMENT_SCHEMA, write_document};
use crate::core::normalize::normalize;
use crate::core::types::LOOP_RULE;

/// Canonical paths within `.rule-editor/` for a project root.
#[derive(Debug, Clone)]
pub struct EditorPaths {
    pub root: PathBuf,
    pub editor_dir: PathBuf,
    pub config_path: PathBuf,
    pub schema_path: PathBuf,
}

impl EditorPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let editor_dir = root.join(".rule-editor");
        Self {
            root,
            config_path: editor_dir.join("editor.toml"),
            schema_path: editor_dir.join("schema.json"),
            editor_dir,
        }
    }

    pub fn document_path(&self, cfg: &EditorConfig) -> PathBuf {
        self.editor_dir.join(&cfg.document)
    }

    pub fn catalog_path(&self, cfg: &EditorConfig) -> PathBuf {
        self.editor_dir.join(&cfg.catalog)
    }
}

/// Options for `init_editor`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Overwrite existing editor-owned files.
    pub force: bool,
    /// Start from a loop rule instead of an untyped decision set.
    pub loop_rule: bool,
}

/// Create `.rule-editor/` scaffolding in `root`: config, schema, a fresh
/// document and an empty catalog.
///
/// Fails if `.rule-editor/` already exists unless `options.force` is set.
pub fn init_editor(root: &Path, options: &InitOptions) -> Result<EditorPaths> {
    let paths = EditorPaths::new(root);
    if paths.editor_dir.exists() && !options.force {
        return Err(anyhow!(
            "rule-editor init: .rule-editor already exists (use --force to overwrite)"
        ));
    }
    if paths.editor_dir.exists() && !paths.editor_dir.is_dir() {
        return Err(anyhow!(
            "rule-editor init: .rule-editor exists but is not a directory"
        ));
    }
    fs::create_dir_all(&paths.editor_dir)
        .with_context(|| format!("create directory {}", paths.editor_dir.display()))?;

    let cfg = EditorConfig::default();
    write_config(&paths.config_path, &cfg)?;
    fs::write(&paths.schema_path, DOCUMENT_SCHEMA)
        .with_context(|| format!("write schema {}", paths.schema_path.display()))?;

    let seed = if options.loop_rule {
        json!({ "attrs": { "ruleType": LOOP_RULE } })
    } else {
        json!({})
    };
    write_document(&paths.document_path(&cfg), &normalize(&seed).document, cfg.pretty)?;

    let catalog_path = paths.catalog_path(&cfg);
    let mut catalog = serde_json::to_string_pretty(
        &json!({ "constants": [], "variables": [], "funcs": [] }),
    )
    .context("serialize catalog")?;
    catalog.push('\n');
    fs::write(&catalog_path, catalog)
        .with_context(|| format!("write catalog {}", catalog_path.display()))?;

    Ok(paths)
}
