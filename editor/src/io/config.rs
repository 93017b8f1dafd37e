//! Editor configuration stored under `.rule-editor/editor.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Editor configuration (TOML).
///
/// Relative paths are resolved against the `.rule-editor/` directory. Missing
/// fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    /// Decision set document edited by `apply` and checked by `validate`.
    pub document: PathBuf,

    /// Host catalogs used by `options` and `refs`.
    pub catalog: PathBuf,

    /// Exit with `REJECTED` when `apply` saw any rejected command.
    pub strict: bool,

    /// Pretty-print JSON written to disk and stdout.
    pub pretty: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            document: PathBuf::from("document.json"),
            catalog: PathBuf::from("catalog.json"),
            strict: false,
            pretty: true,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.document.as_os_str().is_empty() {
            return Err(anyhow!("document must be a non-empty path"));
        }
        if self.catalog.as_os_str().is_empty() {
            return Err(anyhow!("catalog must be a non-empty path"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `EditorConfig::default()`.
pub fn load_config(path: &Path) -> Result<EditorConfig> {
    if !path.exists() {
        let cfg = EditorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: EditorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk.
pub fn write_config(path: &Path, cfg: &EditorConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

/// Write via a sibling temp file and rename, so readers never see a partial file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = parent.join(tmp_name);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, EditorConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("editor.toml");
        let cfg = EditorConfig {
            strict: true,
            ..EditorConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
        assert!(!temp.path().join("nested").join("editor.toml.tmp").exists());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("editor.toml");
        fs::write(&path, "pretty = false\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert!(!cfg.pretty);
        assert_eq!(cfg.document, PathBuf::from("document.json"));
    }

    #[test]
    fn empty_document_path_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("editor.toml");
        fs::write(&path, "document = \"\"\n").expect("write");
        let err = load_config(&path).expect_err("invalid");
        assert!(err.to_string().contains("document"));
    }
}
