//! Catalog files: `{ "constants": [...], "variables": [...], "funcs": [...] }`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::catalog::Catalog;

/// Load catalogs from JSON. A missing file is an empty catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        debug!(path = %path.display(), "catalog missing; using empty catalog");
        return Ok(Catalog::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read catalog {}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&contents)
        .with_context(|| format!("parse catalog {}", path.display()))?;
    debug!(
        path = %path.display(),
        variables = catalog.variables.len(),
        constants = catalog.constants.len(),
        funcs = catalog.funcs.len(),
        "loaded catalog"
    );
    Ok(catalog)
}
