//! Read-only catalogs of variables, constants and functions.
//!
//! Catalogs are owned by the host. The editor only reads them: to resolve
//! catalog-backed value references and to derive the value picker options.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::types::ValueKind;

/// One selectable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
    /// Declared parameters (functions only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<FuncParam>,
    /// Host-specific fields (`value`, `dataType`, ...), preserved untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Declared parameter of a catalog function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuncParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    /// Placeholder literal used when the function is first selected.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub default: Value,
}

/// The three host catalogs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub constants: Vec<CatalogEntry>,
    pub variables: Vec<CatalogEntry>,
    pub funcs: Vec<CatalogEntry>,
}

impl Catalog {
    /// Entries backing `kind`, or `None` for literal input.
    pub fn entries(&self, kind: ValueKind) -> Option<&[CatalogEntry]> {
        match kind {
            ValueKind::Input => None,
            ValueKind::Variable => Some(&self.variables),
            ValueKind::Constant => Some(&self.constants),
            ValueKind::Func => Some(&self.funcs),
        }
    }

    pub fn lookup(&self, kind: ValueKind, id: &str) -> Option<&CatalogEntry> {
        self.entries(kind)?.iter().find(|entry| entry.id == id)
    }
}

/// One top-level entry of the value picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueOption {
    pub label: &'static str,
    pub value: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<OptionChild>>,
}

/// Selectable catalog entry under a [`ValueOption`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionChild {
    pub id: String,
    pub label: String,
}

/// Derive the fixed four-entry option list from the live catalogs.
///
/// This is a pure projection and is never persisted with the document.
pub fn value_options(catalog: &Catalog) -> Vec<ValueOption> {
    [
        ("Input value", ValueKind::Input),
        ("Variable", ValueKind::Variable),
        ("Constant", ValueKind::Constant),
        ("Function", ValueKind::Func),
    ]
    .into_iter()
    .map(|(label, kind)| ValueOption {
        label,
        value: kind,
        children: catalog.entries(kind).map(|entries| {
            entries
                .iter()
                .map(|entry| OptionChild {
                    id: entry.id.clone(),
                    label: entry.label.clone(),
                })
                .collect()
        }),
    })
    .collect()
}
