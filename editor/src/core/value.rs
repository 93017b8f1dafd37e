//! Value references: literals or pointers into the host catalogs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::catalog::Catalog;
use crate::core::types::ValueKind;

/// Tagged reference to a datum.
///
/// `id` is set iff `kind` is catalog-backed. For [`ValueKind::Func`] the
/// `value` holds the argument list as an array of serialized `ValueRef`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRef {
    pub kind: ValueKind,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl Default for ValueRef {
    fn default() -> Self {
        Self::input(Value::Null)
    }
}

impl ValueRef {
    pub fn input(value: impl Into<Value>) -> Self {
        Self {
            kind: ValueKind::Input,
            id: None,
            value: value.into(),
        }
    }

    pub fn variable(id: impl Into<String>) -> Self {
        Self::catalog_ref(ValueKind::Variable, id)
    }

    pub fn constant(id: impl Into<String>) -> Self {
        Self::catalog_ref(ValueKind::Constant, id)
    }

    /// Reference a catalog function, capturing one literal placeholder per
    /// declared parameter. Unknown functions get an empty argument list.
    pub fn func(id: impl Into<String>, catalog: &Catalog) -> Self {
        let id = id.into();
        let args: Vec<Value> = catalog
            .lookup(ValueKind::Func, &id)
            .map(|entry| {
                entry
                    .params
                    .iter()
                    .map(|param| placeholder_arg(param.default.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            kind: ValueKind::Func,
            id: Some(id),
            value: Value::Array(args),
        }
    }

    fn catalog_ref(kind: ValueKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
            value: Value::Null,
        }
    }

    /// True when `id` presence agrees with `kind`.
    pub fn is_well_formed(&self) -> bool {
        self.kind.is_catalog_backed() == self.id.is_some()
    }

    /// Function-call arguments, skipping entries that do not parse.
    pub fn func_args(&self) -> Vec<ValueRef> {
        if self.kind != ValueKind::Func {
            return Vec::new();
        }
        match &self.value {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Resolve against the live catalog for display.
    pub fn resolve(&self, catalog: &Catalog) -> Resolution {
        let id = match (&self.kind, &self.id) {
            (ValueKind::Input, _) | (_, None) => {
                return Resolution::Literal {
                    label: literal_label(&self.value),
                    value: self.value.clone(),
                };
            }
            (_, Some(id)) => id,
        };
        match catalog.lookup(self.kind, id) {
            Some(entry) => Resolution::Entry {
                label: entry.label.clone(),
                value: entry.extra.get("value").cloned().unwrap_or(Value::Null),
            },
            None => Resolution::Dangling {
                kind: self.kind,
                id: id.clone(),
            },
        }
    }
}

fn placeholder_arg(default: Value) -> Value {
    serde_json::json!({ "kind": ValueKind::Input, "id": null, "value": default })
}

/// Display form of a resolved [`ValueRef`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Literal { label: String, value: Value },
    Entry { label: String, value: Value },
    /// The referenced id is absent from the catalog.
    Dangling { kind: ValueKind, id: String },
}

impl Resolution {
    pub fn label(&self) -> String {
        match self {
            Resolution::Literal { label, .. } | Resolution::Entry { label, .. } => label.clone(),
            Resolution::Dangling { kind, id } => format!("<missing {kind} {id}>"),
        }
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, Resolution::Dangling { .. })
    }
}

fn literal_label(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_catalog;
    use serde_json::json;

    #[test]
    fn input_has_no_id() {
        let value = ValueRef::input(42);
        assert!(value.id.is_none());
        assert!(value.is_well_formed());
    }

    #[test]
    fn func_captures_parameter_placeholders() {
        let catalog = sample_catalog();
        let value = ValueRef::func("fn.round", &catalog);
        let args = value.func_args();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0], ValueRef::input(Value::Null));
        assert_eq!(args[1], ValueRef::input(2));
    }

    #[test]
    fn func_for_unknown_id_has_no_args() {
        let value = ValueRef::func("fn.gone", &sample_catalog());
        assert_eq!(value.value, json!([]));
        assert_eq!(value.id.as_deref(), Some("fn.gone"));
    }

    #[test]
    fn resolve_reports_dangling_without_failing() {
        let catalog = sample_catalog();
        let resolved = ValueRef::variable("var.removed").resolve(&catalog);
        assert!(resolved.is_dangling());
        assert_eq!(resolved.label(), "<missing VARIABLE var.removed>");

        let resolved = ValueRef::constant("const.limit").resolve(&catalog);
        assert_eq!(
            resolved,
            Resolution::Entry {
                label: "Limit".to_string(),
                value: json!(1000)
            }
        );
    }

    #[test]
    fn missing_fields_deserialize_to_null() {
        let value: ValueRef = serde_json::from_value(json!({ "kind": "INPUT" })).expect("parse");
        assert_eq!(value, ValueRef::input(Value::Null));
    }
}
