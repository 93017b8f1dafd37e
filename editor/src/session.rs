//! An editing session: one document, replayed commands, host notifications.
//!
//! The session is the only place that holds "the current document". Every
//! command goes through [`reduce`]; the observer sees each new version once.

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::catalog::Catalog;
use crate::core::command::{Command, parse_command};
use crate::core::document::DecisionSet;
use crate::core::error::EditError;
use crate::core::normalize::normalize;
use crate::core::reducer::reduce;
use crate::core::references::{DanglingReference, dangling_references};
use crate::core::types::Outcome;

/// Host callbacks.
pub trait DocumentObserver {
    /// Called once when the session opens and after every change.
    fn on_change(&mut self, document: &DecisionSet);

    /// Called on explicit submit.
    fn on_submit(&mut self, document: &DecisionSet);
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DocumentObserver for NoopObserver {
    fn on_change(&mut self, _document: &DecisionSet) {}

    fn on_submit(&mut self, _document: &DecisionSet) {}
}

type Callback = Box<dyn FnMut(&DecisionSet)>;

/// Closure-based observer; either hook may be absent.
#[derive(Default)]
pub struct Hooks {
    pub on_change: Option<Callback>,
    pub on_submit: Option<Callback>,
}

impl Hooks {
    pub fn with_change(mut self, callback: impl FnMut(&DecisionSet) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn with_submit(mut self, callback: impl FnMut(&DecisionSet) + 'static) -> Self {
        self.on_submit = Some(Box::new(callback));
        self
    }
}

impl DocumentObserver for Hooks {
    fn on_change(&mut self, document: &DecisionSet) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(document);
        }
    }

    fn on_submit(&mut self, document: &DecisionSet) {
        if let Some(callback) = self.on_submit.as_mut() {
            callback(document);
        }
    }
}

/// What one dispatched command did.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub outcome: Outcome,
    pub rejection: Option<EditError>,
}

pub struct EditorSession {
    document: DecisionSet,
    repairs: Vec<String>,
    observer: Box<dyn DocumentObserver>,
}

impl EditorSession {
    /// Normalize `raw` into the session document and notify the observer once.
    pub fn open(raw: &Value, observer: Box<dyn DocumentObserver>) -> Self {
        let normalized = normalize(raw);
        for repair in &normalized.repairs {
            warn!(repair = %repair, "repaired initial document");
        }
        let mut session = Self {
            document: normalized.document,
            repairs: normalized.repairs,
            observer,
        };
        session.observer.on_change(&session.document);
        session
    }

    pub fn document(&self) -> &DecisionSet {
        &self.document
    }

    pub fn into_document(self) -> DecisionSet {
        self.document
    }

    /// Repairs applied while normalizing the initial value.
    pub fn repairs(&self) -> &[String] {
        &self.repairs
    }

    pub fn dispatch(&mut self, command: &Command) -> Dispatched {
        let reduction = reduce(&self.document, command);
        debug!(
            command = command.command_type(),
            outcome = ?reduction.outcome,
            "dispatched command"
        );
        if let Some(err) = &reduction.rejection {
            warn!(command = command.command_type(), error = %err, "command rejected");
        }
        let changed = reduction.is_changed();
        self.document = reduction.document;
        if changed {
            self.observer.on_change(&self.document);
        }
        Dispatched {
            outcome: reduction.outcome,
            rejection: reduction.rejection,
        }
    }

    /// Dispatch a raw `{type, payload}` value; unparseable commands are
    /// rejected like any other.
    pub fn dispatch_value(&mut self, raw: &Value) -> Dispatched {
        match parse_command(raw) {
            Ok(command) => self.dispatch(&command),
            Err(err) => {
                warn!(error = %err, "command rejected");
                Dispatched {
                    outcome: Outcome::Unchanged,
                    rejection: Some(err),
                }
            }
        }
    }

    pub fn submit(&mut self) {
        debug!(units = self.document.condition_rules.len(), "submitting document");
        self.observer.on_submit(&self.document);
    }

    pub fn dangling(&self, catalog: &Catalog) -> Vec<DanglingReference> {
        dangling_references(&self.document, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingObserver, sample_catalog};
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn open(raw: Value) -> (EditorSession, RecordingObserver) {
        let observer = RecordingObserver::default();
        let session = EditorSession::open(&raw, Box::new(observer.clone()));
        (session, observer)
    }

    #[test]
    fn opening_notifies_once_with_normalized_document() {
        let (session, observer) = open(json!({}));
        assert_eq!(observer.change_count(), 1);
        assert_eq!(observer.changes.borrow()[0], *session.document());
        assert!(session.repairs().is_empty());
    }

    #[test]
    fn each_change_notifies_exactly_once() {
        let (mut session, observer) = open(json!({}));
        let result = session.dispatch(&Command::AddUnitRule);
        assert_eq!(result.outcome, Outcome::Changed);
        assert_eq!(observer.change_count(), 2);
        assert_eq!(session.document().condition_rules.len(), 2);
    }

    #[test]
    fn rejected_and_unknown_commands_do_not_notify() {
        let (mut session, observer) = open(json!({ "attrs": { "ruleType": "LOOP_RULE" } }));
        let before = session.document().clone();

        let result = session.dispatch(&Command::DeleteUnitRule {
            id: "rule-1".to_string(),
        });
        assert!(matches!(result.rejection, Some(EditError::UnitFloor { .. })));

        let result = session.dispatch_value(&json!({ "type": "decisionSet/explode" }));
        assert!(matches!(
            result.rejection,
            Some(EditError::UnknownCommand { .. })
        ));

        assert_eq!(*session.document(), before);
        assert_eq!(observer.change_count(), 1);
    }

    #[test]
    fn submit_hands_over_current_document() {
        let (mut session, observer) = open(json!({}));
        session.dispatch_value(&json!({
            "type": "decisionSet/setName",
            "payload": { "name": "Discounts" }
        }));
        session.submit();
        assert_eq!(observer.submit_count(), 1);
        assert_eq!(observer.submits.borrow()[0].attrs.name, "Discounts");
    }

    #[test]
    fn closure_hooks_receive_notifications() {
        let changes = Rc::new(Cell::new(0));
        let seen = Rc::clone(&changes);
        let hooks = Hooks::default().with_change(move |_| seen.set(seen.get() + 1));
        let mut session = EditorSession::open(&json!({}), Box::new(hooks));
        session.dispatch(&Command::AddUnitRule);
        session.submit();
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn dangling_references_are_reported_not_rejected() {
        let (mut session, _observer) = open(json!({}));
        let result = session.dispatch_value(&json!({
            "type": "decisionSet/setLoopTarget",
            "payload": { "valueId": "var.gone", "valueType": "VARIABLE" }
        }));
        assert_eq!(result.rejection, None);
        let dangling = session.dangling(&sample_catalog());
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].location, "loopTarget");
    }
}
