//! End-to-end editing properties driven through the public session API.

use serde_json::{Value, json};

use rule_editor::core::command::{Command, ValueSelection};
use rule_editor::core::document::LoopTarget;
use rule_editor::core::error::EditError;
use rule_editor::core::invariants::validate_invariants;
use rule_editor::core::normalize::normalize;
use rule_editor::core::types::{Outcome, RuleType, ValueKind};
use rule_editor::session::{EditorSession, NoopObserver};
use rule_editor::test_support::{RecordingObserver, loop_document};

fn loop_session() -> EditorSession {
    let raw = serde_json::to_value(loop_document(&["rule-1", "rule-2"])).expect("json");
    EditorSession::open(&raw, Box::new(NoopObserver))
}

fn dispatch(session: &mut EditorSession, raw: Value) -> Outcome {
    let result = session.dispatch_value(&raw);
    assert_eq!(result.rejection, None, "{raw}");
    result.outcome
}

#[test]
fn empty_input_opens_with_one_unit() {
    let session = EditorSession::open(&json!({}), Box::new(NoopObserver));
    let doc = session.document();
    assert_eq!(doc.condition_rules.len(), 1);
    assert!(doc.start_actions.is_empty());
    assert!(doc.end_actions.is_empty());
    assert!(validate_invariants(doc).is_empty());
}

#[test]
fn normalizing_a_session_document_is_a_fixed_point() {
    let mut session = loop_session();
    dispatch(
        &mut session,
        json!({ "type": "condition/wrapInGroup",
                "payload": { "ruleId": "rule-1", "nodeId": "rule-1.root", "combinator": "OR" } }),
    );
    let doc = session.document().clone();
    let renormalized = normalize(&serde_json::to_value(&doc).expect("json"));
    assert_eq!(renormalized.document, doc);
    assert!(renormalized.repairs.is_empty());
}

#[test]
fn deleting_first_of_two_units_keeps_the_second() {
    let mut session = loop_session();
    dispatch(
        &mut session,
        json!({ "type": "decisionSet/deleteUnitRule", "payload": { "id": "rule-1" } }),
    );
    let ids: Vec<&str> = session
        .document()
        .condition_rules
        .iter()
        .map(|unit| unit.id.as_str())
        .collect();
    assert_eq!(ids, vec!["rule-2"]);

    let result = session.dispatch(&Command::DeleteUnitRule {
        id: "rule-2".to_string(),
    });
    assert_eq!(
        result.rejection,
        Some(EditError::UnitFloor {
            id: "rule-2".to_string()
        })
    );
    assert_eq!(session.document().condition_rules.len(), 1);
}

#[test]
fn rename_touches_only_the_name() {
    let mut session = loop_session();
    let before = session.document().clone();
    dispatch(
        &mut session,
        json!({ "type": "decisionSet/setUnitRuleName",
                "payload": { "id": "rule-2", "name": "High value" } }),
    );
    let mut expected = before;
    expected.condition_rules[1].name = "High value".to_string();
    assert_eq!(*session.document(), expected);
}

#[test]
fn replaying_the_same_commands_is_deterministic() {
    let commands = vec![
        json!({ "type": "decisionSet/addUnitRule" }),
        json!({ "type": "condition/wrapInGroup",
                "payload": { "ruleId": "rule-3", "nodeId": "cond-1" } }),
        json!({ "type": "condition/addChild",
                "payload": { "ruleId": "rule-3", "groupId": "cond-2",
                             "child": { "type": "comparison", "operator": "GT",
                                        "left": { "kind": "VARIABLE", "id": "var.amount" },
                                        "right": { "kind": "INPUT", "value": 100 } } } }),
        json!({ "type": "action/appendAction",
                "payload": { "list": { "position": "trueActions", "ruleId": "rule-3" },
                             "action": { "operator": "ASSIGN",
                                         "target": { "kind": "VARIABLE", "id": "var.total" },
                                         "args": [{ "kind": "INPUT", "value": 1 }] } } }),
    ];
    let run = || {
        let mut session = loop_session();
        for command in &commands {
            dispatch(&mut session, command.clone());
        }
        session.into_document()
    };
    let first = run();
    assert_eq!(first, run());
    assert!(validate_invariants(&first).is_empty());
    assert_eq!(first.condition_rules[2].true_actions[0].id, "action-1");
    assert_eq!(
        first.condition_rules[2].root_condition.ids(),
        vec!["cond-2", "cond-1", "cond-3"]
    );
}

#[test]
fn add_then_remove_child_restores_children() {
    let mut session = loop_session();
    dispatch(
        &mut session,
        json!({ "type": "condition/wrapInGroup",
                "payload": { "ruleId": "rule-1", "nodeId": "rule-1.root" } }),
    );
    let before = session.document().clone();
    dispatch(
        &mut session,
        json!({ "type": "condition/addChild",
                "payload": { "ruleId": "rule-1", "groupId": "cond-1",
                             "child": { "type": "comparison" } } }),
    );
    let root = &session.document().condition_rules[0].root_condition;
    assert_eq!(root.children().len(), 2);
    dispatch(
        &mut session,
        json!({ "type": "condition/removeChild",
                "payload": { "ruleId": "rule-1", "groupId": "cond-1", "childId": "cond-2" } }),
    );
    assert_eq!(*session.document(), before);
}

#[test]
fn loop_target_selection_is_stored_verbatim() {
    let mut session = loop_session();
    let selection: ValueSelection = serde_json::from_value(json!({
        "parentId": "p", "valueId": "v1", "type": "VARIABLE", "value": 10
    }))
    .expect("selection");
    let result = session.dispatch(&Command::set_loop_target(selection));
    assert_eq!(result.outcome, Outcome::Changed);
    assert_eq!(
        session.document().loop_target,
        LoopTarget {
            parent_id: Some("p".to_string()),
            value_id: Some("v1".to_string()),
            value_type: Some(ValueKind::Variable),
            value: json!(10),
        }
    );
    assert_eq!(
        serde_json::to_value(&session.document().loop_target).expect("json"),
        json!({ "parentId": "p", "valueId": "v1", "valueType": "VARIABLE", "value": 10 })
    );
}

#[test]
fn rule_type_switch_keeps_loop_sections() {
    let observer = RecordingObserver::default();
    let raw = serde_json::to_value(loop_document(&["rule-1"])).expect("json");
    let mut session = EditorSession::open(&raw, Box::new(observer.clone()));
    dispatch(
        &mut session,
        json!({ "type": "decisionSet/setLoopTarget",
                "payload": { "valueId": "var.items", "valueType": "VARIABLE" } }),
    );
    dispatch(
        &mut session,
        json!({ "type": "decisionSet/setRuleType", "payload": { "ruleType": "SIMPLE_RULE" } }),
    );
    let doc = session.document();
    assert_eq!(doc.attrs.rule_type, Some(RuleType::Simple));
    assert_eq!(doc.loop_target.value_id.as_deref(), Some("var.items"));
    assert_eq!(observer.change_count(), 3);
}
