//! Helpers for rendering deterministic condition node paths.

use crate::core::condition::Condition;

/// Return the `/`-separated id path to `target_id`, rooted at `root`.
pub fn condition_path(root: &Condition, target_id: &str) -> Option<String> {
    let mut path = Vec::new();
    if condition_path_inner(root, target_id, &mut path) {
        return Some(path.join("/"));
    }
    None
}

fn condition_path_inner<'a>(
    node: &'a Condition,
    target_id: &str,
    path: &mut Vec<&'a str>,
) -> bool {
    path.push(node.id());
    if node.id() == target_id {
        return true;
    }
    for child in node.children() {
        if condition_path_inner(child, target_id, path) {
            return true;
        }
    }
    path.pop();
    false
}
