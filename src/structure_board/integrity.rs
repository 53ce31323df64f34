use std::collections::{HashMap, HashSet};
use std::hash::{Hash as _, Hasher as _};

use super::model::{Board, ContainerId};

/// Cross-check the parent links, children lists and placeholder order of a board.
pub(super) fn board_integrity_issues(board: &Board) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();
    let mut listed_in: HashMap<_, ContainerId> = HashMap::new();

    for (&container_id, container) in &board.containers {
        if let ContainerId::Plugin(owner) = container_id {
            if board.item(owner).is_none() {
                issues.push(format!(
                    "integrity: nested area {container_id:?} without item"
                ));
            }
        }

        let mut local_set = HashSet::new();
        for &child in container.children() {
            if !local_set.insert(child) {
                issues.push(format!(
                    "integrity: {container_id:?} contains duplicate child {child}"
                ));
                continue;
            }

            let Some(item) = board.item(child) else {
                issues.push(format!(
                    "integrity: {container_id:?} references missing item {child}"
                ));
                continue;
            };

            if let Some(prev) = listed_in.insert(child, container_id) {
                issues.push(format!(
                    "integrity: item {child} listed in {prev:?} and {container_id:?}"
                ));
            }
            if item.parent() != container_id {
                issues.push(format!(
                    "integrity: item {child} listed in {container_id:?} but parent={:?}",
                    item.parent()
                ));
            }
        }
    }

    for (&id, item) in &board.items {
        if !listed_in.contains_key(&id) {
            issues.push(format!(
                "integrity: item {id} (parent={:?}) not listed anywhere",
                item.parent()
            ));
        }
        if board.container(ContainerId::Plugin(id)).is_none() {
            issues.push(format!("integrity: item {id} has no nested area"));
        }

        let steps = board.ancestors(ContainerId::Plugin(id)).count();
        let rooted = board
            .ancestors(ContainerId::Plugin(id))
            .last()
            .is_some_and(|top| !matches!(top, ContainerId::Plugin(_)));
        if !rooted {
            issues.push(format!(
                "integrity: item {id} is not rooted in a placeholder or the clipboard (walked {steps} levels)"
            ));
        }
    }

    for &id in board.placeholders() {
        if board.container(ContainerId::Placeholder(id)).is_none() {
            issues.push(format!("integrity: ordered placeholder {id} missing"));
        }
    }
    let ordered: HashSet<u64> = board.placeholders().iter().copied().collect();
    if ordered.len() != board.placeholders().len() {
        issues.push("integrity: placeholder order has duplicates".to_owned());
    }
    for container_id in board.container_ids() {
        if let ContainerId::Placeholder(id) = container_id {
            if !ordered.contains(&id) {
                issues.push(format!("integrity: placeholder {id} missing from order"));
            }
        }
    }

    issues
}

pub(super) fn hash_issues(lines: &[String]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for line in lines {
        line.hash(&mut hasher);
    }
    hasher.finish()
}
