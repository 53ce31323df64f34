use itertools::Itertools as _;

use super::model::{Board, ContainerId, ContainerKind, ItemId};

/// Whether `container` counts as empty, ignoring `excluded` and helper-marked items.
pub fn is_effectively_empty(board: &Board, container: ContainerId, excluded: Option<ItemId>) -> bool {
    !board.children(container).iter().any(|&child| {
        Some(child) != excluded
            && board
                .item(child)
                .is_some_and(|item| !item.state().helper_marker)
    })
}

/// Re-apply the empty marker (and, for placeholders, the disabled "copy all" affordance)
/// on `containers`.
///
/// Returns the containers whose state actually changed, so a second identical call
/// returns nothing. Unknown containers and duplicates are skipped.
pub fn refresh(
    board: &mut Board,
    containers: impl IntoIterator<Item = ContainerId>,
    excluded: Option<ItemId>,
) -> Vec<ContainerId> {
    let mut changed = Vec::new();
    for container in containers.into_iter().unique() {
        let empty = is_effectively_empty(board, container, excluded);
        let copy_all_applies = container.kind() == ContainerKind::Placeholder;
        let Some(state) = board.container_state_mut(container) else {
            continue;
        };
        let before = *state;
        state.empty = empty;
        if copy_all_applies {
            state.copy_all_disabled = empty;
        }
        if *state != before {
            changed.push(container);
        }
    }
    changed
}

pub fn refresh_all(board: &mut Board, excluded: Option<ItemId>) -> Vec<ContainerId> {
    let all: Vec<ContainerId> = board.container_ids().collect();
    refresh(board, all, excluded)
}

/// Un-hide every list so that empty ones become valid drop targets.
pub fn reveal_all(board: &mut Board) -> usize {
    let all: Vec<ContainerId> = board.container_ids().collect();
    let mut revealed = 0;
    for id in all {
        if let Some(state) = board.container_state_mut(id) {
            if std::mem::replace(&mut state.hidden, false) {
                revealed += 1;
            }
        }
    }
    revealed
}

/// Hide item nested areas that have no children; show the others.
pub fn hide_empty_nested(board: &mut Board) -> usize {
    let nested: Vec<(ContainerId, bool)> = board
        .container_ids()
        .filter(|id| id.kind() == ContainerKind::ItemNestedArea)
        .map(|id| (id, board.children(id).is_empty()))
        .collect();

    let mut changed = 0;
    for (id, empty) in nested {
        if let Some(state) = board.container_state_mut(id) {
            if state.hidden != empty {
                state.hidden = empty;
                changed += 1;
            }
        }
    }
    changed
}
