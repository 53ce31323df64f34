use itertools::Itertools as _;

use super::integrity;
use super::model::{Board, ContainerId};
use super::StructureBoard;

fn debug_board_summary(board: &Board, max_lines: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut stack: Vec<(ContainerId, usize)> = board
        .placeholders()
        .iter()
        .rev()
        .map(|&id| (ContainerId::Placeholder(id), 0))
        .collect();
    if board.has_clipboard() {
        stack.insert(0, (ContainerId::Clipboard, 0));
    }

    while let Some((container, depth)) = stack.pop() {
        let Some(state) = board.container(container).map(|c| c.state()) else {
            lines.push(format!("{container:?} MISSING"));
            continue;
        };
        let children = board.children(container);
        lines.push(format!(
            "{:indent$}{container:?} empty={} hidden={} children=[{}]",
            "",
            state.empty,
            state.hidden,
            children.iter().join(", "),
            indent = depth * 2
        ));
        // Nested areas are listed right below their container.
        stack.extend(
            children
                .iter()
                .rev()
                .map(|&child| (ContainerId::Plugin(child), depth + 1)),
        );

        if lines.len() >= max_lines {
            break;
        }
    }

    format!(
        "placeholders={} items={}\n{}",
        board.placeholders().len(),
        board.item_ids().count(),
        lines.join("\n")
    )
}

impl StructureBoard {
    pub(super) fn debug_log_event(&mut self, message: impl Into<String>) {
        if !self.options.debug_event_log {
            return;
        }
        self.push_debug_log_line(message.into());
    }

    fn debug_integrity_log_event(&mut self, message: impl Into<String>) {
        if !self.options.debug_integrity {
            return;
        }
        self.push_debug_log_line(message.into());
    }

    fn push_debug_log_line(&mut self, message: String) {
        let cap = self.options.debug_event_log_capacity.clamp(1, 10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_serial = self.debug_serial.wrapping_add(1);
        self.debug_log
            .push_back(format!("[#{}] {}", self.debug_serial, message));
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// The debug event log, oldest line first.
    pub fn debug_log_text(&self) -> String {
        self.debug_log.iter().join("\n")
    }

    pub(super) fn debug_check_integrity(&mut self) {
        let issues = integrity::board_integrity_issues(&self.board);
        let hash = integrity::hash_issues(&issues);

        let prev = std::mem::replace(&mut self.debug_last_integrity_hash, hash);
        if prev == hash {
            return;
        }

        if issues.is_empty() {
            if prev != 0 {
                self.debug_integrity_log_event("integrity OK");
            }
            return;
        }

        log::warn!("structure board integrity: {} issue(s)", issues.len());
        self.debug_integrity_log_event(format!("integrity FAIL issues={}", issues.len()));
        for issue in &issues {
            self.debug_integrity_log_event(issue.clone());
        }
        let summary = debug_board_summary(&self.board, 48);
        self.debug_integrity_log_event(format!("integrity board_summary:\n{summary}"));
    }
}
