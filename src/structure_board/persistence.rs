use super::model::{Board, BoardError, ContainerId, ContentLocation, ItemId};

pub const BOARD_SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    UnsupportedVersion { found: u32, expected: u32 },
    Board(BoardError),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported board snapshot version: {found} (expected {expected})"
                )
            }
            Self::Board(err) => write!(f, "invalid board snapshot: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedVersion { .. } => None,
            Self::Board(err) => Some(err),
        }
    }
}

impl From<BoardError> for SnapshotError {
    fn from(err: BoardError) -> Self {
        Self::Board(err)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ItemSnapshot {
    pub id: ItemId,
    #[serde(default)]
    pub content: ContentLocation,
    #[serde(default)]
    pub nesting_disabled: bool,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub children: Vec<ItemSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct PlaceholderSnapshot {
    pub id: u64,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub nesting_disabled: bool,
    #[serde(default)]
    pub children: Vec<ItemSnapshot>,
}

/// The rendered structure of a board, without transient drag state.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct BoardSnapshot {
    pub version: u32,
    pub placeholders: Vec<PlaceholderSnapshot>,
    /// `None` when the page has no clipboard.
    pub clipboard: Option<Vec<ItemSnapshot>>,
}

fn snapshot_items(board: &Board, container: ContainerId) -> Vec<ItemSnapshot> {
    board
        .children(container)
        .iter()
        .filter_map(|&id| {
            let item = board.item(id)?;
            let nested = ContainerId::Plugin(id);
            Some(ItemSnapshot {
                id,
                content: item.content_location(),
                nesting_disabled: board.container(nested).is_some_and(|c| c.is_disabled()),
                expanded: item.state().expanded,
                children: snapshot_items(board, nested),
            })
        })
        .collect()
}

fn restore_items(
    board: &mut Board,
    parent: ContainerId,
    items: &[ItemSnapshot],
) -> Result<(), BoardError> {
    for snapshot in items {
        board.add_item(snapshot.id, parent)?;
        board.set_content_location(snapshot.id, snapshot.content)?;
        let nested = ContainerId::Plugin(snapshot.id);
        board.set_nesting_disabled(nested, snapshot.nesting_disabled)?;
        restore_items(board, nested, &snapshot.children)?;

        let collapsible = !snapshot.children.is_empty();
        if let Some(state) = board.item_state_mut(snapshot.id) {
            state.collapsible = collapsible;
            state.expanded = snapshot.expanded;
        }
    }
    Ok(())
}

impl Board {
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            version: BOARD_SNAPSHOT_VERSION,
            placeholders: self
                .placeholders()
                .iter()
                .filter_map(|&id| {
                    let container_id = ContainerId::Placeholder(id);
                    let container = self.container(container_id)?;
                    Some(PlaceholderSnapshot {
                        id,
                        is_static: container.is_static(),
                        nesting_disabled: container.is_disabled(),
                        children: snapshot_items(self, container_id),
                    })
                })
                .collect(),
            clipboard: self
                .has_clipboard()
                .then(|| snapshot_items(self, ContainerId::Clipboard)),
        }
    }

    /// Rebuild a board. Container state (empty, hidden) is left for the structure board to
    /// recompute.
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != BOARD_SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: BOARD_SNAPSHOT_VERSION,
            });
        }

        let mut board = Self::new();
        for placeholder in &snapshot.placeholders {
            let container = if placeholder.is_static {
                board.add_static_placeholder(placeholder.id)?
            } else {
                board.add_placeholder(placeholder.id)?
            };
            board.set_nesting_disabled(container, placeholder.nesting_disabled)?;
        }
        for placeholder in &snapshot.placeholders {
            restore_items(
                &mut board,
                ContainerId::Placeholder(placeholder.id),
                &placeholder.children,
            )?;
        }
        if let Some(clipboard) = &snapshot.clipboard {
            let container = board.add_clipboard();
            restore_items(&mut board, container, clipboard)?;
        }
        Ok(board)
    }
}
