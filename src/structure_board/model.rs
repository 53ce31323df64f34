use std::collections::BTreeMap;

/// Identity of a plugin item. Positive and stable for the lifetime of a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A drop region. Every item owns exactly one nested area ([`ContainerId::Plugin`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ContainerId {
    Placeholder(u64),
    Plugin(ItemId),
    Clipboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Placeholder,
    ItemNestedArea,
    Clipboard,
}

impl ContainerId {
    pub fn kind(self) -> ContainerKind {
        match self {
            Self::Placeholder(_) => ContainerKind::Placeholder,
            Self::Plugin(_) => ContainerKind::ItemNestedArea,
            Self::Clipboard => ContainerKind::Clipboard,
        }
    }
}

/// Where the content-view counterpart of an item currently lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ContentLocation {
    #[default]
    Page,
    Clipboard,
}

/// Visual state of a container, as re-tagged by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContainerState {
    pub empty: bool,

    /// The bulk "copy all" affordance on a placeholder's title bar is disabled.
    pub copy_all_disabled: bool,

    /// The list is collapsed out of the layout (only empty nested areas are ever hidden).
    pub hidden: bool,
}

/// Visual state of an item, as re-tagged by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemState {
    /// This is the element being moved.
    pub is_dragging: bool,

    /// Transient "being dragged" marker, as carried by helper clones.
    /// Marked items never count towards their container's contents.
    pub helper_marker: bool,

    pub collapsible: bool,
    pub expanded: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Container {
    pub(super) children: Vec<ItemId>,
    pub(super) disabled: bool,
    pub(super) is_static: bool,
    pub(super) state: ContainerState,
}

impl Container {
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    /// Nesting below this point is forbidden.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }
}

#[derive(Clone, Debug)]
pub struct Item {
    pub(super) parent: ContainerId,
    pub(super) content: ContentLocation,
    pub(super) state: ItemState,
}

impl Item {
    pub fn parent(&self) -> ContainerId {
        self.parent
    }

    pub fn content_location(&self) -> ContentLocation {
        self.content
    }

    pub fn state(&self) -> ItemState {
        self.state
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardError {
    UnknownItem(ItemId),
    UnknownContainer(ContainerId),
    DuplicateItem(ItemId),
    DuplicatePlaceholder(u64),
    IntoOwnSubtree { item: ItemId, target: ContainerId },
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "unknown item {id}"),
            Self::UnknownContainer(id) => write!(f, "unknown container {id:?}"),
            Self::DuplicateItem(id) => write!(f, "item {id} already exists"),
            Self::DuplicatePlaceholder(id) => write!(f, "placeholder {id} already exists"),
            Self::IntoOwnSubtree { item, target } => {
                write!(f, "cannot move item {item} into its own subtree ({target:?})")
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// The structure tree of one page: placeholders, the optional clipboard and the plugin
/// items nested inside them.
///
/// The tree is moved around by the host's reorder capability (see [`Board::move_item`]);
/// the drag engine itself only reads it and re-tags [`ContainerState`]/[`ItemState`].
#[derive(Clone, Debug, Default)]
pub struct Board {
    pub(super) containers: BTreeMap<ContainerId, Container>,
    pub(super) items: BTreeMap<ItemId, Item>,
    pub(super) placeholder_order: Vec<u64>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_placeholder(&mut self, id: u64) -> Result<ContainerId, BoardError> {
        self.insert_placeholder(id, false)
    }

    /// Static placeholders are shared across pages and listed last once the board is shown.
    pub fn add_static_placeholder(&mut self, id: u64) -> Result<ContainerId, BoardError> {
        self.insert_placeholder(id, true)
    }

    fn insert_placeholder(&mut self, id: u64, is_static: bool) -> Result<ContainerId, BoardError> {
        let container_id = ContainerId::Placeholder(id);
        if self.containers.contains_key(&container_id) {
            return Err(BoardError::DuplicatePlaceholder(id));
        }
        self.containers.insert(
            container_id,
            Container {
                is_static,
                ..Default::default()
            },
        );
        self.placeholder_order.push(id);
        Ok(container_id)
    }

    /// Create the clipboard area. Calling this twice is harmless.
    pub fn add_clipboard(&mut self) -> ContainerId {
        self.containers.entry(ContainerId::Clipboard).or_default();
        ContainerId::Clipboard
    }

    /// Append a new item at the end of `parent`.
    ///
    /// Items created inside the clipboard get their content counterpart there too.
    pub fn add_item(&mut self, id: ItemId, parent: ContainerId) -> Result<(), BoardError> {
        if self.items.contains_key(&id) {
            return Err(BoardError::DuplicateItem(id));
        }
        let content = if self.is_within_clipboard(parent) {
            ContentLocation::Clipboard
        } else {
            ContentLocation::Page
        };
        self.containers
            .get_mut(&parent)
            .ok_or(BoardError::UnknownContainer(parent))?
            .children
            .push(id);
        self.items.insert(
            id,
            Item {
                parent,
                content,
                state: ItemState::default(),
            },
        );
        self.containers
            .insert(ContainerId::Plugin(id), Container::default());
        Ok(())
    }

    /// Move `id` to position `index` of `target` (clamped to the end).
    ///
    /// This is the reorder capability's side of a drop: it is what the host does to the tree
    /// before it asks the coordinator to synchronize.
    pub fn move_item(
        &mut self,
        id: ItemId,
        target: ContainerId,
        index: usize,
    ) -> Result<(), BoardError> {
        let source = self.parent_of(id).ok_or(BoardError::UnknownItem(id))?;
        if !self.containers.contains_key(&target) {
            return Err(BoardError::UnknownContainer(target));
        }
        if self.is_within_subtree(target, id) {
            return Err(BoardError::IntoOwnSubtree { item: id, target });
        }

        if let Some(container) = self.containers.get_mut(&source) {
            container.children.retain(|&child| child != id);
        }
        if let Some(container) = self.containers.get_mut(&target) {
            let index = index.min(container.children.len());
            container.children.insert(index, id);
        }
        if let Some(item) = self.items.get_mut(&id) {
            item.parent = target;
        }
        Ok(())
    }

    pub fn set_content_location(
        &mut self,
        id: ItemId,
        location: ContentLocation,
    ) -> Result<(), BoardError> {
        self.items
            .get_mut(&id)
            .ok_or(BoardError::UnknownItem(id))?
            .content = location;
        Ok(())
    }

    /// Forbid (or allow again) nesting into `container`.
    pub fn set_nesting_disabled(
        &mut self,
        container: ContainerId,
        disabled: bool,
    ) -> Result<(), BoardError> {
        self.containers
            .get_mut(&container)
            .ok_or(BoardError::UnknownContainer(container))?
            .disabled = disabled;
        Ok(())
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.keys().copied()
    }

    pub fn container_ids(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.containers.keys().copied()
    }

    /// Placeholder ids in display order.
    pub fn placeholders(&self) -> &[u64] {
        &self.placeholder_order
    }

    pub fn has_clipboard(&self) -> bool {
        self.containers.contains_key(&ContainerId::Clipboard)
    }

    pub fn parent_of(&self, id: ItemId) -> Option<ContainerId> {
        self.items.get(&id).map(|item| item.parent)
    }

    pub fn position_of(&self, id: ItemId) -> Option<(ContainerId, usize)> {
        let parent = self.parent_of(id)?;
        let index = self
            .children(parent)
            .iter()
            .position(|&child| child == id)?;
        Some((parent, index))
    }

    /// Direct children of `container`, empty for unknown containers.
    pub fn children(&self, container: ContainerId) -> &[ItemId] {
        self.containers
            .get(&container)
            .map(|c| c.children.as_slice())
            .unwrap_or_default()
    }

    pub fn has_nested_children(&self, id: ItemId) -> bool {
        !self.children(ContainerId::Plugin(id)).is_empty()
    }

    /// The item owning a nested area.
    pub fn owner_item(&self, container: ContainerId) -> Option<ItemId> {
        match container {
            ContainerId::Plugin(id) if self.items.contains_key(&id) => Some(id),
            _ => None,
        }
    }

    /// `container` followed by every container enclosing it, innermost first.
    pub fn ancestors(&self, container: ContainerId) -> impl Iterator<Item = ContainerId> + '_ {
        // Bounded by the item count so a corrupted tree cannot loop forever.
        let max_steps = self.items.len() + 1;
        std::iter::successors(Some(container), move |current| match current {
            ContainerId::Plugin(id) => self.parent_of(*id),
            ContainerId::Placeholder(_) | ContainerId::Clipboard => None,
        })
        .take(max_steps + 1)
    }

    /// The placeholder that ultimately bounds `container`, if it is not in the clipboard.
    pub fn enclosing_placeholder(&self, container: ContainerId) -> Option<u64> {
        self.ancestors(container).find_map(|c| match c {
            ContainerId::Placeholder(id) => Some(id),
            ContainerId::Plugin(_) | ContainerId::Clipboard => None,
        })
    }

    pub fn is_within_clipboard(&self, container: ContainerId) -> bool {
        self.ancestors(container)
            .any(|c| c == ContainerId::Clipboard)
    }

    /// Whether `container` is `item`'s own nested area or lies anywhere below it.
    pub fn is_within_subtree(&self, container: ContainerId, item: ItemId) -> bool {
        self.ancestors(container)
            .any(|c| c == ContainerId::Plugin(item))
    }

    pub(super) fn item_state_mut(&mut self, id: ItemId) -> Option<&mut ItemState> {
        self.items.get_mut(&id).map(|item| &mut item.state)
    }

    pub(super) fn container_state_mut(&mut self, id: ContainerId) -> Option<&mut ContainerState> {
        self.containers.get_mut(&id).map(|c| &mut c.state)
    }

    /// Set or clear the helper marker on an item.
    pub fn set_helper_marker(&mut self, id: ItemId, marked: bool) -> Result<(), BoardError> {
        self.item_state_mut(id)
            .ok_or(BoardError::UnknownItem(id))?
            .helper_marker = marked;
        Ok(())
    }

    /// Stable partition: static placeholders go last. Returns `true` if the order changed.
    pub(super) fn move_static_placeholders_last(&mut self) -> bool {
        let is_static = |id: &u64| {
            self.containers
                .get(&ContainerId::Placeholder(*id))
                .is_some_and(|c| c.is_static)
        };
        let (regular, statics): (Vec<u64>, Vec<u64>) =
            self.placeholder_order.iter().copied().partition(|id| !is_static(id));
        let reordered: Vec<u64> = regular.into_iter().chain(statics).collect();
        let changed = reordered != self.placeholder_order;
        self.placeholder_order = reordered;
        changed
    }
}
