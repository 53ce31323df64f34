use super::model::{ContainerId, ItemId};

/// The clone that follows the pointer during a drag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Helper {
    /// The item the helper was cloned from, if the dragged element resolved to one.
    pub source: Option<ItemId>,

    /// Carries the "being dragged" marker.
    pub is_dragging: bool,

    /// The dragged item drags nested children along.
    pub stack: bool,
}

/// One drag, from start to drop or cancel.
#[derive(Clone, Debug)]
pub struct DragTransaction {
    id: u64,
    moving_item: Option<ItemId>,
    source: Option<(ContainerId, usize)>,
    helper: Helper,
    interrupted: bool,
}

impl DragTransaction {
    /// Serial number, unique per coordinator.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn moving_item(&self) -> Option<ItemId> {
        self.moving_item
    }

    pub fn source_container(&self) -> Option<ContainerId> {
        self.source.map(|(container, _)| container)
    }

    /// Where the item was when the drag started.
    pub fn source_position(&self) -> Option<(ContainerId, usize)> {
        self.source
    }

    pub fn helper(&self) -> &Helper {
        &self.helper
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted
    }
}

impl std::fmt::Display for DragTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "drag id={}", self.id)?;
        match self.moving_item {
            Some(item) => write!(f, " item={item}")?,
            None => write!(f, " item=?")?,
        }
        if let Some((container, index)) = self.source {
            write!(f, " from={container:?}[{index}]")?;
        }
        if self.interrupted {
            write!(f, " interrupted")?;
        }
        Ok(())
    }
}

/// Holds at most one transaction and hands out serial numbers.
#[derive(Debug, Default)]
pub(super) struct TransactionSlot {
    next_id: u64,
    active: Option<DragTransaction>,
}

impl TransactionSlot {
    pub(super) fn open(
        &mut self,
        moving_item: Option<ItemId>,
        source: Option<(ContainerId, usize)>,
        helper: Helper,
    ) -> &DragTransaction {
        let id = self.next_id.max(1);
        self.next_id = id.saturating_add(1);
        self.active.insert(DragTransaction {
            id,
            moving_item,
            source,
            helper,
            interrupted: false,
        })
    }

    pub(super) fn current(&self) -> Option<&DragTransaction> {
        self.active.as_ref()
    }

    pub(super) fn mark_interrupted(&mut self) {
        if let Some(active) = &mut self.active {
            active.interrupted = true;
        }
    }

    pub(super) fn clear_helper(&mut self) {
        if let Some(active) = &mut self.active {
            active.helper.is_dragging = false;
            active.helper.stack = false;
        }
    }

    pub(super) fn take(&mut self) -> Option<DragTransaction> {
        self.active.take()
    }
}
