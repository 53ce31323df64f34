use egui::Key;
use itertools::Itertools as _;

use super::emptiness;
use super::identifier;
use super::model::{Board, ContainerId, ContentLocation, ItemId};
use super::policy::{evaluate_placement, PlacementQuery, PolicyContext, Verdict};
use super::session::{DragTransaction, Helper, TransactionSlot};
use super::settings::SettingsSource;

/// Cached outcome of the last placement decision, read back when the drop lands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Authorization {
    #[default]
    Unknown,
    Allowed,
    Denied,
}

impl Authorization {
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }
}

impl From<bool> for Authorization {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Allowed } else { Self::Denied }
    }
}

/// Touch scrolling allowed on the structure content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TouchAction {
    /// Vertical panning only (idle).
    #[default]
    PanY,
    /// Nothing: the drag owns every axis.
    None,
}

/// Notification for the edit view of a moved item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncEvent {
    PluginStructureUpdated(ItemId),
    /// Sent instead of [`Self::PluginStructureUpdated`] when the item's content counterpart
    /// is in the clipboard.
    PluginClipboardUpdated(ItemId),
}

impl SyncEvent {
    pub fn name(self) -> &'static str {
        match self {
            Self::PluginStructureUpdated(_) => "plugin-structure-updated",
            Self::PluginClipboardUpdated(_) => "plugin-clipboard-updated",
        }
    }

    pub fn item(self) -> ItemId {
        match self {
            Self::PluginStructureUpdated(id) | Self::PluginClipboardUpdated(id) => id,
        }
    }
}

/// Work the host has to carry out on the coordinator's behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEffect {
    HideSettingsMenu,
    SetTouchAction(TouchAction),
    InstallInterruptListener,
    RemoveInterruptListener,
    /// Make the reorder capability stop tracking the pointer.
    StopMouseTracking,
    /// Synthetic pointer release on one list, so the reorder capability can clean up.
    ReleasePointer(ContainerId),
    Sync(SyncEvent),
}

/// What the reorder capability hands to the callbacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragInfo<'a> {
    /// Class attribute of the dragged element.
    pub item: Option<&'a str>,
}

impl<'a> DragInfo<'a> {
    pub fn new(item: &'a str) -> Self {
        Self { item: Some(item) }
    }
}

/// A drop that changed the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropOutcome {
    pub item: ItemId,
    /// `None` if the drag started on an element that did not resolve to an item.
    pub from: Option<ContainerId>,
    pub to: ContainerId,
    pub event: SyncEvent,
    /// Containers whose empty state changed.
    pub refreshed: Vec<ContainerId>,
    pub effects: Vec<DragEffect>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragError {
    AlreadyDragging { active: u64 },
}

impl std::fmt::Display for DragError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyDragging { active } => {
                write!(f, "a drag is already in progress (id={active})")
            }
        }
    }
}

impl std::error::Error for DragError {}

/// Drives one drag at a time on behalf of the host's reorder capability.
///
/// Callback order for a drop: [`Self::start`], any number of [`Self::is_allowed`],
/// [`Self::before_stop`], [`Self::update`]. A cancel goes through
/// [`Self::interrupt_key`] instead.
#[derive(Debug)]
pub struct DragCoordinator {
    locked: bool,
    dragging: bool,
    authorization: Authorization,
    interrupt_listener: bool,
    touch_action: TouchAction,
    hide_empty_nested_lists: bool,
    slot: TransactionSlot,
}

impl Default for DragCoordinator {
    fn default() -> Self {
        Self {
            locked: false,
            dragging: false,
            authorization: Authorization::Unknown,
            interrupt_listener: false,
            touch_action: TouchAction::PanY,
            hide_empty_nested_lists: true,
            slot: TransactionSlot::default(),
        }
    }
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock or unlock the board, e.g. while a request is in flight.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_hide_empty_nested_lists(&mut self, hide: bool) {
        self.hide_empty_nested_lists = hide;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn authorization(&self) -> Authorization {
        self.authorization
    }

    pub fn transaction(&self) -> Option<&DragTransaction> {
        self.slot.current()
    }

    pub fn has_interrupt_listener(&self) -> bool {
        self.interrupt_listener
    }

    pub fn touch_action(&self) -> TouchAction {
        self.touch_action
    }

    /// Build the helper for a dragged element.
    pub fn helper(&self, board: &Board, item: Option<&str>) -> Helper {
        Helper {
            source: resolve_item(board, item),
            ..Default::default()
        }
    }

    pub fn start(
        &mut self,
        board: &mut Board,
        info: DragInfo<'_>,
        mut helper: Helper,
    ) -> Result<Vec<DragEffect>, DragError> {
        if self.dragging {
            if let Some(active) = self.slot.current() {
                log::warn!("refusing to start a second drag while {active} is open");
                return Err(DragError::AlreadyDragging { active: active.id() });
            }
        }
        if let Some(stale) = self.slot.take() {
            log::debug!("discarding stopped {stale}");
        }

        let moving = resolve_item(board, info.item);
        let source = moving.and_then(|id| board.position_of(id));

        helper.is_dragging = true;
        helper.stack = moving.is_some_and(|id| board.has_nested_children(id));
        if let Some(state) = moving.and_then(|id| board.item_state_mut(id)) {
            state.is_dragging = true;
        }

        emptiness::reveal_all(board);
        emptiness::refresh_all(board, moving);

        self.dragging = true;
        self.authorization = Authorization::Unknown;
        self.touch_action = TouchAction::None;
        self.interrupt_listener = true;

        let transaction = self.slot.open(moving, source, helper);
        log::debug!("start {transaction}");

        Ok(vec![
            DragEffect::HideSettingsMenu,
            DragEffect::SetTouchAction(TouchAction::None),
            DragEffect::InstallInterruptListener,
        ])
    }

    /// Decide whether the current candidate drop is legal and cache the decision.
    pub fn authorize(
        &mut self,
        board: &Board,
        settings: &dyn SettingsSource,
        query: &PlacementQuery<'_>,
    ) -> Verdict {
        let verdict = evaluate_placement(
            &PolicyContext {
                board,
                settings,
                locked: self.locked,
            },
            query,
        );
        if let Some(allowed) = verdict.decision() {
            self.authorization = allowed.into();
        }
        log::trace!("placement {query:?} -> {verdict:?}");
        verdict
    }

    pub fn is_allowed(
        &mut self,
        board: &Board,
        settings: &dyn SettingsSource,
        query: &PlacementQuery<'_>,
    ) -> bool {
        self.authorize(board, settings, query).is_allowed()
    }

    /// End the drag gesture.
    ///
    /// Without an allowed placement no [`Self::update`] will follow, so the transaction is
    /// closed here and the board is restored from the exclusion made by [`Self::start`].
    pub fn before_stop(&mut self, board: &mut Board, info: DragInfo<'_>) -> Vec<DragEffect> {
        self.dragging = false;

        let item = resolve_item(board, info.item)
            .or_else(|| self.slot.current().and_then(DragTransaction::moving_item));
        if let Some(state) = item.and_then(|id| board.item_state_mut(id)) {
            state.is_dragging = false;
        }
        self.slot.clear_helper();

        if !self.authorization.is_allowed() {
            if let Some(transaction) = self.slot.take() {
                log::debug!("stop {transaction} without an allowed placement");
                let scope = transaction.source_container().map(|source| {
                    std::iter::once(source)
                        .chain(item.and_then(|id| board.parent_of(id)))
                        .collect_vec()
                });
                self.settle(board, scope);
            }
        }

        let mut effects = Vec::new();
        if std::mem::take(&mut self.interrupt_listener) {
            effects.push(DragEffect::RemoveInterruptListener);
        }
        self.touch_action = TouchAction::PanY;
        effects.push(DragEffect::SetTouchAction(TouchAction::PanY));
        effects
    }

    /// Synchronize after the reorder capability has moved the item.
    ///
    /// Returns `None` when there is nothing to synchronize: the last placement was not
    /// authorized, no drag is open, or the item was dropped back where it started.
    pub fn update(&mut self, board: &mut Board, info: DragInfo<'_>) -> Option<DropOutcome> {
        if !self.authorization.is_allowed() {
            return None;
        }
        let moving = self.slot.current()?.moving_item();

        let mut effects = Vec::new();
        if self.dragging {
            effects.extend(self.before_stop(board, info));
        }
        let transaction = self.slot.take()?;

        let Some((item, (to, index))) = resolve_item(board, info.item)
            .or(moving)
            .and_then(|id| Some((id, board.position_of(id)?)))
        else {
            log::debug!("update without a resolvable item ({transaction})");
            self.settle(board, None);
            return None;
        };

        let from = transaction.source_position();
        if from == Some((to, index)) {
            log::debug!("drop back in place ({transaction})");
            self.settle(board, Some(vec![to]));
            return None;
        }
        let from = from.map(|(container, _)| container);

        for parent in from
            .into_iter()
            .chain([to])
            .filter_map(|container| board.owner_item(container))
            .unique()
            .collect_vec()
        {
            refresh_collapsible(board, parent);
        }

        let event = match board.item(item).map(|i| i.content_location()) {
            Some(ContentLocation::Clipboard) => SyncEvent::PluginClipboardUpdated(item),
            Some(ContentLocation::Page) | None => SyncEvent::PluginStructureUpdated(item),
        };
        effects.push(DragEffect::Sync(event));

        let refreshed = self.settle(board, from.map(|from| vec![from, to]));

        log::debug!("update {transaction} -> {to:?}[{index}] {}", event.name());

        Some(DropOutcome {
            item,
            from,
            to,
            event,
            refreshed,
            effects,
        })
    }

    /// The interrupt listener installed by [`Self::start`].
    ///
    /// Only a forced signal cancels; any other key release is ignored, as is everything while
    /// no listener is installed.
    pub fn interrupt_key(&mut self, board: &mut Board, key: Key, forced: bool) -> Vec<DragEffect> {
        if !self.interrupt_listener {
            return Vec::new();
        }
        if !forced {
            log::trace!("ignoring unforced {key:?} during drag");
            return Vec::new();
        }

        self.slot.mark_interrupted();
        self.authorization = Authorization::Denied;
        if let Some(transaction) = self.slot.current() {
            log::debug!("cancel {transaction} ({key:?})");
        }

        let mut effects = vec![DragEffect::StopMouseTracking];
        effects.extend(board.container_ids().map(DragEffect::ReleasePointer));
        effects.extend(self.before_stop(board, DragInfo::default()));
        effects
    }

    /// Recompute emptiness without exclusion over `scope` and the placeholders enclosing it,
    /// or over every list when the scope is unknown. Empty nested lists are hidden again.
    fn settle(&self, board: &mut Board, scope: Option<Vec<ContainerId>>) -> Vec<ContainerId> {
        let refreshed = match scope {
            Some(scope) => {
                let scope = scope
                    .into_iter()
                    .flat_map(|c| {
                        let placeholder = board.enclosing_placeholder(c).map(ContainerId::Placeholder);
                        std::iter::once(c).chain(placeholder)
                    })
                    .collect_vec();
                emptiness::refresh(board, scope, None)
            }
            None => emptiness::refresh_all(board, None),
        };
        if self.hide_empty_nested_lists {
            emptiness::hide_empty_nested(board);
        }
        refreshed
    }
}

fn resolve_item(board: &Board, element: Option<&str>) -> Option<ItemId> {
    identifier::resolve(element)
        .ok()?
        .as_item_id()
        .filter(|&id| board.item(id).is_some())
}

/// An item with nested children is collapsible and expanded; one that lost its last child
/// stops being collapsible but keeps its expanded flag.
fn refresh_collapsible(board: &mut Board, item: ItemId) {
    let has_children = board.has_nested_children(item);
    if let Some(state) = board.item_state_mut(item) {
        if has_children {
            state.collapsible = true;
            state.expanded = true;
        } else {
            state.collapsible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::identifier::draggable_class;
    use super::super::settings::{PluginSettings, SettingsRegistry};
    use super::*;

    /// Placeholder 1 holds items 1 and 2, item 3 is nested in item 1, placeholder 2 is
    /// empty and item 9 sits in the clipboard.
    fn fixture() -> (Board, SettingsRegistry) {
        let mut board = Board::new();
        let p1 = board.add_placeholder(1).unwrap();
        let p2 = board.add_placeholder(2).unwrap();
        let clipboard = board.add_clipboard();
        board.add_item(ItemId(1), p1).unwrap();
        board.add_item(ItemId(2), p1).unwrap();
        board.add_item(ItemId(3), ContainerId::Plugin(ItemId(1))).unwrap();
        board.add_item(ItemId(9), clipboard).unwrap();
        emptiness::refresh_all(&mut board, None);
        emptiness::hide_empty_nested(&mut board);

        let mut settings = SettingsRegistry::new();
        settings.insert_placeholder(1, PluginSettings::placeholder());
        settings.insert_placeholder(2, PluginSettings::placeholder());
        settings.insert_plugin(ItemId(1), PluginSettings::new("MultiColumnPlugin"));
        for id in [2, 3, 9] {
            settings.insert_plugin(ItemId(id), PluginSettings::new("TextPlugin"));
        }
        (board, settings)
    }

    fn empty(board: &Board, container: ContainerId) -> bool {
        board.container(container).unwrap().state().empty
    }

    fn start(coordinator: &mut DragCoordinator, board: &mut Board, item: u64) -> Vec<DragEffect> {
        let class = draggable_class(ItemId(item));
        let helper = coordinator.helper(board, Some(&class));
        coordinator
            .start(board, DragInfo::new(&class), helper)
            .unwrap()
    }

    fn allow(
        coordinator: &mut DragCoordinator,
        board: &Board,
        settings: &SettingsRegistry,
        item: u64,
        target: ContainerId,
    ) -> bool {
        let class = draggable_class(ItemId(item));
        coordinator.is_allowed(
            board,
            settings,
            &PlacementQuery {
                target: Some(target),
                ancestor: None,
                moving: Some(&class),
            },
        )
    }

    fn drop_at(
        coordinator: &mut DragCoordinator,
        board: &mut Board,
        item: u64,
        target: ContainerId,
        index: usize,
    ) -> Option<DropOutcome> {
        let class = draggable_class(ItemId(item));
        coordinator.before_stop(board, DragInfo::new(&class));
        board.move_item(ItemId(item), target, index).unwrap();
        coordinator.update(board, DragInfo::new(&class))
    }

    #[test]
    fn start_prepares_the_board() {
        let (mut board, _) = fixture();
        let mut coordinator = DragCoordinator::new();

        let effects = start(&mut coordinator, &mut board, 1);
        assert_eq!(
            effects,
            vec![
                DragEffect::HideSettingsMenu,
                DragEffect::SetTouchAction(TouchAction::None),
                DragEffect::InstallInterruptListener,
            ]
        );
        assert!(coordinator.is_dragging());
        assert!(coordinator.has_interrupt_listener());
        assert_eq!(coordinator.touch_action(), TouchAction::None);
        assert!(board.item(ItemId(1)).unwrap().state().is_dragging);

        let transaction = coordinator.transaction().unwrap();
        assert_eq!(transaction.moving_item(), Some(ItemId(1)));
        assert_eq!(
            transaction.source_position(),
            Some((ContainerId::Placeholder(1), 0))
        );
        assert!(transaction.helper().is_dragging);
        assert!(transaction.helper().stack, "item 1 drags its nested child along");
    }

    #[test]
    fn moving_item_is_excluded_from_emptiness() {
        let (mut board, _) = fixture();
        board.move_item(ItemId(2), ContainerId::Placeholder(2), 0).unwrap();
        emptiness::refresh_all(&mut board, None);
        assert!(!empty(&board, ContainerId::Placeholder(2)));

        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 2);
        assert!(empty(&board, ContainerId::Placeholder(2)));
        assert!(!empty(&board, ContainerId::Placeholder(1)));
    }

    #[test]
    fn second_start_is_refused() {
        let (mut board, _) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 1);

        let class = draggable_class(ItemId(2));
        let result = coordinator.start(&mut board, DragInfo::new(&class), Helper::default());
        assert_eq!(result, Err(DragError::AlreadyDragging { active: 1 }));
        assert_eq!(
            coordinator.transaction().and_then(DragTransaction::moving_item),
            Some(ItemId(1))
        );
    }

    #[test]
    fn before_stop_restores_idle_state() {
        let (mut board, _) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 1);

        let class = draggable_class(ItemId(1));
        let effects = coordinator.before_stop(&mut board, DragInfo::new(&class));
        assert_eq!(
            effects,
            vec![
                DragEffect::RemoveInterruptListener,
                DragEffect::SetTouchAction(TouchAction::PanY),
            ]
        );
        assert!(!coordinator.is_dragging());
        assert!(!coordinator.has_interrupt_listener());
        assert!(!board.item(ItemId(1)).unwrap().state().is_dragging);
        assert!(
            coordinator.transaction().is_none(),
            "nothing was authorized, so no update will follow"
        );
    }

    #[test]
    fn before_stop_keeps_an_authorized_transaction_for_update() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 2);
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Placeholder(2)
        ));

        let class = draggable_class(ItemId(2));
        coordinator.before_stop(&mut board, DragInfo::new(&class));
        let transaction = coordinator.transaction().unwrap();
        assert_eq!(transaction.moving_item(), Some(ItemId(2)));
        assert!(!transaction.helper().is_dragging);
    }

    #[test]
    fn denied_drop_restores_the_source_list() {
        let (mut board, settings) = fixture();
        board.move_item(ItemId(3), ContainerId::Placeholder(2), 0).unwrap();
        emptiness::refresh_all(&mut board, None);
        emptiness::hide_empty_nested(&mut board);
        let before: Vec<_> = board
            .container_ids()
            .map(|id| board.container(id).unwrap().state())
            .collect();

        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 3);
        assert!(empty(&board, ContainerId::Placeholder(2)));
        assert!(
            !board
                .container(ContainerId::Plugin(ItemId(1)))
                .unwrap()
                .state()
                .hidden
        );
        assert!(!allow(
            &mut coordinator,
            &board,
            &settings,
            3,
            ContainerId::Clipboard
        ));

        let class = draggable_class(ItemId(3));
        coordinator.before_stop(&mut board, DragInfo::new(&class));
        assert!(coordinator.update(&mut board, DragInfo::new(&class)).is_none());

        assert!(coordinator.transaction().is_none());
        assert_eq!(board.children(ContainerId::Placeholder(2)), [ItemId(3)]);
        let state = board.container(ContainerId::Placeholder(2)).unwrap().state();
        assert!(!state.empty);
        assert!(!state.copy_all_disabled);
        let after: Vec<_> = board
            .container_ids()
            .map(|id| board.container(id).unwrap().state())
            .collect();
        assert_eq!(before, after, "empty nested lists are hidden again");
    }

    #[test]
    fn drop_into_another_placeholder() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 2);
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Placeholder(2)
        ));
        assert_eq!(coordinator.authorization(), Authorization::Allowed);

        let outcome =
            drop_at(&mut coordinator, &mut board, 2, ContainerId::Placeholder(2), 0).unwrap();
        assert_eq!(outcome.item, ItemId(2));
        assert_eq!(outcome.from, Some(ContainerId::Placeholder(1)));
        assert_eq!(outcome.to, ContainerId::Placeholder(2));
        assert_eq!(outcome.event, SyncEvent::PluginStructureUpdated(ItemId(2)));
        assert_eq!(outcome.event.name(), "plugin-structure-updated");
        assert!(outcome.refreshed.contains(&ContainerId::Placeholder(2)));
        assert_eq!(
            outcome.effects,
            vec![DragEffect::Sync(SyncEvent::PluginStructureUpdated(ItemId(2)))]
        );

        assert!(!empty(&board, ContainerId::Placeholder(2)));
        assert!(!empty(&board, ContainerId::Placeholder(1)));
        assert!(coordinator.transaction().is_none());
    }

    #[test]
    fn update_runs_missing_before_stop() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 2);
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Placeholder(2)
        ));
        board.move_item(ItemId(2), ContainerId::Placeholder(2), 0).unwrap();

        let class = draggable_class(ItemId(2));
        let outcome = coordinator
            .update(&mut board, DragInfo::new(&class))
            .unwrap();
        assert_eq!(
            outcome.effects,
            vec![
                DragEffect::RemoveInterruptListener,
                DragEffect::SetTouchAction(TouchAction::PanY),
                DragEffect::Sync(SyncEvent::PluginStructureUpdated(ItemId(2))),
            ]
        );
        assert!(!coordinator.is_dragging());
    }

    #[test]
    fn update_needs_an_allowed_placement() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 2);
        assert_eq!(coordinator.authorization(), Authorization::Unknown);
        assert!(drop_at(&mut coordinator, &mut board, 2, ContainerId::Placeholder(2), 0).is_none());

        let (mut board, _) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 2);
        assert!(!allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Clipboard
        ));
        assert!(drop_at(&mut coordinator, &mut board, 2, ContainerId::Placeholder(2), 0).is_none());
    }

    #[test]
    fn idle_update_does_nothing() {
        let (mut board, _) = fixture();
        let mut coordinator = DragCoordinator::new();
        let class = draggable_class(ItemId(1));
        assert!(coordinator.update(&mut board, DragInfo::new(&class)).is_none());
    }

    #[test]
    fn drop_in_place_is_a_no_op() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 2);
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Placeholder(1)
        ));

        assert!(drop_at(&mut coordinator, &mut board, 2, ContainerId::Placeholder(1), 1).is_none());
        assert!(coordinator.transaction().is_none());
        assert!(!empty(&board, ContainerId::Placeholder(1)));
    }

    #[test]
    fn reorder_within_a_container_synchronizes() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 2);
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Placeholder(1)
        ));

        let outcome =
            drop_at(&mut coordinator, &mut board, 2, ContainerId::Placeholder(1), 0).unwrap();
        assert_eq!(outcome.from, Some(ContainerId::Placeholder(1)));
        assert_eq!(outcome.to, ContainerId::Placeholder(1));
    }

    #[test]
    fn busy_and_rejected_keep_the_cached_decision() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 2);
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Placeholder(2)
        ));

        coordinator.set_locked(true);
        assert!(coordinator.is_locked());
        assert!(!allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Placeholder(2)
        ));
        assert_eq!(coordinator.authorization(), Authorization::Allowed);

        coordinator.set_locked(false);
        let verdict = coordinator.authorize(&board, &settings, &PlacementQuery::default());
        assert!(matches!(verdict, Verdict::Rejected(_)));
        assert_eq!(coordinator.authorization(), Authorization::Allowed);
    }

    #[test]
    fn collapsible_follows_nested_children() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();

        start(&mut coordinator, &mut board, 3);
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            3,
            ContainerId::Placeholder(2)
        ));
        drop_at(&mut coordinator, &mut board, 3, ContainerId::Placeholder(2), 0).unwrap();
        let state = board.item(ItemId(1)).unwrap().state();
        assert!(!state.collapsible);
        assert!(!state.expanded);
        assert!(
            board
                .container(ContainerId::Plugin(ItemId(1)))
                .unwrap()
                .state()
                .hidden
        );

        start(&mut coordinator, &mut board, 2);
        assert!(
            !board
                .container(ContainerId::Plugin(ItemId(1)))
                .unwrap()
                .state()
                .hidden,
            "drag start reveals empty nested lists"
        );
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Plugin(ItemId(1))
        ));
        drop_at(&mut coordinator, &mut board, 2, ContainerId::Plugin(ItemId(1)), 0).unwrap();
        let state = board.item(ItemId(1)).unwrap().state();
        assert!(state.collapsible);
        assert!(state.expanded);

        start(&mut coordinator, &mut board, 2);
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Placeholder(1)
        ));
        drop_at(&mut coordinator, &mut board, 2, ContainerId::Placeholder(1), 1).unwrap();
        let state = board.item(ItemId(1)).unwrap().state();
        assert!(!state.collapsible);
        assert!(state.expanded, "an emptied item stays expanded");
    }

    #[test]
    fn clipboard_content_gets_its_own_event() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 9);
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            9,
            ContainerId::Placeholder(2)
        ));

        let outcome =
            drop_at(&mut coordinator, &mut board, 9, ContainerId::Placeholder(2), 0).unwrap();
        assert_eq!(outcome.event, SyncEvent::PluginClipboardUpdated(ItemId(9)));
        assert_eq!(outcome.event.name(), "plugin-clipboard-updated");
        let syncs = outcome
            .effects
            .iter()
            .filter(|effect| matches!(effect, DragEffect::Sync(_)))
            .count();
        assert_eq!(syncs, 1);
    }

    #[test]
    fn unresolved_start_refreshes_everything_on_drop() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();
        coordinator
            .start(&mut board, DragInfo::default(), Helper::default())
            .unwrap();
        assert_eq!(
            coordinator.transaction().and_then(DragTransaction::moving_item),
            None
        );

        board.move_item(ItemId(1), ContainerId::Placeholder(2), 0).unwrap();
        board.move_item(ItemId(2), ContainerId::Placeholder(2), 1).unwrap();
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            1,
            ContainerId::Placeholder(2)
        ));

        let class = draggable_class(ItemId(1));
        coordinator.before_stop(&mut board, DragInfo::new(&class));
        let outcome = coordinator
            .update(&mut board, DragInfo::new(&class))
            .unwrap();
        assert_eq!(outcome.from, None);
        assert!(empty(&board, ContainerId::Placeholder(1)));
        assert!(!empty(&board, ContainerId::Placeholder(2)));
    }

    #[test]
    fn only_a_forced_interrupt_cancels() {
        let (mut board, _) = fixture();
        let mut coordinator = DragCoordinator::new();
        assert!(coordinator.interrupt_key(&mut board, Key::Escape, true).is_empty());

        start(&mut coordinator, &mut board, 2);
        assert!(coordinator.interrupt_key(&mut board, Key::Escape, false).is_empty());
        assert!(coordinator.is_dragging());

        let effects = coordinator.interrupt_key(&mut board, Key::Escape, true);
        assert_eq!(effects.first(), Some(&DragEffect::StopMouseTracking));
        assert!(
            board
                .container(ContainerId::Plugin(ItemId(2)))
                .unwrap()
                .state()
                .hidden,
            "a cancel hides empty nested lists again"
        );
        let releases = effects
            .iter()
            .filter(|effect| matches!(effect, DragEffect::ReleasePointer(_)))
            .count();
        assert_eq!(releases, board.container_ids().count());
        assert!(effects.contains(&DragEffect::RemoveInterruptListener));

        assert!(!coordinator.is_dragging());
        assert_eq!(coordinator.authorization(), Authorization::Denied);
        assert!(coordinator.transaction().is_none());
        assert_eq!(coordinator.touch_action(), TouchAction::PanY);
        assert!(!board.item(ItemId(2)).unwrap().state().is_dragging);

        assert!(coordinator.interrupt_key(&mut board, Key::Escape, true).is_empty());
    }

    #[test]
    fn interrupted_drag_does_not_synchronize() {
        let (mut board, settings) = fixture();
        let mut coordinator = DragCoordinator::new();
        start(&mut coordinator, &mut board, 2);
        assert!(allow(
            &mut coordinator,
            &board,
            &settings,
            2,
            ContainerId::Placeholder(2)
        ));
        coordinator.interrupt_key(&mut board, Key::Escape, true);

        let class = draggable_class(ItemId(2));
        assert!(coordinator.update(&mut board, DragInfo::new(&class)).is_none());
    }

    #[test]
    fn round_trip_restores_container_state() {
        let (mut board, settings) = fixture();
        let before: Vec<_> = board
            .container_ids()
            .map(|id| board.container(id).unwrap().state())
            .collect();

        let mut coordinator = DragCoordinator::new();
        for (target, index) in [(ContainerId::Placeholder(2), 0), (ContainerId::Placeholder(1), 1)] {
            start(&mut coordinator, &mut board, 2);
            assert!(allow(&mut coordinator, &board, &settings, 2, target));
            drop_at(&mut coordinator, &mut board, 2, target, index).unwrap();
        }

        let after: Vec<_> = board
            .container_ids()
            .map(|id| board.container(id).unwrap().state())
            .collect();
        assert_eq!(before, after);
        assert_eq!(board.position_of(ItemId(2)), Some((ContainerId::Placeholder(1), 1)));
    }

    #[test]
    fn error_message() {
        let err = DragError::AlreadyDragging { active: 7 };
        assert_eq!(err.to_string(), "a drag is already in progress (id=7)");
    }
}
