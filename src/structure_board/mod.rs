use std::collections::VecDeque;

use egui::Key;

mod coordinator;
mod debug;
pub mod emptiness;
pub mod identifier;
mod integrity;
mod model;
mod options;
pub mod policy;
mod session;
mod settings;

#[cfg(feature = "serde")]
mod persistence;


pub use coordinator::{
    Authorization, DragCoordinator, DragEffect, DragError, DragInfo, DropOutcome, SyncEvent,
    TouchAction,
};
pub use identifier::{Identifier, MalformedIdentifierError, Role};
pub use model::{
    Board, BoardError, Container, ContainerId, ContainerKind, ContainerState, ContentLocation,
    Item, ItemId, ItemState,
};
pub use options::StructureBoardOptions;
pub use policy::{Bound, PlacementQuery, PolicyContext, PolicyViolation, RejectReason, Verdict};
pub use session::{DragTransaction, Helper};
pub use settings::{
    PluginSettings, SettingsRegistry, SettingsSource, PLACEHOLDER_PARENT_TYPE,
    UNRESTRICTED_PARENT_SENTINEL,
};

#[cfg(feature = "serde")]
pub use persistence::{
    BoardSnapshot, ItemSnapshot, PlaceholderSnapshot, SnapshotError, BOARD_SNAPSHOT_VERSION,
};

/// Which view of the page the editor looks at. Persisted by the host between page loads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BoardMode {
    Structure,
    #[default]
    Content,
}

/// Whether the page is being edited at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PageMode {
    #[default]
    Edit,
    /// Published view: the structure board can not be shown.
    Live,
}

/// Notifications for the rest of the admin UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    /// The mode to persist changed.
    ModeChanged(BoardMode),
    StructureBoardHidden,
    /// The toolbar has to recompute its size.
    Resize,
}

/// The structure board of one page load.
///
/// Owns the rendered [`Board`], the settings side-table and a single [`DragCoordinator`].
/// The host's reorder capability calls the drag callbacks ([`Self::drag_start`],
/// [`Self::is_allowed`], [`Self::before_stop`], [`Self::update`]) and moves items through
/// [`Self::board_mut`] in between.
#[derive(Debug)]
pub struct StructureBoard {
    pub options: StructureBoardOptions,

    board: Board,
    settings: SettingsRegistry,
    coordinator: DragCoordinator,

    page_mode: PageMode,
    mode: BoardMode,
    visible: bool,
    mode_switcher_visible: bool,
    clipboard_visible: bool,

    events: Vec<BoardEvent>,

    debug_log: VecDeque<String>,
    debug_serial: u64,
    debug_last_integrity_hash: u64,
}

impl StructureBoard {
    pub fn new(
        board: Board,
        settings: SettingsRegistry,
        page_mode: PageMode,
        persisted_mode: BoardMode,
    ) -> Self {
        Self::new_with_options(
            board,
            settings,
            page_mode,
            persisted_mode,
            StructureBoardOptions::default(),
        )
    }

    pub fn new_with_options(
        board: Board,
        settings: SettingsRegistry,
        page_mode: PageMode,
        persisted_mode: BoardMode,
        options: StructureBoardOptions,
    ) -> Self {
        let mut coordinator = DragCoordinator::new();
        coordinator.set_hide_empty_nested_lists(options.hide_empty_nested_lists);

        let mut this = Self {
            options,
            board,
            settings,
            coordinator,
            page_mode,
            mode: persisted_mode,
            visible: false,
            mode_switcher_visible: false,
            clipboard_visible: false,
            events: Vec::new(),
            debug_log: VecDeque::new(),
            debug_serial: 0,
            debug_last_integrity_hash: 0,
        };

        emptiness::refresh_all(&mut this.board, None);
        if this.options.hide_empty_nested_lists {
            emptiness::hide_empty_nested(&mut this.board);
        }

        if this.board.placeholders().is_empty() {
            log::debug!("structure board without placeholders");
            return this;
        }
        this.mode_switcher_visible = true;

        match persisted_mode {
            BoardMode::Structure => this.show(),
            BoardMode::Content => this.hide(),
        };
        this
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access for the reorder capability.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn settings(&self) -> &SettingsRegistry {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsRegistry {
        &mut self.settings
    }

    pub fn coordinator(&self) -> &DragCoordinator {
        &self.coordinator
    }

    pub fn page_mode(&self) -> PageMode {
        self.page_mode
    }

    pub fn mode(&self) -> BoardMode {
        self.mode
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_mode_switcher_visible(&self) -> bool {
        self.mode_switcher_visible
    }

    pub fn is_clipboard_visible(&self) -> bool {
        self.clipboard_visible
    }

    pub fn set_clipboard_visible(&mut self, visible: bool) {
        self.clipboard_visible = visible && self.board.has_clipboard();
    }

    /// Lock or unlock drops while the host waits for the server.
    pub fn set_locked(&mut self, locked: bool) {
        self.coordinator.set_locked(locked);
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switch to the structure view. Returns `false` on a live page.
    pub fn show(&mut self) -> bool {
        if self.page_mode == PageMode::Live {
            return false;
        }
        if self.board.move_static_placeholders_last() {
            log::debug!("static placeholders moved last: {:?}", self.board.placeholders());
        }
        self.visible = true;
        self.set_mode(BoardMode::Structure);
        self.debug_log_event("show");
        true
    }

    /// Switch back to the content view. Returns `false` on a live page.
    pub fn hide(&mut self) -> bool {
        if self.page_mode == PageMode::Live {
            return false;
        }
        self.clipboard_visible = false;
        self.visible = false;
        self.set_mode(BoardMode::Content);
        self.events.push(BoardEvent::StructureBoardHidden);
        self.events.push(BoardEvent::Resize);
        self.debug_log_event("hide");
        true
    }

    pub fn toggle(&mut self) -> bool {
        if self.visible { self.hide() } else { self.show() }
    }

    /// A click on one of the mode switcher links.
    pub fn activate_mode_link(&mut self, mode: BoardMode) -> bool {
        if mode == self.mode {
            return false;
        }
        match mode {
            BoardMode::Structure => self.show(),
            BoardMode::Content => self.hide(),
        }
    }

    /// Keyboard shortcut handling. Returns `true` if the key toggled the board.
    pub fn key_down(&mut self, key: Key) -> bool {
        if key != self.options.toggle_key
            || !self.mode_switcher_visible
            || self.coordinator.is_dragging()
        {
            return false;
        }
        self.toggle()
    }

    /// Releasing the cancel key during a drag interrupts it.
    pub fn key_up(&mut self, key: Key) -> Vec<DragEffect> {
        let forced = key == self.options.cancel_key;
        let effects = self.coordinator.interrupt_key(&mut self.board, key, forced);
        if !effects.is_empty() {
            self.debug_log_event(format!("interrupt key={key:?} effects={}", effects.len()));
        }
        effects
    }

    pub fn helper(&self, item: Option<&str>) -> Helper {
        self.coordinator.helper(&self.board, item)
    }

    pub fn drag_start(
        &mut self,
        info: DragInfo<'_>,
        helper: Helper,
    ) -> Result<Vec<DragEffect>, DragError> {
        let effects = self.coordinator.start(&mut self.board, info, helper)?;
        if let Some(transaction) = self.coordinator.transaction() {
            let line = format!("start {transaction}");
            self.debug_log_event(line);
        }
        Ok(effects)
    }

    pub fn authorize(&mut self, query: &PlacementQuery<'_>) -> Verdict {
        self.coordinator.authorize(&self.board, &self.settings, query)
    }

    pub fn is_allowed(&mut self, query: &PlacementQuery<'_>) -> bool {
        self.authorize(query).is_allowed()
    }

    pub fn before_stop(&mut self, info: DragInfo<'_>) -> Vec<DragEffect> {
        self.coordinator.before_stop(&mut self.board, info)
    }

    pub fn update(&mut self, info: DragInfo<'_>) -> Option<DropOutcome> {
        let outcome = self.coordinator.update(&mut self.board, info);
        match &outcome {
            Some(outcome) => self.debug_log_event(format!(
                "drop item={} from={:?} to={:?} {} refreshed={:?}",
                outcome.item,
                outcome.from,
                outcome.to,
                outcome.event.name(),
                outcome.refreshed
            )),
            None => self.debug_log_event("drop without changes"),
        }
        if self.options.debug_integrity {
            self.debug_check_integrity();
        }
        outcome
    }

    /// Consistency problems of the board tree, empty when healthy.
    pub fn integrity_issues(&self) -> Vec<String> {
        integrity::board_integrity_issues(&self.board)
    }

    fn set_mode(&mut self, mode: BoardMode) {
        self.mode = mode;
        self.events.push(BoardEvent::ModeChanged(mode));
    }
}
