use egui::Key;

/// Options for [`super::StructureBoard`].
#[derive(Clone, Debug)]
pub struct StructureBoardOptions {
    /// Releasing this key during a drag cancels it.
    pub cancel_key: Key,

    /// Pressing this key toggles between the structure and the content view.
    pub toggle_key: Key,

    /// After a drop, collapse item nested areas that ended up empty.
    ///
    /// Every list is revealed again when the next drag starts.
    pub hide_empty_nested_lists: bool,

    /// If true, record drag events in a small ring buffer (see `StructureBoard::debug_log_text`).
    pub debug_event_log: bool,

    /// Maximum number of lines kept by the debug event log.
    pub debug_event_log_capacity: usize,

    /// If true, check board integrity after every drop and log issues in the debug event log.
    pub debug_integrity: bool,
}

impl Default for StructureBoardOptions {
    fn default() -> Self {
        Self {
            cancel_key: Key::Escape,
            toggle_key: Key::Space,
            hide_empty_nested_lists: true,
            debug_event_log: false,
            debug_event_log_capacity: 200,
            debug_integrity: false,
        }
    }
}
