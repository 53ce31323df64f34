use crate::structure_board::{
    Board, BoardMode, ContainerId, ContentLocation, ItemId, PageMode, PluginSettings,
    SettingsRegistry, StructureBoard, StructureBoardOptions,
};

/// A small convenience builder for constructing a [`Board`] and its settings side-table from
/// code, the way the server would have rendered the page.
///
/// The builder panics on misuse (unknown parents, duplicate ids): it is meant for fixtures and
/// scripted boards. For fallible construction use [`Board`] and [`SettingsRegistry`] directly.
#[derive(Debug, Default)]
pub struct BoardBuilder {
    board: Board,
    settings: SettingsRegistry,
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the underlying board for advanced customization.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Add a placeholder, listed after the ones added before.
    ///
    /// # Panics
    /// If a placeholder with this id already exists.
    #[must_use]
    pub fn placeholder(&mut self, id: u64, settings: PluginSettings) -> ContainerId {
        match self.board.add_placeholder(id) {
            Ok(container) => {
                self.settings.insert_placeholder(id, settings);
                container
            }
            Err(err) => panic!("placeholder: {err}"),
        }
    }

    /// Add a static placeholder (shared across pages, shown last).
    ///
    /// # Panics
    /// If a placeholder with this id already exists.
    #[must_use]
    pub fn static_placeholder(&mut self, id: u64, settings: PluginSettings) -> ContainerId {
        match self.board.add_static_placeholder(id) {
            Ok(container) => {
                self.settings.insert_placeholder(id, settings);
                container
            }
            Err(err) => panic!("static_placeholder: {err}"),
        }
    }

    #[must_use]
    pub fn clipboard(&mut self) -> ContainerId {
        self.board.add_clipboard()
    }

    /// Append a plugin to `parent` and return its nested area, so children can be added to it.
    ///
    /// # Panics
    /// If `parent` does not exist or the id is taken.
    #[must_use]
    pub fn plugin(&mut self, id: u64, parent: ContainerId, settings: PluginSettings) -> ContainerId {
        let item = ItemId(id);
        if let Err(err) = self.board.add_item(item, parent) {
            panic!("plugin: {err}");
        }
        self.settings.insert_plugin(item, settings);
        ContainerId::Plugin(item)
    }

    /// Append several plugins of the same settings to `parent`.
    pub fn plugins(
        &mut self,
        ids: impl IntoIterator<Item = u64>,
        parent: ContainerId,
        settings: &PluginSettings,
    ) {
        for id in ids {
            let _nested: ContainerId = self.plugin(id, parent, settings.clone());
        }
    }

    /// Render the content counterpart of a plugin inside the clipboard.
    ///
    /// # Panics
    /// If the plugin does not exist.
    pub fn content_in_clipboard(&mut self, id: u64) {
        if let Err(err) = self
            .board
            .set_content_location(ItemId(id), ContentLocation::Clipboard)
        {
            panic!("content_in_clipboard: {err}");
        }
    }

    /// Forbid nesting into a container.
    ///
    /// # Panics
    /// If the container does not exist.
    pub fn disable_nesting(&mut self, container: ContainerId) {
        if let Err(err) = self.board.set_nesting_disabled(container, true) {
            panic!("disable_nesting: {err}");
        }
    }

    pub fn finish(self) -> (Board, SettingsRegistry) {
        (self.board, self.settings)
    }

    /// Finish building and wrap the result in a [`StructureBoard`].
    pub fn finish_structure_board(
        self,
        page_mode: PageMode,
        persisted_mode: BoardMode,
        options: StructureBoardOptions,
    ) -> StructureBoard {
        StructureBoard::new_with_options(self.board, self.settings, page_mode, persisted_mode, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_plugins() {
        let mut builder = BoardBuilder::new();
        let p1 = builder.placeholder(1, PluginSettings::placeholder());
        let row = builder.plugin(1, p1, PluginSettings::new("RowPlugin"));
        builder.plugins([2, 3], row, &PluginSettings::new("ColumnPlugin"));
        let (board, settings) = builder.finish();

        assert_eq!(board.children(p1), &[ItemId(1)]);
        assert_eq!(board.children(row), &[ItemId(2), ItemId(3)]);
        assert_eq!(settings.len(), 4);
    }

    #[test]
    #[should_panic(expected = "plugin:")]
    fn unknown_parent_panics() {
        let mut builder = BoardBuilder::new();
        let _nested = builder.plugin(1, ContainerId::Placeholder(9), PluginSettings::default());
    }
}
