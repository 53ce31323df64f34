use super::model::ItemId;

/// Parent restriction value meaning "no restriction" (used by the built-in placeholder plugin).
pub const UNRESTRICTED_PARENT_SENTINEL: &str = "0";

/// Parent type reported for a drop directly into a placeholder, so a parent restriction can
/// list placeholder level next to plugin types.
pub const PLACEHOLDER_PARENT_TYPE: &str = "PlaceholderPlugin";

/// Restriction metadata attached to a plugin or a placeholder by its edit view.
///
/// Mirrors the settings payload rendered into the page: every list is an allow-list and an
/// empty list means "anything goes".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PluginSettings {
    pub plugin_type: Option<String>,

    /// Types that may be placed directly inside this plugin or placeholder.
    pub plugin_restriction: Vec<String>,

    /// Types this plugin may be placed directly inside.
    pub plugin_parent_restriction: Vec<String>,
}

impl PluginSettings {
    pub fn new(plugin_type: impl Into<String>) -> Self {
        Self {
            plugin_type: Some(plugin_type.into()),
            ..Default::default()
        }
    }

    /// Settings for a placeholder, which has no type of its own.
    pub fn placeholder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_restriction<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.plugin_restriction = types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_parent_restriction<S: Into<String>>(
        mut self,
        types: impl IntoIterator<Item = S>,
    ) -> Self {
        self.plugin_parent_restriction = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_unrestricted_parent_sentinel(&self) -> bool {
        self.plugin_parent_restriction
            .iter()
            .any(|t| t == UNRESTRICTED_PARENT_SENTINEL)
    }
}

/// Read-only access to restriction metadata, keyed by identifier.
///
/// The metadata belongs to the edit-view side of the page; the placement policy only ever
/// reads it through this trait.
pub trait SettingsSource {
    fn plugin_settings(&self, id: ItemId) -> Option<&PluginSettings>;

    fn placeholder_settings(&self, placeholder: u64) -> Option<&PluginSettings>;
}

/// The default side-table implementation.
#[derive(Clone, Debug, Default)]
pub struct SettingsRegistry {
    plugins: ahash::HashMap<ItemId, PluginSettings>,
    placeholders: ahash::HashMap<u64, PluginSettings>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous settings, if any.
    pub fn insert_plugin(&mut self, id: ItemId, settings: PluginSettings) -> Option<PluginSettings> {
        self.plugins.insert(id, settings)
    }

    pub fn insert_placeholder(
        &mut self,
        placeholder: u64,
        settings: PluginSettings,
    ) -> Option<PluginSettings> {
        self.placeholders.insert(placeholder, settings)
    }

    pub fn remove_plugin(&mut self, id: ItemId) -> Option<PluginSettings> {
        self.plugins.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.plugins.len() + self.placeholders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsSource for SettingsRegistry {
    fn plugin_settings(&self, id: ItemId) -> Option<&PluginSettings> {
        self.plugins.get(&id)
    }

    fn placeholder_settings(&self, placeholder: u64) -> Option<&PluginSettings> {
        self.placeholders.get(&placeholder)
    }
}
