use super::model::{ContainerId, ItemId};

/// The role a structural element plays, as tagged by its first class token.
///
/// Checked in declaration order: an attribute carrying several role tokens resolves with
/// the first one listed here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Content-view counterpart of an item (`cms-plugin`).
    Plugin,
    /// Structure-view item (`cms-draggable`).
    Draggable,
    /// Content-view placeholder (`cms-placeholder`).
    Placeholder,
    /// Title bar of a structure-view placeholder (`cms-dragbar`).
    Dragbar,
    /// Structure-view placeholder area (`cms-dragarea`).
    Dragarea,
}

impl Role {
    pub const ALL: [Self; 5] = [
        Self::Plugin,
        Self::Draggable,
        Self::Placeholder,
        Self::Dragbar,
        Self::Dragarea,
    ];

    pub fn class_token(self) -> &'static str {
        match self {
            Self::Plugin => "cms-plugin",
            Self::Draggable => "cms-draggable",
            Self::Placeholder => "cms-placeholder",
            Self::Dragbar => "cms-dragbar",
            Self::Dragarea => "cms-dragarea",
        }
    }

    /// Render a well-formed class attribute (`"<role> <role>-<id>"`).
    pub fn class_attribute(self, id: impl std::fmt::Display) -> String {
        let token = self.class_token();
        format!("{token} {token}-{id}")
    }
}

/// Outcome of resolving one element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// No element, or an element without any class.
    Absent,
    /// The element carries none of the recognized roles.
    Unsupported,
    /// The identifier, returned verbatim. Not necessarily numeric.
    Id(String),
}

impl Identifier {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Absent | Self::Unsupported => None,
        }
    }

    /// Interpret the identifier as an item id, if it is numeric and positive.
    pub fn as_item_id(&self) -> Option<ItemId> {
        self.as_str()?
            .parse::<u64>()
            .ok()
            .filter(|&id| id > 0)
            .map(ItemId)
    }
}

/// A recognized role token was present, but the attribute had nothing after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedIdentifierError {
    pub role: Role,
    pub class_attribute: String,
}

impl std::fmt::Display for MalformedIdentifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "malformed identifier: role {:?} without suffix in class attribute {:?}",
            self.role, self.class_attribute
        )
    }
}

impl std::error::Error for MalformedIdentifierError {}

/// Resolve the identifier of an element from its class attribute.
///
/// The identifier is taken from the *second* class token with the `<role>-` prefix removed.
/// When that token does not carry the prefix it is returned as-is, so
/// `"cms-plugin fail cms-plugin-10"` resolves to `"fail"`.
pub fn resolve(element: Option<&str>) -> Result<Identifier, MalformedIdentifierError> {
    let Some(class_attribute) = element else {
        return Ok(Identifier::Absent);
    };

    let tokens: Vec<&str> = class_attribute.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Identifier::Absent);
    }

    let Some(role) = Role::ALL
        .into_iter()
        .find(|role| tokens.contains(&role.class_token()))
    else {
        return Ok(Identifier::Unsupported);
    };

    let Some(second) = tokens.get(1) else {
        return Err(MalformedIdentifierError {
            role,
            class_attribute: class_attribute.to_owned(),
        });
    };

    let id = second.replacen(&format!("{}-", role.class_token()), "", 1);

    Ok(Identifier::Id(id))
}

/// Resolve every element in order, failing on the first malformed attribute.
pub fn resolve_all<'a>(
    elements: impl IntoIterator<Item = Option<&'a str>>,
) -> Result<Vec<Identifier>, MalformedIdentifierError> {
    elements.into_iter().map(resolve).collect()
}

/// Best-effort variant of [`resolve_all`]: a malformed attribute becomes
/// [`Identifier::Unsupported`] and the rest of the batch is still resolved.
pub fn resolve_all_lossy<'a>(elements: impl IntoIterator<Item = Option<&'a str>>) -> Vec<Identifier> {
    elements
        .into_iter()
        .map(|element| {
            resolve(element).unwrap_or_else(|err| {
                log::warn!("{err}");
                Identifier::Unsupported
            })
        })
        .collect()
}

/// Class attribute of the structure-view element of an item.
pub fn draggable_class(item: ItemId) -> String {
    Role::Draggable.class_attribute(item.0)
}

/// Class attribute of the content-view counterpart of an item.
pub fn plugin_class(item: ItemId) -> String {
    Role::Plugin.class_attribute(item.0)
}

/// Class attribute of the structure-view area of a container, if it has one.
pub fn dragarea_class(container: ContainerId) -> Option<String> {
    match container {
        ContainerId::Placeholder(id) => Some(Role::Dragarea.class_attribute(id)),
        ContainerId::Plugin(_) | ContainerId::Clipboard => None,
    }
}
