//! Placement authorization: may the dragged item be dropped into a candidate container?
//!
//! The evaluation is pure. Restrictions are allow-lists; an empty list never restricts.
//! Only one level of nesting is checked: the placeholder bounding the drop, and the item
//! directly enclosing it (if any). Deeper ancestors are not consulted.

use super::identifier;
use super::model::{Board, ContainerId, ItemId};
use super::settings::{PluginSettings, SettingsSource, PLACEHOLDER_PARENT_TYPE};

/// Why a query was turned down before any restriction was looked at.
///
/// These outcomes do not touch the cached authorization state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The moving element does not resolve to an item on the board.
    UnknownItem,
    /// The item has no edit-view settings.
    MissingSettings,
    /// No candidate container was given.
    NoTarget,
    /// Nesting is disabled at the candidate container.
    NestingDisabled,
    /// The candidate container is (inside) the clipboard.
    Clipboard,
}

/// A restriction said no.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyViolation {
    TypeNotAllowed {
        plugin_type: Option<String>,
        bound: Bound,
    },
    ParentTypeNotAllowed {
        parent_type: Option<String>,
    },
}

/// The container whose restriction list rejected the item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Placeholder(u64),
    Item(ItemId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The host has locked the board (an operation is in flight).
    Busy,
    Rejected(RejectReason),
    Denied(PolicyViolation),
    Allowed,
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// The value to cache as the tri-state authorization, if this verdict is a decision.
    pub fn decision(&self) -> Option<bool> {
        match self {
            Self::Allowed => Some(true),
            Self::Denied(_) => Some(false),
            Self::Busy | Self::Rejected(_) => None,
        }
    }
}

/// Everything the policy reads.
#[derive(Clone, Copy)]
pub struct PolicyContext<'a> {
    pub board: &'a Board,
    pub settings: &'a dyn SettingsSource,
    pub locked: bool,
}

/// One candidate drop.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlacementQuery<'a> {
    /// The list the item would be dropped into.
    pub target: Option<ContainerId>,

    /// Set when the drop nests one level inside another item: a container of that item.
    /// Takes precedence over `target` for finding the enclosing item.
    pub ancestor: Option<ContainerId>,

    /// Class attribute of the element being dragged.
    pub moving: Option<&'a str>,
}

pub fn evaluate_placement(ctx: &PolicyContext<'_>, query: &PlacementQuery<'_>) -> Verdict {
    if ctx.locked {
        return Verdict::Busy;
    }

    let Some(item) = resolve_moving_item(ctx.board, query.moving) else {
        return Verdict::Rejected(RejectReason::UnknownItem);
    };

    let Some(settings) = ctx.settings.plugin_settings(item) else {
        return Verdict::Rejected(RejectReason::MissingSettings);
    };

    let Some((target, container)) = query
        .target
        .and_then(|id| Some((id, ctx.board.container(id)?)))
    else {
        return Verdict::Rejected(RejectReason::NoTarget);
    };
    if container.is_disabled() {
        return Verdict::Rejected(RejectReason::NestingDisabled);
    }
    if ctx.board.is_within_clipboard(target) {
        return Verdict::Rejected(RejectReason::Clipboard);
    }

    if settings.has_unrestricted_parent_sentinel() {
        return Verdict::Allowed;
    }

    let placeholder = ctx.board.enclosing_placeholder(target);
    let placeholder_settings = placeholder.and_then(|id| ctx.settings.placeholder_settings(id));
    let enclosing_item = ctx.board.owner_item(query.ancestor.unwrap_or(target));
    let enclosing_settings = enclosing_item.and_then(|id| ctx.settings.plugin_settings(id));

    if let (Some(id), Some(bounds)) = (placeholder, placeholder_settings) {
        if !permits(&bounds.plugin_restriction, settings.plugin_type.as_deref()) {
            return Verdict::Denied(PolicyViolation::TypeNotAllowed {
                plugin_type: settings.plugin_type.clone(),
                bound: Bound::Placeholder(id),
            });
        }
    }
    if let (Some(id), Some(bounds)) = (enclosing_item, enclosing_settings) {
        if !permits(&bounds.plugin_restriction, settings.plugin_type.as_deref()) {
            return Verdict::Denied(PolicyViolation::TypeNotAllowed {
                plugin_type: settings.plugin_type.clone(),
                bound: Bound::Item(id),
            });
        }
    }

    let parent_type = match enclosing_item {
        Some(_) => enclosing_settings.and_then(|s| s.plugin_type.as_deref()),
        None => Some(PLACEHOLDER_PARENT_TYPE),
    };
    if !permits(&settings.plugin_parent_restriction, parent_type) {
        return Verdict::Denied(PolicyViolation::ParentTypeNotAllowed {
            parent_type: parent_type.map(str::to_owned),
        });
    }

    Verdict::Allowed
}

fn resolve_moving_item(board: &Board, moving: Option<&str>) -> Option<ItemId> {
    let id = match identifier::resolve(moving) {
        Ok(id) => id,
        Err(err) => {
            log::debug!("placement query with {err}");
            return None;
        }
    };
    id.as_item_id().filter(|&id| board.item(id).is_some())
}

/// An empty allow-list permits anything; otherwise the type must be listed.
fn permits(allowed: &[String], plugin_type: Option<&str>) -> bool {
    allowed.is_empty() || plugin_type.is_some_and(|t| allowed.iter().any(|a| a == t))
}

/// Shorthand used by hosts that do not care about the reason.
pub fn is_allowed(
    board: &Board,
    settings: &dyn SettingsSource,
    locked: bool,
    query: &PlacementQuery<'_>,
) -> bool {
    evaluate_placement(
        &PolicyContext {
            board,
            settings,
            locked,
        },
        query,
    )
    .is_allowed()
}

impl PluginSettings {
    /// Whether these settings, as a container's, would accept `plugin_type` directly.
    pub fn accepts(&self, plugin_type: &str) -> bool {
        permits(&self.plugin_restriction, Some(plugin_type))
    }
}
