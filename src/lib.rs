//! Drag coordination and placement authorization for the structure board of a CMS page.
//!
//! The host renders a [`Board`] of placeholders and plugins, drives a generic drag-reorder
//! capability over it and forwards that capability's callbacks to a [`StructureBoard`].

#![forbid(unsafe_code)]

pub mod board_builder;
pub mod structure_board;

pub use board_builder::BoardBuilder;
pub use structure_board::{
    Authorization, Board, BoardError, BoardEvent, BoardMode, ContainerId, ContainerKind,
    ContentLocation, DragCoordinator, DragEffect, DragError, DragInfo, DropOutcome, Helper,
    Identifier, ItemId, MalformedIdentifierError, PageMode, PlacementQuery, PluginSettings,
    SettingsRegistry, SettingsSource, StructureBoard, StructureBoardOptions, SyncEvent,
    TouchAction, Verdict, PLACEHOLDER_PARENT_TYPE, UNRESTRICTED_PARENT_SENTINEL,
};

#[cfg(feature = "serde")]
pub use structure_board::{BoardSnapshot, SnapshotError, BOARD_SNAPSHOT_VERSION};
