//! Game Filter Core - Filter expression engine for game library collections
//!
//! This crate provides the boolean filter trees a game library manager uses
//! to select subsets of its collection: an immutable expression tree with
//! negation-aware evaluation, pure tree-editing operations, a rule catalog
//! driving interactive editing, and the diagnostic rules (duplication and
//! folder-name mismatch detection) that attach findings as a side effect of
//! evaluation.

pub mod error;
pub mod filter;
pub mod game;

pub use crate::error::{FilterError, Result};
pub use crate::filter::{
    AdditionalData, EvaluationContext, Filter, FilterFamily, FilterKind, FilterNode,
    GameDuplication, GameNameFolderDiff, PassCache, RuleCatalog,
};
pub use crate::game::{
    FileSize, FolderName, Game, GameId, LibraryId, Period, Platform, ProviderData, ProviderHeader,
    ProviderId, Score,
};
