//! Filter expression trees: model, evaluation, editing and cataloging
//!
//! This module owns the filter AST and everything that operates on it:
//! evaluation against an [`EvaluationContext`], the pure tree-editing
//! operations driving interactive editing, the rule catalog, and the two
//! diagnostic rules.

mod ast;
pub mod catalog;
pub mod context;
pub mod diagnostics;
pub mod editor;
mod evaluator;

#[cfg(test)]
pub(crate) mod testutil;

pub use ast::{Filter, FilterFamily, FilterKind, FilterNode};
pub use catalog::RuleCatalog;
pub use context::{AdditionalData, CachedValue, EvaluationContext, PassCache};
pub use diagnostics::{
    build_duplication_index, DiffChunk, DuplicationIndex, GameDuplication, GameNameFolderDiff,
    DUPLICATIONS_CACHE_KEY,
};
pub use editor::{delete, flatten, replace, unwrap_not, wrap_in_and, wrap_in_not, wrap_in_or};
