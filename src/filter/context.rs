//! Evaluation context contract
//!
//! An evaluation pass runs every game through a filter against one
//! [`EvaluationContext`] supplied by the host application. The context is a
//! read-only view over the candidate games plus the side channels the
//! diagnostic rules need: result attachment and pass-scoped memoization.

use crate::filter::diagnostics::{GameDuplication, GameNameFolderDiff};
use crate::game::{FileSize, Game, Platform};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::any::Any;
use std::sync::Arc;

/// Type-erased value held by the pass-scoped cache
pub type CachedValue = Arc<dyn Any + Send + Sync>;

/// Diagnostic record attached to a game by a side-effecting rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdditionalData {
    Duplication(GameDuplication),
    NameDiff(GameNameFolderDiff),
}

/// Host-implemented view an evaluation pass runs against
///
/// The context lives for one pass (e.g. re-filtering the whole list after a
/// UI change); anything memoized through [`EvaluationContext::cache`] is
/// scoped to that pass.
pub trait EvaluationContext {
    /// Snapshot of all candidate games in scope for this pass
    fn games(&self) -> &[Game];

    /// The pass's notion of "now", fixed for the whole pass
    fn now(&self) -> DateTime<Utc>;

    /// Whether a provider serves games of the given platform at all
    fn provider_supports(&self, provider_id: &str, platform: Platform) -> bool;

    /// Total size of the game's files on disk
    fn size(&self, game: &Game) -> FileSize;

    /// Normalize a display name into a folder-name-comparable form
    fn to_file_name(&self, name: &str) -> String;

    /// Side channel for diagnostic rules to attach findings to a game
    fn add_additional_info(&self, game: &Game, data: AdditionalData);

    /// Pass-scoped memoization. `compute` is invoked at most once per key,
    /// even when evaluation runs concurrently across games.
    fn cache_raw(&self, key: &str, compute: &mut dyn FnMut() -> CachedValue) -> CachedValue;

    /// Typed wrapper over [`EvaluationContext::cache_raw`]
    fn cache<T, F>(&self, key: &str, compute: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
        Self: Sized,
    {
        let mut compute = Some(compute);
        let value = self.cache_raw(key, &mut || {
            let compute = compute.take().expect("cache compute invoked twice");
            Arc::new(compute()) as CachedValue
        });
        value
            .downcast::<T>()
            .expect("cached value type mismatch for key")
    }
}

/// Compute-once cache for one evaluation pass
///
/// Hosts embed this to implement [`EvaluationContext::cache_raw`]. Each key
/// owns a `OnceCell` slot, so concurrent first access blocks on a single
/// computation instead of racing duplicates.
#[derive(Default)]
pub struct PassCache {
    slots: RwLock<AHashMap<String, Arc<OnceCell<CachedValue>>>>,
}

impl PassCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &self,
        key: &str,
        compute: &mut dyn FnMut() -> CachedValue,
    ) -> CachedValue {
        // Fast path: slot already exists
        let slot = {
            let slots = self.slots.read();
            slots.get(key).cloned()
        };

        let slot = match slot {
            Some(slot) => slot,
            None => {
                let mut slots = self.slots.write();
                slots
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(OnceCell::new()))
                    .clone()
            }
        };

        // Initialization happens outside the map lock
        slot.get_or_init(|| compute()).clone()
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}
