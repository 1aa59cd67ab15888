//! Pure tree-editing operations
//!
//! Every operation takes a tree and returns a new one; nothing is mutated in
//! place. Edit targets are located by node identity, never by structure: a
//! tree may contain several structurally equal subtrees and only the exact
//! instance being edited must change. When an edit turns out to be a
//! structural no-op the original root handle is returned, so hosts keying
//! change notifications off the handle see no spurious updates.

use crate::error::{FilterError, Result};
use crate::filter::ast::{Filter, FilterKind, FilterNode};
use tracing::{debug, trace};

/// Wrap a node in a conjunction with a `True` placeholder for the user to
/// fill in
pub fn wrap_in_and(filter: &Filter) -> Filter {
    Filter::and(vec![filter.clone(), Filter::truth()])
}

/// Wrap a node in a disjunction with a `True` placeholder
pub fn wrap_in_or(filter: &Filter) -> Filter {
    Filter::or(vec![filter.clone(), Filter::truth()])
}

pub fn wrap_in_not(filter: &Filter) -> Filter {
    Filter::not(filter.clone())
}

/// The operand of a `Not` node, or `None` for any other node
pub fn unwrap_not(filter: &Filter) -> Option<Filter> {
    match filter.node() {
        FilterNode::Not { target } => Some(target.clone()),
        _ => None,
    }
}

/// Replace `target` (located by identity) with `replacement` and normalize.
///
/// Only the path from the target up to the root is rebuilt; sibling subtrees
/// keep their identity. Returns the original `root` handle when the final
/// tree is structurally equal to it. `target` not being part of `root` is a
/// caller bug and fails with [`FilterError::TargetNotFound`].
pub fn replace(root: &Filter, target: &Filter, replacement: &Filter) -> Result<Filter> {
    trace!(%root, %target, %replacement, "replacing filter node");
    let (substituted, found) = substitute(root, target, replacement);
    if !found {
        return Err(FilterError::TargetNotFound);
    }
    let result = flatten(&substituted);
    Ok(keep_root_if_equal(root, result))
}

/// Delete `target` (located by identity) and normalize.
///
/// A compound left with a single child collapses into that child; a compound
/// left with none, or a `Not` losing its operand, is itself deleted, and that
/// absence propagates upward. `Ok(None)` means the whole tree was deleted and
/// the caller should substitute its neutral element (`True`).
pub fn delete(root: &Filter, target: &Filter) -> Result<Option<Filter>> {
    trace!(%root, %target, "deleting filter node");
    let (remaining, found) = remove(root, target);
    if !found {
        return Err(FilterError::TargetNotFound);
    }
    if remaining.is_none() {
        debug!("deletion emptied the filter tree");
    }
    Ok(remaining.map(|filter| keep_root_if_equal(root, flatten(&filter))))
}

/// Associativity normalization: splice children of same-kind nested
/// compounds, post-order, so `And(And(a, b), c)` becomes `And(a, b, c)`.
///
/// Idempotent; subtrees that come out structurally unchanged keep their
/// original handle.
pub fn flatten(filter: &Filter) -> Filter {
    let result = match filter.node() {
        FilterNode::And { targets } => Filter::and(splice(targets, filter.kind())),
        FilterNode::Or { targets } => Filter::or(splice(targets, filter.kind())),
        FilterNode::Not { target } => Filter::not(flatten(target)),
        _ => return filter.clone(),
    };
    keep_root_if_equal(filter, result)
}

fn splice(targets: &[Filter], kind: FilterKind) -> Vec<Filter> {
    let mut spliced = Vec::with_capacity(targets.len());
    for target in targets {
        let flattened = flatten(target);
        match flattened.node() {
            FilterNode::And { targets } | FilterNode::Or { targets }
                if flattened.kind() == kind =>
            {
                spliced.extend(targets.iter().cloned());
            }
            _ => spliced.push(flattened),
        }
    }
    spliced
}

fn keep_root_if_equal(original: &Filter, rebuilt: Filter) -> Filter {
    if rebuilt == *original {
        original.clone()
    } else {
        rebuilt
    }
}

fn substitute(current: &Filter, target: &Filter, replacement: &Filter) -> (Filter, bool) {
    if current.ptr_eq(target) {
        return (replacement.clone(), true);
    }
    match current.node() {
        FilterNode::And { targets } | FilterNode::Or { targets } => {
            let mut found = false;
            let new_targets: Vec<Filter> = targets
                .iter()
                .map(|child| {
                    let (new_child, child_found) = substitute(child, target, replacement);
                    found |= child_found;
                    new_child
                })
                .collect();
            if !found {
                return (current.clone(), false);
            }
            let rebuilt = match current.node() {
                FilterNode::And { .. } => Filter::and(new_targets),
                _ => Filter::or(new_targets),
            };
            (rebuilt, true)
        }
        FilterNode::Not { target: child } => {
            let (new_child, found) = substitute(child, target, replacement);
            if found {
                (Filter::not(new_child), true)
            } else {
                (current.clone(), false)
            }
        }
        _ => (current.clone(), false),
    }
}

fn remove(current: &Filter, target: &Filter) -> (Option<Filter>, bool) {
    if current.ptr_eq(target) {
        return (None, true);
    }
    match current.node() {
        FilterNode::And { targets } | FilterNode::Or { targets } => {
            let mut found = false;
            let mut survivors: Vec<Filter> = Vec::with_capacity(targets.len());
            for child in targets {
                match remove(child, target) {
                    (Some(new_child), child_found) => {
                        found |= child_found;
                        survivors.push(new_child);
                    }
                    (None, _) => found = true,
                }
            }
            if !found {
                return (Some(current.clone()), false);
            }
            let remaining = match survivors.len() {
                0 => None,
                // A compound with one child collapses into it
                1 => survivors.pop(),
                _ => Some(match current.node() {
                    FilterNode::And { .. } => Filter::and(survivors),
                    _ => Filter::or(survivors),
                }),
            };
            (remaining, true)
        }
        // A Not cannot exist without its operand
        FilterNode::Not { target: child } => match remove(child, target) {
            (Some(new_child), true) => (Some(Filter::not(new_child)), true),
            (None, _) => (None, true),
            (Some(_), false) => (Some(current.clone()), false),
        },
        _ => (Some(current.clone()), false),
    }
}
