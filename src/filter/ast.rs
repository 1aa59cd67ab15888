//! Filter expression tree
//!
//! A [`Filter`] is a cheap-to-clone shared handle to one node of an immutable
//! boolean expression tree. Two notions of equality apply: [`Filter::ptr_eq`]
//! compares node identity (the exact instance a user is editing), while
//! `PartialEq` compares structure, so two independently built trees with the
//! same shape and parameters are equal.

use crate::error::Result;
use crate::game::{FileSize, LibraryId, Period, Platform, ProviderId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a filter tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Arc<FilterNode>);

/// A single node of a filter expression tree
///
/// The wire form is an internally tagged union; the tag vocabulary is fixed
/// for backward-compatible persistence and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterNode {
    And { targets: Vec<Filter> },
    Or { targets: Vec<Filter> },
    Not { target: Filter },

    True,

    CriticScore { score: f64 },
    NullCriticScore,
    UserScore { score: f64 },
    NullUserScore,
    AvgScore { score: f64 },
    NullAvgScore,
    MinScore { score: f64 },
    MaxScore { score: f64 },

    TargetReleaseDate { date: NaiveDate },
    PeriodReleaseDate { period: Period },
    NullReleaseDate,
    TargetUpdateDate { date: NaiveDate },
    PeriodUpdateDate { period: Period },
    TargetCreateDate { date: NaiveDate },
    PeriodCreateDate { period: Period },

    Platform { platform: Platform },
    Library { id: LibraryId },
    Genre { genre: String },
    Tag { tag: String },
    #[serde(rename_all = "camelCase")]
    Provider { provider_id: ProviderId },
    #[serde(rename = "size")]
    FileSize { target: FileSize },

    Duplications,
    NameDiff,
}

/// Kind discriminant of a filter node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    And,
    Or,
    Not,
    True,
    CriticScore,
    NullCriticScore,
    UserScore,
    NullUserScore,
    AvgScore,
    NullAvgScore,
    MinScore,
    MaxScore,
    TargetReleaseDate,
    PeriodReleaseDate,
    NullReleaseDate,
    TargetUpdateDate,
    PeriodUpdateDate,
    TargetCreateDate,
    PeriodCreateDate,
    Platform,
    Library,
    Genre,
    Tag,
    Provider,
    FileSize,
    Duplications,
    NameDiff,
}

/// Families of related filter kinds
///
/// Kind swaps within the `Compound`, `TargetScore`, `TargetDate` and
/// `PeriodDate` families carry the old node's parameter over (see the rule
/// catalog); swaps across families fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterFamily {
    Compound,
    Modifier,
    Constant,
    TargetScore,
    NullScore,
    TargetDate,
    PeriodDate,
    NullDate,
    Attribute,
    Diagnostic,
}

impl FilterKind {
    pub fn family(self) -> FilterFamily {
        match self {
            FilterKind::And | FilterKind::Or => FilterFamily::Compound,
            FilterKind::Not => FilterFamily::Modifier,
            FilterKind::True => FilterFamily::Constant,
            FilterKind::CriticScore
            | FilterKind::UserScore
            | FilterKind::AvgScore
            | FilterKind::MinScore
            | FilterKind::MaxScore => FilterFamily::TargetScore,
            FilterKind::NullCriticScore | FilterKind::NullUserScore | FilterKind::NullAvgScore => {
                FilterFamily::NullScore
            }
            FilterKind::TargetReleaseDate
            | FilterKind::TargetUpdateDate
            | FilterKind::TargetCreateDate => FilterFamily::TargetDate,
            FilterKind::PeriodReleaseDate
            | FilterKind::PeriodUpdateDate
            | FilterKind::PeriodCreateDate => FilterFamily::PeriodDate,
            FilterKind::NullReleaseDate => FilterFamily::NullDate,
            FilterKind::Platform
            | FilterKind::Library
            | FilterKind::Genre
            | FilterKind::Tag
            | FilterKind::Provider
            | FilterKind::FileSize => FilterFamily::Attribute,
            FilterKind::Duplications | FilterKind::NameDiff => FilterFamily::Diagnostic,
        }
    }
}

impl FilterNode {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterNode::And { .. } => FilterKind::And,
            FilterNode::Or { .. } => FilterKind::Or,
            FilterNode::Not { .. } => FilterKind::Not,
            FilterNode::True => FilterKind::True,
            FilterNode::CriticScore { .. } => FilterKind::CriticScore,
            FilterNode::NullCriticScore => FilterKind::NullCriticScore,
            FilterNode::UserScore { .. } => FilterKind::UserScore,
            FilterNode::NullUserScore => FilterKind::NullUserScore,
            FilterNode::AvgScore { .. } => FilterKind::AvgScore,
            FilterNode::NullAvgScore => FilterKind::NullAvgScore,
            FilterNode::MinScore { .. } => FilterKind::MinScore,
            FilterNode::MaxScore { .. } => FilterKind::MaxScore,
            FilterNode::TargetReleaseDate { .. } => FilterKind::TargetReleaseDate,
            FilterNode::PeriodReleaseDate { .. } => FilterKind::PeriodReleaseDate,
            FilterNode::NullReleaseDate => FilterKind::NullReleaseDate,
            FilterNode::TargetUpdateDate { .. } => FilterKind::TargetUpdateDate,
            FilterNode::PeriodUpdateDate { .. } => FilterKind::PeriodUpdateDate,
            FilterNode::TargetCreateDate { .. } => FilterKind::TargetCreateDate,
            FilterNode::PeriodCreateDate { .. } => FilterKind::PeriodCreateDate,
            FilterNode::Platform { .. } => FilterKind::Platform,
            FilterNode::Library { .. } => FilterKind::Library,
            FilterNode::Genre { .. } => FilterKind::Genre,
            FilterNode::Tag { .. } => FilterKind::Tag,
            FilterNode::Provider { .. } => FilterKind::Provider,
            FilterNode::FileSize { .. } => FilterKind::FileSize,
            FilterNode::Duplications => FilterKind::Duplications,
            FilterNode::NameDiff => FilterKind::NameDiff,
        }
    }
}

impl Filter {
    /// The always-matching constant rule
    pub fn truth() -> Self {
        FilterNode::True.into()
    }

    /// An n-ary conjunction. Compounds hold at least one child.
    pub fn and(targets: Vec<Filter>) -> Self {
        debug_assert!(!targets.is_empty(), "compound filter with no children");
        FilterNode::And { targets }.into()
    }

    /// An n-ary disjunction. Compounds hold at least one child.
    pub fn or(targets: Vec<Filter>) -> Self {
        debug_assert!(!targets.is_empty(), "compound filter with no children");
        FilterNode::Or { targets }.into()
    }

    pub fn not(target: Filter) -> Self {
        FilterNode::Not { target }.into()
    }

    pub fn node(&self) -> &FilterNode {
        &self.0
    }

    pub fn kind(&self) -> FilterKind {
        self.0.kind()
    }

    /// Node identity: do both handles point at the exact same instance?
    pub fn ptr_eq(&self, other: &Filter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether `target` occurs anywhere in this tree, by node identity
    pub fn contains(&self, target: &Filter) -> bool {
        if self.ptr_eq(target) {
            return true;
        }
        match self.node() {
            FilterNode::And { targets } | FilterNode::Or { targets } => {
                targets.iter().any(|child| child.contains(target))
            }
            FilterNode::Not { target: child } => child.contains(target),
            _ => false,
        }
    }

    /// Whether any node in this tree has the given kind
    pub fn contains_kind(&self, kind: FilterKind) -> bool {
        if self.kind() == kind {
            return true;
        }
        match self.node() {
            FilterNode::And { targets } | FilterNode::Or { targets } => {
                targets.iter().any(|child| child.contains_kind(kind))
            }
            FilterNode::Not { target } => target.contains_kind(kind),
            _ => false,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Filter> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<FilterNode> for Filter {
    fn from(node: FilterNode) -> Self {
        Filter(Arc::new(node))
    }
}

/// Structural equality: same kind, same parameters, children pairwise equal.
/// Identical handles short-circuit.
impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            FilterNode::And { targets } => write_compound(f, targets, "and"),
            FilterNode::Or { targets } => write_compound(f, targets, "or"),
            FilterNode::Not { target } => write!(f, "!({target})"),
            FilterNode::True => f.write_str("True"),
            FilterNode::CriticScore { score } => write!(f, "Critic Score >= {score}"),
            FilterNode::NullCriticScore => f.write_str("Critic Score == NULL"),
            FilterNode::UserScore { score } => write!(f, "User Score >= {score}"),
            FilterNode::NullUserScore => f.write_str("User Score == NULL"),
            FilterNode::AvgScore { score } => write!(f, "Avg Score >= {score}"),
            FilterNode::NullAvgScore => f.write_str("Avg Score == NULL"),
            FilterNode::MinScore { score } => write!(f, "Min Score >= {score}"),
            FilterNode::MaxScore { score } => write!(f, "Max Score >= {score}"),
            FilterNode::TargetReleaseDate { date } => write!(f, "Release Date >= {date}"),
            FilterNode::PeriodReleaseDate { period } => {
                write!(f, "Release Date >= (Now - {})", display_period(period))
            }
            FilterNode::NullReleaseDate => f.write_str("Release Date == NULL"),
            FilterNode::TargetUpdateDate { date } => write!(f, "Update Date >= {date}"),
            FilterNode::PeriodUpdateDate { period } => {
                write!(f, "Update Date >= (Now - {})", display_period(period))
            }
            FilterNode::TargetCreateDate { date } => write!(f, "Create Date >= {date}"),
            FilterNode::PeriodCreateDate { period } => {
                write!(f, "Create Date >= (Now - {})", display_period(period))
            }
            FilterNode::Platform { platform } => write!(f, "Platform == '{platform:?}'"),
            FilterNode::Library { id } => write!(f, "Library == Library({id})"),
            FilterNode::Genre { genre } => write!(f, "Genre == '{genre}'"),
            FilterNode::Tag { tag } => write!(f, "Tag == '{tag}'"),
            FilterNode::Provider { provider_id } => write!(f, "Provider == '{provider_id}'"),
            FilterNode::FileSize { target } => write!(f, "File Size >= {target}"),
            FilterNode::Duplications => f.write_str("Duplications"),
            FilterNode::NameDiff => f.write_str("Name-Folder Diff"),
        }
    }
}

fn write_compound(f: &mut fmt::Formatter<'_>, targets: &[Filter], op: &str) -> fmt::Result {
    for (i, target) in targets.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }
        write!(f, "({target})")?;
    }
    Ok(())
}

fn display_period(period: &Period) -> String {
    let mut parts = Vec::new();
    if period.years > 0 {
        parts.push(format!("{}y", period.years));
    }
    if period.months > 0 {
        parts.push(format!("{}mo", period.months));
    }
    if period.days > 0 {
        parts.push(format!("{}d", period.days));
    }
    if parts.is_empty() {
        "0d".to_string()
    } else {
        parts.join(" ")
    }
}
