//! Rule catalog
//!
//! Knows, for every filter kind, how to build a fresh default instance, how
//! to swap one node's kind for a related one while keeping its parameter, and
//! which rule kinds are worth offering given the host's current data (no
//! library rule without libraries, nothing at all for a collection of one).

use crate::filter::ast::{Filter, FilterFamily, FilterKind, FilterNode};
use crate::game::{FileSize, LibraryId, Period, Platform, ProviderId};
use chrono::NaiveDate;

const DEFAULT_SCORE: f64 = 60.0;
const DEFAULT_RELEASE_PERIOD: Period = Period {
    years: 3,
    months: 0,
    days: 0,
};
const DEFAULT_ACTIVITY_PERIOD: Period = Period {
    years: 0,
    months: 2,
    days: 0,
};

/// Every rule kind, in display order. `Platform` is deliberately absent: the
/// hosting views already scope games to a platform.
const OFFERED_RULES: &[FilterKind] = &[
    FilterKind::Library,
    FilterKind::Genre,
    FilterKind::Tag,
    FilterKind::Provider,
    FilterKind::CriticScore,
    FilterKind::NullCriticScore,
    FilterKind::UserScore,
    FilterKind::NullUserScore,
    FilterKind::AvgScore,
    FilterKind::NullAvgScore,
    FilterKind::MinScore,
    FilterKind::MaxScore,
    FilterKind::TargetReleaseDate,
    FilterKind::PeriodReleaseDate,
    FilterKind::NullReleaseDate,
    FilterKind::TargetCreateDate,
    FilterKind::PeriodCreateDate,
    FilterKind::TargetUpdateDate,
    FilterKind::PeriodUpdateDate,
    FilterKind::FileSize,
    FilterKind::Duplications,
    FilterKind::NameDiff,
];

/// Catalog of constructible filters, parameterized by the host's current data
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    pub game_count: usize,
    pub libraries: Vec<LibraryId>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub providers: Vec<ProviderId>,
}

impl RuleCatalog {
    pub fn new(
        game_count: usize,
        libraries: Vec<LibraryId>,
        genres: Vec<String>,
        tags: Vec<String>,
        providers: Vec<ProviderId>,
    ) -> Self {
        RuleCatalog {
            game_count,
            libraries,
            genres,
            tags,
            providers,
        }
    }

    /// Rule kinds currently worth offering to the user
    pub fn available_rules(&self) -> Vec<FilterKind> {
        if self.game_count <= 1 {
            return Vec::new();
        }
        OFFERED_RULES
            .iter()
            .copied()
            .filter(|kind| match kind {
                FilterKind::Library => !self.libraries.is_empty(),
                FilterKind::Genre => !self.genres.is_empty(),
                FilterKind::Tag => !self.tags.is_empty(),
                FilterKind::Provider => !self.providers.is_empty(),
                _ => true,
            })
            .collect()
    }

    /// A fresh default instance of the given kind
    pub fn default_filter(&self, kind: FilterKind) -> Filter {
        match kind {
            FilterKind::And => Filter::and(vec![Filter::truth()]),
            FilterKind::Or => Filter::or(vec![Filter::truth()]),
            FilterKind::Not => Filter::not(Filter::truth()),
            FilterKind::True => Filter::truth(),
            FilterKind::CriticScore => FilterNode::CriticScore {
                score: DEFAULT_SCORE,
            }
            .into(),
            FilterKind::NullCriticScore => FilterNode::NullCriticScore.into(),
            FilterKind::UserScore => FilterNode::UserScore {
                score: DEFAULT_SCORE,
            }
            .into(),
            FilterKind::NullUserScore => FilterNode::NullUserScore.into(),
            FilterKind::AvgScore => FilterNode::AvgScore {
                score: DEFAULT_SCORE,
            }
            .into(),
            FilterKind::NullAvgScore => FilterNode::NullAvgScore.into(),
            FilterKind::MinScore => FilterNode::MinScore {
                score: DEFAULT_SCORE,
            }
            .into(),
            FilterKind::MaxScore => FilterNode::MaxScore {
                score: DEFAULT_SCORE,
            }
            .into(),
            FilterKind::TargetReleaseDate => FilterNode::TargetReleaseDate {
                date: default_date(),
            }
            .into(),
            FilterKind::PeriodReleaseDate => FilterNode::PeriodReleaseDate {
                period: DEFAULT_RELEASE_PERIOD,
            }
            .into(),
            FilterKind::NullReleaseDate => FilterNode::NullReleaseDate.into(),
            FilterKind::TargetUpdateDate => FilterNode::TargetUpdateDate {
                date: default_date(),
            }
            .into(),
            FilterKind::PeriodUpdateDate => FilterNode::PeriodUpdateDate {
                period: DEFAULT_ACTIVITY_PERIOD,
            }
            .into(),
            FilterKind::TargetCreateDate => FilterNode::TargetCreateDate {
                date: default_date(),
            }
            .into(),
            FilterKind::PeriodCreateDate => FilterNode::PeriodCreateDate {
                period: DEFAULT_ACTIVITY_PERIOD,
            }
            .into(),
            FilterKind::Platform => FilterNode::Platform {
                platform: Platform::Windows,
            }
            .into(),
            FilterKind::Library => FilterNode::Library {
                id: self.libraries.first().copied().unwrap_or(0),
            }
            .into(),
            FilterKind::Genre => FilterNode::Genre {
                genre: self.genres.first().cloned().unwrap_or_default(),
            }
            .into(),
            FilterKind::Tag => FilterNode::Tag {
                tag: self.tags.first().cloned().unwrap_or_default(),
            }
            .into(),
            FilterKind::Provider => FilterNode::Provider {
                provider_id: self.providers.first().cloned().unwrap_or_default(),
            }
            .into(),
            FilterKind::FileSize => FilterNode::FileSize {
                target: FileSize::gb(1),
            }
            .into(),
            FilterKind::Duplications => FilterNode::Duplications.into(),
            FilterKind::NameDiff => FilterNode::NameDiff.into(),
        }
    }

    /// Build the node a kind-swap should produce: same-family swaps carry the
    /// current parameter (or children) over, everything else starts from the
    /// new kind's default.
    pub fn swap(&self, current: &Filter, to: FilterKind) -> Filter {
        if current.kind() == to {
            return current.clone();
        }
        if current.kind().family() != to.family() {
            return self.default_filter(to);
        }
        match (current.node(), to.family()) {
            (
                FilterNode::And { targets } | FilterNode::Or { targets },
                FilterFamily::Compound,
            ) => match to {
                FilterKind::And => Filter::and(targets.clone()),
                _ => Filter::or(targets.clone()),
            },
            (node, FilterFamily::TargetScore) => {
                let score = match node {
                    FilterNode::CriticScore { score }
                    | FilterNode::UserScore { score }
                    | FilterNode::AvgScore { score }
                    | FilterNode::MinScore { score }
                    | FilterNode::MaxScore { score } => *score,
                    _ => DEFAULT_SCORE,
                };
                match to {
                    FilterKind::CriticScore => FilterNode::CriticScore { score }.into(),
                    FilterKind::UserScore => FilterNode::UserScore { score }.into(),
                    FilterKind::AvgScore => FilterNode::AvgScore { score }.into(),
                    FilterKind::MinScore => FilterNode::MinScore { score }.into(),
                    _ => FilterNode::MaxScore { score }.into(),
                }
            }
            (node, FilterFamily::TargetDate) => {
                let date = match node {
                    FilterNode::TargetReleaseDate { date }
                    | FilterNode::TargetUpdateDate { date }
                    | FilterNode::TargetCreateDate { date } => *date,
                    _ => default_date(),
                };
                match to {
                    FilterKind::TargetReleaseDate => FilterNode::TargetReleaseDate { date }.into(),
                    FilterKind::TargetUpdateDate => FilterNode::TargetUpdateDate { date }.into(),
                    _ => FilterNode::TargetCreateDate { date }.into(),
                }
            }
            (node, FilterFamily::PeriodDate) => {
                let period = match node {
                    FilterNode::PeriodReleaseDate { period }
                    | FilterNode::PeriodUpdateDate { period }
                    | FilterNode::PeriodCreateDate { period } => *period,
                    _ => DEFAULT_ACTIVITY_PERIOD,
                };
                match to {
                    FilterKind::PeriodReleaseDate => FilterNode::PeriodReleaseDate { period }.into(),
                    FilterKind::PeriodUpdateDate => FilterNode::PeriodUpdateDate { period }.into(),
                    _ => FilterNode::PeriodCreateDate { period }.into(),
                }
            }
            _ => self.default_filter(to),
        }
    }
}

fn default_date() -> NaiveDate {
    // Unwrap is fine: the constant is a valid calendar date.
    NaiveDate::from_ymd_opt(2014, 1, 1).unwrap()
}
