//! Game domain model
//!
//! The slice of the game data model the filter rules read: identity,
//! platform, scores, dates, provider records and folder-name metadata.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique id of a game within the library database
pub type GameId = i32;

/// Unique id of a library (a scanned root folder)
pub type LibraryId = i32;

/// Id of an external metadata provider ("igdb", "giantbomb", ...)
pub type ProviderId = String;

/// Platform a game runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    Mac,
    Android,
}

/// A review score reported by a provider, on a 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub score: f64,
    pub num_reviews: u32,
}

/// File size in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSize(pub u64);

impl FileSize {
    pub const KB: u64 = 1024;
    pub const MB: u64 = 1024 * Self::KB;
    pub const GB: u64 = 1024 * Self::MB;
    pub const TB: u64 = 1024 * Self::GB;

    #[inline]
    pub fn kb(amount: u64) -> Self {
        FileSize(amount * Self::KB)
    }

    #[inline]
    pub fn mb(amount: u64) -> Self {
        FileSize(amount * Self::MB)
    }

    #[inline]
    pub fn gb(amount: u64) -> Self {
        FileSize(amount * Self::GB)
    }

    pub fn human_readable(&self) -> String {
        let bytes = self.0;
        let (value, unit) = match bytes {
            b if b >= Self::TB => (b as f64 / Self::TB as f64, "TB"),
            b if b >= Self::GB => (b as f64 / Self::GB as f64, "GB"),
            b if b >= Self::MB => (b as f64 / Self::MB as f64, "MB"),
            b if b >= Self::KB => (b as f64 / Self::KB as f64, "KB"),
            b => return format!("{} B", b),
        };
        format!("{:.1} {}", value, unit)
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.human_readable())
    }
}

/// A calendar period measured in years, months and days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    #[serde(default)]
    pub years: u32,
    #[serde(default)]
    pub months: u32,
    #[serde(default)]
    pub days: u32,
}

impl Period {
    pub fn years(years: u32) -> Self {
        Period {
            years,
            ..Default::default()
        }
    }

    pub fn months(months: u32) -> Self {
        Period {
            months,
            ..Default::default()
        }
    }

    pub fn days(days: u32) -> Self {
        Period {
            days,
            ..Default::default()
        }
    }

    /// Calendar-aware `now - period`
    pub fn subtract_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Months::new(self.years * 12 + self.months) - Days::new(u64::from(self.days))
    }
}

/// Identifies the record a provider holds for a game
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderHeader {
    pub provider_id: ProviderId,
    /// The provider's native id for the game, opaque to us
    pub game_id: String,
    /// When the provider data was last fetched. Ignored when comparing
    /// headers for duplication detection.
    pub timestamp: DateTime<Utc>,
}

/// Data fetched from a single provider for a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderData {
    pub header: ProviderHeader,
    /// The game's display name according to this provider
    pub name: String,
}

/// Decorations parsed out of a game's folder name, e.g.
/// `"[1] Metroid Prime [hacked] [v1.2]"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderName {
    /// The full folder name as it appears on disk
    pub raw_name: String,
    pub order: Option<String>,
    pub meta_tag: Option<String>,
    pub version: Option<String>,
}

/// A game in the library, carrying the fields filter rules evaluate against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub platform: Platform,
    pub library_id: LibraryId,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub folder_name: FolderName,
    pub provider_data: Vec<ProviderData>,
    /// Providers the user explicitly excluded for this game
    pub excluded_providers: Vec<ProviderId>,
    pub critic_score: Option<Score>,
    pub user_score: Option<Score>,
    pub release_date: Option<NaiveDate>,
    pub create_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl Game {
    pub fn critic_score(&self) -> Option<f64> {
        self.critic_score.map(|s| s.score)
    }

    pub fn user_score(&self) -> Option<f64> {
        self.user_score.map(|s| s.score)
    }

    /// Average of the scores that are present, `None` when none are
    pub fn avg_score(&self) -> Option<f64> {
        let scores = self.present_scores();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }

    pub fn min_score(&self) -> Option<f64> {
        self.present_scores().into_iter().reduce(f64::min)
    }

    pub fn max_score(&self) -> Option<f64> {
        self.present_scores().into_iter().reduce(f64::max)
    }

    fn present_scores(&self) -> Vec<f64> {
        [self.critic_score(), self.user_score()]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn provider_headers(&self) -> impl Iterator<Item = &ProviderHeader> {
        self.provider_data.iter().map(|data| &data.header)
    }

    pub fn is_provider_excluded(&self, provider_id: &str) -> bool {
        self.excluded_providers.iter().any(|id| id == provider_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_size_ordering_and_units() {
        assert!(FileSize::gb(2) > FileSize::mb(2047));
        assert_eq!(FileSize::kb(1), FileSize(1024));
        assert_eq!(FileSize::gb(1).human_readable(), "1.0 GB");
        assert_eq!(FileSize(512).human_readable(), "512 B");
    }

    #[test]
    fn test_period_subtraction() {
        let now = Utc.with_ymd_and_hms(2020, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(
            Period::years(3).subtract_from(now),
            Utc.with_ymd_and_hms(2017, 3, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(
            Period::months(2).subtract_from(now),
            Utc.with_ymd_and_hms(2020, 1, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(
            Period::days(20).subtract_from(now),
            Utc.with_ymd_and_hms(2020, 2, 24, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_derived_scores() {
        let mut game = Game {
            id: 1,
            name: "Game".to_string(),
            platform: Platform::Windows,
            library_id: 1,
            genres: vec![],
            tags: vec![],
            folder_name: FolderName::default(),
            provider_data: vec![],
            excluded_providers: vec![],
            critic_score: Some(Score {
                score: 80.0,
                num_reviews: 10,
            }),
            user_score: Some(Score {
                score: 60.0,
                num_reviews: 100,
            }),
            release_date: None,
            create_date: Utc::now(),
            update_date: Utc::now(),
        };

        assert_eq!(game.avg_score(), Some(70.0));
        assert_eq!(game.min_score(), Some(60.0));
        assert_eq!(game.max_score(), Some(80.0));

        game.user_score = None;
        assert_eq!(game.avg_score(), Some(80.0));
        assert_eq!(game.min_score(), Some(80.0));

        game.critic_score = None;
        assert_eq!(game.avg_score(), None);
        assert_eq!(game.max_score(), None);
    }
}
