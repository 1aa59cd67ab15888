//! Shared helpers for filter tests

use crate::filter::context::{AdditionalData, CachedValue, EvaluationContext, PassCache};
use crate::game::{
    FileSize, FolderName, Game, GameId, LibraryId, Platform, ProviderData, ProviderHeader,
    ProviderId, Score,
};
use ahash::AHashMap;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// In-memory evaluation context for tests
pub(crate) struct TestContext {
    pub games: Vec<Game>,
    pub now: DateTime<Utc>,
    /// (provider, platform) pairs the fake provider registry rejects
    pub unsupported: Vec<(ProviderId, Platform)>,
    pub sizes: AHashMap<GameId, FileSize>,
    pub cache: PassCache,
    additional: Mutex<AHashMap<GameId, Vec<AdditionalData>>>,
}

impl TestContext {
    pub fn new(games: Vec<Game>) -> Self {
        TestContext {
            games,
            now: fixed_now(),
            unsupported: Vec::new(),
            sizes: AHashMap::new(),
            cache: PassCache::new(),
            additional: Mutex::new(AHashMap::new()),
        }
    }

    /// Diagnostic records attached to a game so far, in attachment order
    pub fn additional_for(&self, id: GameId) -> Vec<AdditionalData> {
        self.additional.lock().get(&id).cloned().unwrap_or_default()
    }
}

impl EvaluationContext for TestContext {
    fn games(&self) -> &[Game] {
        &self.games
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn provider_supports(&self, provider_id: &str, platform: Platform) -> bool {
        !self
            .unsupported
            .iter()
            .any(|(id, p)| id == provider_id && *p == platform)
    }

    fn size(&self, game: &Game) -> FileSize {
        self.sizes.get(&game.id).copied().unwrap_or(FileSize(0))
    }

    fn to_file_name(&self, name: &str) -> String {
        name.to_string()
    }

    fn add_additional_info(&self, game: &Game, data: AdditionalData) {
        self.additional.lock().entry(game.id).or_default().push(data);
    }

    fn cache_raw(&self, key: &str, compute: &mut dyn FnMut() -> CachedValue) -> CachedValue {
        self.cache.get_or_compute(key, compute)
    }
}

/// Start building a test game with sensible defaults
pub(crate) fn game(id: GameId) -> GameBuilder {
    let name = format!("Game {id}");
    GameBuilder {
        game: Game {
            id,
            folder_name: FolderName {
                raw_name: name.clone(),
                ..Default::default()
            },
            name,
            platform: Platform::Windows,
            library_id: 1,
            genres: Vec::new(),
            tags: Vec::new(),
            provider_data: Vec::new(),
            excluded_providers: Vec::new(),
            critic_score: None,
            user_score: None,
            release_date: None,
            create_date: fixed_now(),
            update_date: fixed_now(),
        },
    }
}

pub(crate) struct GameBuilder {
    game: Game,
}

impl GameBuilder {
    pub fn platform(mut self, platform: Platform) -> Self {
        self.game.platform = platform;
        self
    }

    pub fn library(mut self, id: LibraryId) -> Self {
        self.game.library_id = id;
        self
    }

    pub fn genres(mut self, genres: &[&str]) -> Self {
        self.game.genres = genres.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.game.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn critic_score(mut self, score: Option<Score>) -> Self {
        self.game.critic_score = score;
        self
    }

    pub fn user_score(mut self, score: Option<Score>) -> Self {
        self.game.user_score = score;
        self
    }

    pub fn release_date(mut self, date: Option<NaiveDate>) -> Self {
        self.game.release_date = date;
        self
    }

    pub fn create_date(mut self, date: DateTime<Utc>) -> Self {
        self.game.create_date = date;
        self
    }

    pub fn update_date(mut self, date: DateTime<Utc>) -> Self {
        self.game.update_date = date;
        self
    }

    /// Attach provider data whose display name matches the game's own name
    pub fn provider(self, provider_id: &str, provider_game_id: &str) -> Self {
        let name = self.game.name.clone();
        self.provider_named(provider_id, provider_game_id, &name)
    }

    /// Attach provider data with an explicit display name. Each record gets a
    /// distinct fetch timestamp.
    pub fn provider_named(
        mut self,
        provider_id: &str,
        provider_game_id: &str,
        name: &str,
    ) -> Self {
        let offset = self.game.provider_data.len() as i64 + i64::from(self.game.id);
        self.game.provider_data.push(ProviderData {
            header: ProviderHeader {
                provider_id: provider_id.to_string(),
                game_id: provider_game_id.to_string(),
                timestamp: fixed_now() - Duration::minutes(offset),
            },
            name: name.to_string(),
        });
        self
    }

    pub fn exclude_provider(mut self, provider_id: &str) -> Self {
        self.game.excluded_providers.push(provider_id.to_string());
        self
    }

    pub fn folder_raw(mut self, raw_name: &str) -> Self {
        self.game.folder_name.raw_name = raw_name.to_string();
        self
    }

    pub fn order(mut self, order: &str) -> Self {
        self.game.folder_name.order = Some(order.to_string());
        self
    }

    pub fn meta_tag(mut self, meta_tag: &str) -> Self {
        self.game.folder_name.meta_tag = Some(meta_tag.to_string());
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.game.folder_name.version = Some(version.to_string());
        self
    }

    pub fn build(self) -> Game {
        self.game
    }
}
