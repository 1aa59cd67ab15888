//! Benchmark for filter evaluation performance
//!
//! Target: one full evaluation pass over 10k games should stay well under
//! the UI re-filter debounce window.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use game_filter_core::filter::build_duplication_index;
use game_filter_core::{
    AdditionalData, EvaluationContext, FileSize, Filter, FilterNode, FolderName, Game, PassCache,
    Period, Platform, ProviderData, ProviderHeader,
};
use game_filter_core::filter::context::CachedValue;

struct BenchContext {
    games: Vec<Game>,
    now: DateTime<Utc>,
    cache: PassCache,
}

impl EvaluationContext for BenchContext {
    fn games(&self) -> &[Game] {
        &self.games
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn provider_supports(&self, _provider_id: &str, _platform: Platform) -> bool {
        true
    }

    fn size(&self, game: &Game) -> FileSize {
        FileSize::mb(100 + game.id as u64 % 4000)
    }

    fn to_file_name(&self, name: &str) -> String {
        name.to_string()
    }

    fn add_additional_info(&self, _game: &Game, _data: AdditionalData) {}

    fn cache_raw(&self, key: &str, compute: &mut dyn FnMut() -> CachedValue) -> CachedValue {
        self.cache.get_or_compute(key, compute)
    }
}

/// Create a realistic synthetic library
fn create_test_games(count: i32) -> Vec<Game> {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let platforms = [Platform::Windows, Platform::Linux, Platform::Mac];
    let genres = ["RPG", "Action", "Strategy", "Adventure", "Simulation"];

    (1..=count)
        .map(|i| {
            let name = format!("Game {}", i);
            Game {
                id: i,
                folder_name: FolderName {
                    raw_name: name.clone(),
                    ..Default::default()
                },
                platform: platforms[i as usize % platforms.len()],
                library_id: i % 4,
                genres: vec![genres[i as usize % genres.len()].to_string()],
                tags: if i % 10 == 0 {
                    vec!["favorite".to_string()]
                } else {
                    vec![]
                },
                provider_data: vec![ProviderData {
                    header: ProviderHeader {
                        provider_id: "igdb".to_string(),
                        // Every 50th game shares a record with its neighbor
                        game_id: format!("igdb-{}", if i % 50 == 0 { i - 1 } else { i }),
                        timestamp: now - Duration::days(i as i64 % 30),
                    },
                    name: name.clone(),
                }],
                excluded_providers: vec![],
                critic_score: (i % 5 != 0).then(|| game_filter_core::Score {
                    score: (i % 100) as f64,
                    num_reviews: 10,
                }),
                user_score: (i % 7 != 0).then(|| game_filter_core::Score {
                    score: ((i * 3) % 100) as f64,
                    num_reviews: 250,
                }),
                release_date: (i % 3 != 0)
                    .then(|| NaiveDate::from_ymd_opt(2000 + i % 24, 1 + (i % 12) as u32, 1))
                    .flatten(),
                create_date: now - Duration::days(i as i64 % 900),
                update_date: now - Duration::days(i as i64 % 90),
                name,
            }
        })
        .collect()
}

fn typical_filter() -> Filter {
    Filter::and(vec![
        Filter::or(vec![
            FilterNode::CriticScore { score: 60.0 }.into(),
            FilterNode::UserScore { score: 70.0 }.into(),
        ]),
        Filter::not(
            FilterNode::Genre {
                genre: "Simulation".to_string(),
            }
            .into(),
        ),
        FilterNode::PeriodUpdateDate {
            period: Period::months(2),
        }
        .into(),
    ])
}

fn bench_evaluation_pass(c: &mut Criterion) {
    let games = create_test_games(10_000);
    let filter = typical_filter();

    c.bench_function("evaluate_10k_games", |b| {
        b.iter(|| {
            let context = BenchContext {
                games: games.clone(),
                now: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
                cache: PassCache::new(),
            };
            let matched = context
                .games
                .iter()
                .filter(|game| filter.evaluate(game, &context))
                .count();
            black_box(matched)
        })
    });
}

fn bench_duplications_pass(c: &mut Criterion) {
    let games = create_test_games(10_000);
    let filter: Filter = FilterNode::Duplications.into();

    c.bench_function("duplications_10k_games", |b| {
        b.iter(|| {
            let context = BenchContext {
                games: games.clone(),
                now: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
                cache: PassCache::new(),
            };
            let matched = context
                .games
                .iter()
                .filter(|game| filter.evaluate(game, &context))
                .count();
            black_box(matched)
        })
    });

    c.bench_function("duplication_index_10k_games", |b| {
        b.iter(|| black_box(build_duplication_index(&games)))
    });
}

criterion_group!(benches, bench_evaluation_pass, bench_duplications_pass);
criterion_main!(benches);
