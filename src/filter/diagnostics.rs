//! Diagnostic rules: duplication and folder-name mismatch detection
//!
//! Both rules report their findings through the context side channel as they
//! evaluate. Duplication detection works over the whole game set, so its
//! index is computed once per evaluation pass through the context cache and
//! shared by every per-game evaluation.

use crate::filter::context::{AdditionalData, EvaluationContext};
use crate::game::{FolderName, Game, GameId, Platform, ProviderId};
use ahash::AHashMap;
use std::fmt::Write as _;
use tracing::debug;

/// Cache key under which the per-pass duplication index is memoized
pub const DUPLICATIONS_CACHE_KEY: &str = "Duplications.result";

/// One game duplicating another through a shared provider record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDuplication {
    /// Provider whose record both games share
    pub provider_id: ProviderId,
    /// The other game holding the same record
    pub duplicated_game_id: GameId,
}

/// A provider disagreeing with a game's folder name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameNameFolderDiff {
    pub provider_id: ProviderId,
    pub actual_name: String,
    pub expected_name: String,
    /// Character-level patch turning `actual_name` into `expected_name`
    pub patch: Vec<DiffChunk>,
}

/// One run of a character-level diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffChunk {
    Equal(String),
    Delete(String),
    Insert(String),
}

/// Map from game id to all duplications attributed to it
pub type DuplicationIndex = AHashMap<GameId, Vec<GameDuplication>>;

pub(crate) fn evaluate_duplications<C: EvaluationContext>(game: &Game, context: &C) -> bool {
    let index = context.cache(DUPLICATIONS_CACHE_KEY, || {
        build_duplication_index(context.games())
    });

    match index.get(&game.id) {
        Some(duplications) => {
            for duplication in duplications {
                context
                    .add_additional_info(game, AdditionalData::Duplication(duplication.clone()));
            }
            true
        }
        None => false,
    }
}

/// Find every pair of games sharing a provider record on the same platform
///
/// Header comparison ignores the fetch timestamp. Pairs are emitted in both
/// directions, attributed to each side.
pub fn build_duplication_index(games: &[Game]) -> DuplicationIndex {
    let mut games_by_header: AHashMap<(&str, &str), Vec<&Game>> = AHashMap::new();
    for game in games {
        for header in game.provider_headers() {
            games_by_header
                .entry((header.provider_id.as_str(), header.game_id.as_str()))
                .or_default()
                .push(game);
        }
    }

    let mut index = DuplicationIndex::new();
    for ((provider_id, _), group) in games_by_header {
        if group.len() <= 1 {
            continue;
        }

        // Only games on the same platform count as duplicates of each other
        let mut by_platform: AHashMap<Platform, Vec<&Game>> = AHashMap::new();
        for game in group {
            by_platform.entry(game.platform).or_default().push(game);
        }

        for platform_group in by_platform.values().filter(|g| g.len() > 1) {
            for a in platform_group {
                for b in platform_group {
                    if a.id != b.id {
                        index.entry(a.id).or_default().push(GameDuplication {
                            provider_id: provider_id.to_string(),
                            duplicated_game_id: b.id,
                        });
                    }
                }
            }
        }
    }

    debug!(
        games = games.len(),
        duplicated = index.len(),
        "computed duplication index"
    );
    index
}

pub(crate) fn evaluate_name_diff<C: EvaluationContext>(game: &Game, context: &C) -> bool {
    let mut found = false;
    for provider_data in &game.provider_data {
        let actual = &game.folder_name.raw_name;
        let expected = expected_folder_name(&game.folder_name, &provider_data.name, context);
        if *actual != expected {
            let diff = GameNameFolderDiff {
                provider_id: provider_data.header.provider_id.clone(),
                patch: char_diff(actual, &expected),
                actual_name: actual.clone(),
                expected_name: expected,
            };
            context.add_additional_info(game, AdditionalData::NameDiff(diff));
            found = true;
        }
    }
    found
}

/// Reconstruct the folder name a provider's display name implies, keeping the
/// game's existing order/meta-tag/version decorations
fn expected_folder_name<C: EvaluationContext>(
    folder_name: &FolderName,
    provider_name: &str,
    context: &C,
) -> String {
    let mut expected = String::new();
    if let Some(order) = &folder_name.order {
        let _ = write!(expected, "[{order}] ");
    }
    expected.push_str(&context.to_file_name(provider_name));
    if let Some(meta_tag) = &folder_name.meta_tag {
        let _ = write!(expected, " [{meta_tag}]");
    }
    if let Some(version) = &folder_name.version {
        let _ = write!(expected, " [{version}]");
    }
    expected
}

/// Character-level diff between two strings, as runs of equal, deleted and
/// inserted characters (longest-common-subsequence backtracking)
pub fn char_diff(actual: &str, expected: &str) -> Vec<DiffChunk> {
    let a: Vec<char> = actual.chars().collect();
    let b: Vec<char> = expected.chars().collect();

    // lcs[i][j]: LCS length of a[i..] and b[j..]
    let mut lcs = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut chunks: Vec<DiffChunk> = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            push_char(&mut chunks, ChunkKind::Equal, a[i]);
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            push_char(&mut chunks, ChunkKind::Delete, a[i]);
            i += 1;
        } else {
            push_char(&mut chunks, ChunkKind::Insert, b[j]);
            j += 1;
        }
    }
    for &c in &a[i..] {
        push_char(&mut chunks, ChunkKind::Delete, c);
    }
    for &c in &b[j..] {
        push_char(&mut chunks, ChunkKind::Insert, c);
    }
    chunks
}

#[derive(PartialEq, Clone, Copy)]
enum ChunkKind {
    Equal,
    Delete,
    Insert,
}

fn push_char(chunks: &mut Vec<DiffChunk>, kind: ChunkKind, c: char) {
    let extend = match (chunks.last_mut(), kind) {
        (Some(DiffChunk::Equal(text)), ChunkKind::Equal)
        | (Some(DiffChunk::Delete(text)), ChunkKind::Delete)
        | (Some(DiffChunk::Insert(text)), ChunkKind::Insert) => {
            text.push(c);
            true
        }
        _ => false,
    };
    if !extend {
        chunks.push(match kind {
            ChunkKind::Equal => DiffChunk::Equal(c.to_string()),
            ChunkKind::Delete => DiffChunk::Delete(c.to_string()),
            ChunkKind::Insert => DiffChunk::Insert(c.to_string()),
        });
    }
}
