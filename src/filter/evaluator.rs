//! Filter evaluation
//!
//! Every node answers two questions: [`Filter::evaluate`] and
//! [`Filter::evaluate_not`]. The negated result is defined per node kind
//! rather than as `!evaluate`: De Morgan expansion keeps short-circuiting
//! under negation, and rules over nullable fields must match neither polarity
//! when the field is absent. Missing domain data is a first-class `false`
//! outcome, never an error.

use crate::filter::ast::{Filter, FilterNode};
use crate::filter::context::EvaluationContext;
use crate::filter::diagnostics;
use crate::game::Game;
use chrono::NaiveTime;

impl Filter {
    /// Does `game` match this filter?
    pub fn evaluate<C: EvaluationContext>(&self, game: &Game, context: &C) -> bool {
        match self.node() {
            FilterNode::And { targets } => targets.iter().all(|t| t.evaluate(game, context)),
            FilterNode::Or { targets } => targets.iter().any(|t| t.evaluate(game, context)),
            FilterNode::Not { target } => target.evaluate_not(game, context),

            FilterNode::True => true,

            FilterNode::CriticScore { score } => matches_threshold(game.critic_score(), *score),
            FilterNode::UserScore { score } => matches_threshold(game.user_score(), *score),
            FilterNode::AvgScore { score } => matches_threshold(game.avg_score(), *score),
            FilterNode::MinScore { score } => matches_threshold(game.min_score(), *score),
            FilterNode::MaxScore { score } => matches_threshold(game.max_score(), *score),
            FilterNode::NullCriticScore => game.critic_score().is_none(),
            FilterNode::NullUserScore => game.user_score().is_none(),
            FilterNode::NullAvgScore => game.avg_score().is_none(),

            FilterNode::TargetReleaseDate { date } => {
                game.release_date.is_some_and(|d| d >= *date)
            }
            FilterNode::TargetUpdateDate { date } => game.update_date.date_naive() >= *date,
            FilterNode::TargetCreateDate { date } => game.create_date.date_naive() >= *date,
            FilterNode::PeriodReleaseDate { period } => game
                .release_date
                .is_some_and(|d| d.and_time(NaiveTime::MIN).and_utc() >= period.subtract_from(context.now())),
            FilterNode::PeriodUpdateDate { period } => {
                game.update_date >= period.subtract_from(context.now())
            }
            FilterNode::PeriodCreateDate { period } => {
                game.create_date >= period.subtract_from(context.now())
            }
            FilterNode::NullReleaseDate => game.release_date.is_none(),

            FilterNode::Platform { platform } => game.platform == *platform,
            FilterNode::Library { id } => game.library_id == *id,
            FilterNode::Genre { genre } => game.genres.iter().any(|g| g == genre),
            FilterNode::Tag { tag } => game.tags.iter().any(|t| t == tag),
            FilterNode::Provider { provider_id } => {
                provider_applies(game, context, provider_id)
                    && has_provider_data(game, provider_id)
            }
            FilterNode::FileSize { target } => context.size(game) >= *target,

            FilterNode::Duplications => diagnostics::evaluate_duplications(game, context),
            FilterNode::NameDiff => diagnostics::evaluate_name_diff(game, context),
        }
    }

    /// Does `game` match the negation of this filter?
    ///
    /// Nodes without an arm here negate symmetrically and fall through to
    /// `!evaluate(..)`.
    pub fn evaluate_not<C: EvaluationContext>(&self, game: &Game, context: &C) -> bool {
        match self.node() {
            FilterNode::And { targets } => targets.iter().any(|t| t.evaluate_not(game, context)),
            FilterNode::Or { targets } => targets.iter().all(|t| t.evaluate_not(game, context)),
            FilterNode::Not { target } => target.evaluate(game, context),

            FilterNode::True => false,

            // "< threshold" still requires the field to be present
            FilterNode::CriticScore { score } => misses_threshold(game.critic_score(), *score),
            FilterNode::UserScore { score } => misses_threshold(game.user_score(), *score),
            FilterNode::AvgScore { score } => misses_threshold(game.avg_score(), *score),
            FilterNode::MinScore { score } => misses_threshold(game.min_score(), *score),
            FilterNode::MaxScore { score } => misses_threshold(game.max_score(), *score),

            FilterNode::TargetReleaseDate { date } => game.release_date.is_some_and(|d| d < *date),
            FilterNode::TargetUpdateDate { date } => game.update_date.date_naive() < *date,
            FilterNode::TargetCreateDate { date } => game.create_date.date_naive() < *date,
            FilterNode::PeriodReleaseDate { period } => game
                .release_date
                .is_some_and(|d| d.and_time(NaiveTime::MIN).and_utc() < period.subtract_from(context.now())),
            FilterNode::PeriodUpdateDate { period } => {
                game.update_date < period.subtract_from(context.now())
            }
            FilterNode::PeriodCreateDate { period } => {
                game.create_date < period.subtract_from(context.now())
            }

            // An inapplicable or excluded provider matches neither polarity
            FilterNode::Provider { provider_id } => {
                provider_applies(game, context, provider_id)
                    && !has_provider_data(game, provider_id)
            }

            _ => !self.evaluate(game, context),
        }
    }
}

#[inline]
fn matches_threshold(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v >= threshold)
}

#[inline]
fn misses_threshold(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v < threshold)
}

fn provider_applies<C: EvaluationContext>(game: &Game, context: &C, provider_id: &str) -> bool {
    context.provider_supports(provider_id, game.platform) && !game.is_provider_excluded(provider_id)
}

fn has_provider_data(game: &Game, provider_id: &str) -> bool {
    game.provider_headers()
        .any(|header| header.provider_id == provider_id)
}
