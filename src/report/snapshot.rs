use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use log::info;
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::{MatchRecord, PlayerName};
use crate::rating::EloEngine;
use crate::stats::progression::active_players;
use crate::stats::{
    ALL_PERIODS, HeadToHead, Leaderboard, LeaderboardBuilder, Period, Progression,
    ProgressionTracker, WinRatioMatrix,
};

/// Everything a report run derives from the match list
#[derive(Debug, Clone, Serialize)]
pub struct ReportSnapshot {
    pub generated_at: NaiveDateTime,
    pub matches: usize,
    pub ratings: BTreeMap<PlayerName, f64>,
    pub leaderboards: BTreeMap<Period, Leaderboard>,
    /// Only scopes where at least two players have games
    pub head_to_head: BTreeMap<Period, HeadToHead>,
    /// All-time win ratios laid out for charting
    pub win_ratios: Option<WinRatioMatrix>,
    pub active_players: Vec<PlayerName>,
    pub progression: Option<Progression>,
}

impl ReportSnapshot {
    pub fn leaderboard(&self, period: Period) -> Option<&Leaderboard> {
        self.leaderboards.get(&period)
    }

    pub fn head_to_head(&self, period: Period) -> Option<&HeadToHead> {
        self.head_to_head.get(&period)
    }
}

/// Replay ratings once, then derive every read-only view from the same records.
///
/// `records` must already be in replay order.
pub fn build_snapshot(
    records: &[MatchRecord],
    now: NaiveDateTime,
    config: &AppConfig,
) -> ReportSnapshot {
    info!("Building report snapshot for {} matches at {}", records.len(), now);

    let final_ratings = EloEngine::new(&config.rating).replay(records);

    let builder = LeaderboardBuilder::new(&final_ratings, &config.leaderboard, &config.rating);
    let leaderboards: BTreeMap<Period, Leaderboard> = ALL_PERIODS
        .iter()
        .map(|&period| (period, builder.build(records, period, now)))
        .collect();

    let head_to_head: BTreeMap<Period, HeadToHead> = ALL_PERIODS
        .iter()
        .filter_map(|&period| {
            HeadToHead::for_scope(period.filter(records, now)).map(|tally| (period, tally))
        })
        .collect();

    let win_ratios = head_to_head.get(&Period::AllTime).map(HeadToHead::to_matrix);

    let active = active_players(records, now, config.progression.activity_days);
    let progression =
        ProgressionTracker::new(&config.rating, &config.progression).track(records, now);

    let ratings = final_ratings
        .into_iter()
        .map(|(name, rating)| (name, rating.elo))
        .collect();

    ReportSnapshot {
        generated_at: now,
        matches: records.len(),
        ratings,
        leaderboards,
        head_to_head,
        win_ratios,
        active_players: active.into_iter().collect(),
        progression,
    }
}
