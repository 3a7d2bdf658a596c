use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::period::Period;
use crate::config::settings::{LeaderboardSettings, RatingSettings};
use crate::domain::{MatchRecord, PlayerName};
use crate::rating::RatingMap;
use crate::rating::types::elo_or;

/// Per-player tallies inside one period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u64,
    pub sets_lost: u64,
}

impl PeriodStats {
    pub fn set_diff(&self) -> i64 {
        self.sets_won as i64 - self.sets_lost as i64
    }

    fn record_win(&mut self, record: &MatchRecord) {
        self.matches += 1;
        self.wins += 1;
        self.add_sets(record.winner_sets, record.loser_sets);
    }

    fn record_loss(&mut self, record: &MatchRecord) {
        self.matches += 1;
        self.losses += 1;
        self.add_sets(record.loser_sets, record.winner_sets);
    }

    fn add_sets(&mut self, won: u32, lost: u32) {
        self.sets_won = self.sets_won.saturating_add(won.into());
        self.sets_lost = self.sets_lost.saturating_add(lost.into());
    }
}

/// Fold the given records into per-player stats. Players without matches are absent.
pub fn period_stats<'r, I>(records: I) -> BTreeMap<PlayerName, PeriodStats>
where
    I: IntoIterator<Item = &'r MatchRecord>,
{
    let mut stats: BTreeMap<PlayerName, PeriodStats> = BTreeMap::new();

    for record in records {
        stats
            .entry(record.winner.clone())
            .or_default()
            .record_win(record);
        stats
            .entry(record.loser.clone())
            .or_default()
            .record_loss(record);
    }

    stats
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: PlayerName,
    pub elo: f64,
    pub score: f64,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub set_diff: i64,
}

/// Ranked table for one period. An empty table means nobody played.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub period: Period,
    pub title: String,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, name: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// Builds period leaderboards on top of the final ratings.
///
/// Period filtering only changes wins, losses and set difference; the Elo used
/// for scoring is always the player's final rating.
pub struct LeaderboardBuilder<'a> {
    ratings: &'a RatingMap,
    scoring: &'a LeaderboardSettings,
    default_elo: f64,
}

impl<'a> LeaderboardBuilder<'a> {
    pub fn new(
        ratings: &'a RatingMap,
        scoring: &'a LeaderboardSettings,
        rating: &RatingSettings,
    ) -> Self {
        Self {
            ratings,
            scoring,
            default_elo: rating.initial_rating,
        }
    }

    pub fn build(
        &self,
        records: &[MatchRecord],
        period: Period,
        now: NaiveDateTime,
    ) -> Leaderboard {
        let stats = period_stats(period.filter(records, now));
        let entries = self.rank(stats);

        Leaderboard {
            period,
            title: period.title(now),
            entries,
        }
    }

    pub fn score(&self, elo: f64, stats: &PeriodStats) -> f64 {
        elo + stats.wins as f64 * self.scoring.win_bonus
            + stats.set_diff() as f64 * self.scoring.set_diff_bonus
    }

    fn rank(&self, stats: BTreeMap<PlayerName, PeriodStats>) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = stats
            .into_iter()
            .map(|(name, stats)| self.build_entry(name, &stats))
            .collect();

        entries.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.elo.total_cmp(&a.elo))
                .then_with(|| a.name.cmp(&b.name))
        });

        for (idx, entry) in entries.iter_mut().enumerate() {
            entry.rank = idx as u32 + 1;
        }

        entries
    }

    fn build_entry(&self, name: PlayerName, stats: &PeriodStats) -> LeaderboardEntry {
        let elo = elo_or(self.ratings, &name, self.default_elo);

        LeaderboardEntry {
            rank: 0,
            score: self.score(elo, stats),
            elo,
            matches: stats.matches,
            wins: stats.wins,
            losses: stats.losses,
            set_diff: stats.set_diff(),
            name,
        }
    }
}
