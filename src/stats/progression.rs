use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use log::info;
use serde::Serialize;

use super::period::week_start;
use crate::config::settings::{ProgressionSettings, RatingSettings};
use crate::domain::{MatchRecord, PlayerName};
use crate::rating::EloEngine;
use crate::rating::types::ranked;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklySnapshot {
    pub week_start: NaiveDate,
    pub elo: f64,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    /// Week starts that had at least one rated match behind them, oldest first
    pub weeks: Vec<NaiveDate>,
    pub players: BTreeMap<PlayerName, Vec<WeeklySnapshot>>,
    pub max_rank_shift: u32,
    pub max_elo_shift: f64,
    pub has_meaningful_variation: bool,
}

/// Players with at least one match in the trailing `days` before `now`
pub fn active_players(
    records: &[MatchRecord],
    now: NaiveDateTime,
    days: i64,
) -> BTreeSet<PlayerName> {
    let cutoff = now - chrono::Duration::days(days);

    records
        .iter()
        .filter(|r| r.timestamp >= cutoff)
        .flat_map(|r| [r.winner.clone(), r.loser.clone()])
        .collect()
}

pub struct ProgressionTracker<'a> {
    rating: &'a RatingSettings,
    settings: &'a ProgressionSettings,
}

impl<'a> ProgressionTracker<'a> {
    pub fn new(rating: &'a RatingSettings, settings: &'a ProgressionSettings) -> Self {
        Self { rating, settings }
    }

    /// Weekly Elo and rank of every active player over the trailing weeks.
    ///
    /// `None` when nobody is active or no week has any match behind it.
    pub fn track(&self, records: &[MatchRecord], now: NaiveDateTime) -> Option<Progression> {
        let active = active_players(records, now, self.settings.activity_days);
        if active.is_empty() {
            info!("  → No active players in the last {} days", self.settings.activity_days);
            return None;
        }

        let week_starts = self.week_starts(now);
        let boundaries: Vec<NaiveDateTime> = week_starts
            .iter()
            .map(|start| (*start + Days::new(7)).and_time(NaiveTime::MIN))
            .collect();
        let snapshots = EloEngine::new(self.rating).snapshots(records, &boundaries);

        let mut weeks = Vec::new();
        let mut players: BTreeMap<PlayerName, Vec<WeeklySnapshot>> = BTreeMap::new();

        for (week_start, snapshot) in week_starts.into_iter().zip(&snapshots) {
            if snapshot.is_empty() {
                continue;
            }
            weeks.push(week_start);

            let standings: HashMap<&str, (u32, f64)> = ranked(snapshot)
                .into_iter()
                .map(|(rank, rating)| (rating.name.as_str(), (rank, rating.elo)))
                .collect();

            for name in &active {
                if let Some(&(rank, elo)) = standings.get(name.as_str()) {
                    players
                        .entry(name.clone())
                        .or_default()
                        .push(WeeklySnapshot { week_start, elo, rank });
                }
            }
        }

        if weeks.is_empty() {
            return None;
        }

        let (max_rank_shift, max_elo_shift) = largest_shifts(&players);
        let has_meaningful_variation = weeks.len() >= 2
            && (max_rank_shift > self.settings.rank_threshold
                || max_elo_shift > self.settings.elo_threshold);

        info!(
            "  → Tracked {} active players over {} weeks \
             (max rank shift {}, max Elo shift {:.1})",
            players.len(),
            weeks.len(),
            max_rank_shift,
            max_elo_shift
        );

        Some(Progression {
            weeks,
            players,
            max_rank_shift,
            max_elo_shift,
            has_meaningful_variation,
        })
    }

    fn week_starts(&self, now: NaiveDateTime) -> Vec<NaiveDate> {
        let current = week_start(now.date());

        (0..self.settings.weeks as u64)
            .rev()
            .map(|back| current - Days::new(back * 7))
            .collect()
    }
}

fn largest_shifts(players: &BTreeMap<PlayerName, Vec<WeeklySnapshot>>) -> (u32, f64) {
    players
        .values()
        .flat_map(|series| series.windows(2))
        .map(|pair| (pair[0].rank.abs_diff(pair[1].rank), (pair[1].elo - pair[0].elo).abs()))
        .fold((0u32, 0.0f64), |(rank, elo), (r, e)| (rank.max(r), elo.max(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, month, day)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn game(sequence: usize, timestamp: NaiveDateTime, winner: &str, loser: &str) -> MatchRecord {
        MatchRecord {
            timestamp,
            winner: winner.to_string(),
            loser: loser.to_string(),
            winner_sets: 2,
            loser_sets: 0,
            sequence,
        }
    }

    fn tracker_track(records: &[MatchRecord], now: NaiveDateTime) -> Option<Progression> {
        let rating = RatingSettings::default();
        let settings = ProgressionSettings::default();
        ProgressionTracker::new(&rating, &settings).track(records, now)
    }

    #[test]
    fn test_active_window() {
        let now = at(10, 18);
        let records = vec![
            game(0, at(8, 1), "Old", "Timer"),
            game(1, at(9, 20), "Pavan", "Kiran"),
        ];

        let active = active_players(&records, now, 35);

        assert_eq!(active.len(), 2);
        assert!(active.contains("Pavan"));
        assert!(!active.contains("Old"));
    }

    #[test]
    fn test_no_records_no_progression() {
        assert!(tracker_track(&[], at(10, 18)).is_none());
    }

    #[test]
    fn test_inactive_players_excluded() {
        let now = at(10, 18);
        let records = vec![
            game(0, at(8, 1), "Old", "Timer"),
            game(1, at(9, 28), "Pavan", "Kiran"),
            game(2, at(10, 6), "Kiran", "Pavan"),
            game(3, at(10, 13), "Kiran", "Old"),
        ];

        let progression = tracker_track(&records, now).unwrap();

        assert!(progression.players.contains_key("Old"));
        assert!(!progression.players.contains_key("Timer"));
        assert_eq!(progression.weeks.len(), 5);
    }

    #[test]
    fn test_weekly_snapshots_follow_replay() {
        let now = at(10, 18);
        let records = vec![
            game(0, at(9, 29), "Pavan", "Kiran"),
            game(1, at(10, 13), "Kiran", "Pavan"),
            game(2, at(10, 14), "Kiran", "Pavan"),
        ];

        let progression = tracker_track(&records, now).unwrap();

        // Weeks starting Sep 14 and Sep 21 have no matches behind them
        assert_eq!(
            progression.weeks,
            vec![
                NaiveDate::from_ymd_opt(2026, 9, 28).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 5).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
            ]
        );

        let pavan = &progression.players["Pavan"];
        assert_eq!(pavan.len(), 3);
        assert_eq!(pavan[0].rank, 1);
        assert!((pavan[0].elo - 1516.0).abs() < 1e-9);
        assert_eq!(pavan[1], WeeklySnapshot { week_start: progression.weeks[1], ..pavan[0] });
        assert_eq!(pavan[2].rank, 2);
        assert_eq!(progression.max_rank_shift, 1);
        assert!(progression.has_meaningful_variation);
    }

    #[test]
    fn test_stable_ladder_is_not_meaningful() {
        let now = at(10, 18);
        // One match long ago, nothing since: every week shows the same standings
        let records = vec![
            game(0, at(9, 20), "Pavan", "Kiran"),
        ];

        let progression = tracker_track(&records, now).unwrap();

        assert!(progression.weeks.len() >= 2);
        assert_eq!(progression.max_rank_shift, 0);
        assert_eq!(progression.max_elo_shift, 0.0);
        assert!(!progression.has_meaningful_variation);
    }

    #[test]
    fn test_single_week_is_not_meaningful() {
        let now = at(10, 18);
        let records = vec![
            game(0, at(10, 12), "Pavan", "Kiran"),
            game(1, at(10, 13), "Kiran", "Pavan"),
        ];

        let progression = tracker_track(&records, now).unwrap();

        assert_eq!(progression.weeks.len(), 1);
        assert!(!progression.has_meaningful_variation);
    }
}
