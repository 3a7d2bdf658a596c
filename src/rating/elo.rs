use chrono::NaiveDateTime;
use log::{debug, info};

use super::types::{PlayerRating, RatingMap, RatingValue};
use crate::config::settings::RatingSettings;
use crate::domain::MatchRecord;

/// Probability that a player rated `rating` beats one rated `opponent`
pub fn expected_score(rating: RatingValue, opponent: RatingValue) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// New (winner, loser) ratings after one match. Points are zero-sum.
pub fn update_pair(
    winner: RatingValue,
    loser: RatingValue,
    k_factor: f64,
) -> (RatingValue, RatingValue) {
    let exchanged = k_factor * (1.0 - expected_score(winner, loser));
    (winner + exchanged, loser - exchanged)
}

/// Replays matches in order, one rating per player.
///
/// Each match reads the ratings left by every earlier match, so the replay is a
/// strict left fold and cannot be split across threads.
pub struct EloEngine<'a> {
    settings: &'a RatingSettings,
}

impl<'a> EloEngine<'a> {
    pub fn new(settings: &'a RatingSettings) -> Self {
        Self { settings }
    }

    /// Final ratings after every record. `records` must be in replay order.
    pub fn replay(&self, records: &[MatchRecord]) -> RatingMap {
        let ratings = records
            .iter()
            .fold(RatingMap::new(), |ratings, record| self.apply(ratings, record));

        info!(
            "Replayed {} matches for {} players",
            records.len(),
            ratings.len()
        );
        ratings
    }

    /// Ratings from the matches played strictly before `cutoff`
    pub fn replay_until(&self, records: &[MatchRecord], cutoff: NaiveDateTime) -> RatingMap {
        records
            .iter()
            .take_while(|record| record.timestamp < cutoff)
            .fold(RatingMap::new(), |ratings, record| self.apply(ratings, record))
    }

    /// Rating snapshots at each boundary in one pass.
    ///
    /// `boundaries` must be ascending; snapshot `i` holds every match with a
    /// timestamp before `boundaries[i]`.
    pub fn snapshots(
        &self,
        records: &[MatchRecord],
        boundaries: &[NaiveDateTime],
    ) -> Vec<RatingMap> {
        let mut snapshots = Vec::with_capacity(boundaries.len());
        let mut ratings = RatingMap::new();
        let mut pending = boundaries.iter().peekable();

        for record in records {
            while let Some(boundary) = pending.next_if(|b| record.timestamp >= **b) {
                debug!("Captured rating snapshot at {}", boundary);
                snapshots.push(ratings.clone());
            }
            ratings = self.apply(ratings, record);
        }

        for _ in pending {
            snapshots.push(ratings.clone());
        }

        snapshots
    }

    fn apply(&self, mut ratings: RatingMap, record: &MatchRecord) -> RatingMap {
        let winner = self.current_rating(&ratings, &record.winner);
        let loser = self.current_rating(&ratings, &record.loser);
        let (winner_new, loser_new) = update_pair(winner, loser, self.settings.k_factor);

        self.record_result(&mut ratings, &record.winner, winner_new);
        self.record_result(&mut ratings, &record.loser, loser_new);
        ratings
    }

    fn current_rating(&self, ratings: &RatingMap, player: &str) -> RatingValue {
        ratings
            .get(player)
            .map(|r| r.elo)
            .unwrap_or(self.settings.initial_rating)
    }

    fn record_result(&self, ratings: &mut RatingMap, player: &str, elo: RatingValue) {
        let entry = ratings
            .entry(player.to_string())
            .or_insert_with(|| PlayerRating::new(player, self.settings.initial_rating));
        entry.elo = elo;
        entry.matches += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
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

    #[test]
    fn test_equal_ratings_exchange_half_k() {
        let (winner, loser) = update_pair(1500.0, 1500.0, 32.0);

        assert!((winner - 1516.0).abs() < 1e-9);
        assert!((loser - 1484.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_is_zero_sum() {
        for (rw, rl) in [(1500.0, 1500.0), (1620.5, 1410.0), (1300.0, 1800.0)] {
            let (w, l) = update_pair(rw, rl, 32.0);
            assert!(((w - rw) + (l - rl)).abs() < 1e-9);
            assert!(w > rw && l < rl);
        }
    }

    #[test]
    fn test_upset_moves_more_points() {
        let (favourite_win, _) = update_pair(1700.0, 1300.0, 32.0);
        let (underdog_win, _) = update_pair(1300.0, 1700.0, 32.0);

        assert!(underdog_win - 1300.0 > favourite_win - 1700.0);
    }

    #[test]
    fn test_replay_uses_prior_ratings() {
        let settings = RatingSettings::default();
        let engine = EloEngine::new(&settings);
        let records = vec![
            game(0, at(12, 10), "Pavan", "Kiran"),
            game(1, at(13, 10), "Kiran", "Ravi"),
        ];

        let ratings = engine.replay(&records);

        // Kiran enters the second match at 1484, so beating a fresh 1500 pays more than 16
        let (kiran, ravi) = update_pair(1484.0, 1500.0, 32.0);
        assert!((ratings["Kiran"].elo - kiran).abs() < 1e-9);
        assert!((ratings["Ravi"].elo - ravi).abs() < 1e-9);
        assert_eq!(ratings["Kiran"].matches, 2);
        assert_eq!(ratings["Pavan"].matches, 1);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let settings = RatingSettings::default();
        let engine = EloEngine::new(&settings);
        let records = vec![
            game(0, at(12, 10), "A", "B"),
            game(1, at(12, 10), "B", "C"),
            game(2, at(13, 9), "C", "A"),
            game(3, at(14, 9), "A", "C"),
        ];

        assert_eq!(engine.replay(&records), engine.replay(&records));
    }

    #[test]
    fn test_empty_replay() {
        let settings = RatingSettings::default();
        let engine = EloEngine::new(&settings);

        assert!(engine.replay(&[]).is_empty());
    }

    #[test]
    fn test_snapshots_match_partial_replays() {
        let settings = RatingSettings::default();
        let engine = EloEngine::new(&settings);
        let records = vec![
            game(0, at(5, 10), "A", "B"),
            game(1, at(12, 10), "B", "C"),
            game(2, at(19, 9), "C", "A"),
        ];
        let boundaries = vec![at(1, 0), at(12, 10), at(13, 0), at(30, 0)];

        let snapshots = engine.snapshots(&records, &boundaries);

        assert_eq!(snapshots.len(), boundaries.len());
        for (snapshot, boundary) in snapshots.iter().zip(&boundaries) {
            assert_eq!(snapshot, &engine.replay_until(&records, *boundary));
        }
        assert!(snapshots[0].is_empty());
        assert_eq!(snapshots[1].len(), 2);
        assert_eq!(snapshots[3], engine.replay(&records));
    }
}
