use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type PlayerName = String;

/// Placeholder name for cells that do not hold a usable player name
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// A spreadsheet row as returned by the source: column name -> cell value
pub type RawRow = BTreeMap<String, serde_json::Value>;

/// A validated match, immutable after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub timestamp: NaiveDateTime,
    pub winner: PlayerName,
    pub loser: PlayerName,
    pub winner_sets: u32,
    pub loser_sets: u32,
    /// Position of the source row, used to keep same-timestamp replays stable
    pub sequence: usize,
}

/// Sort records chronologically; equal timestamps keep their input order.
pub fn sort_chronologically(records: &mut [MatchRecord]) {
    records.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then(a.sequence.cmp(&b.sequence))
    });
}
