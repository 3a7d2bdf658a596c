use std::collections::{BTreeMap, BTreeSet};

use ndarray::Array2;
use serde::Serialize;

use crate::domain::{MatchRecord, PlayerName};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadToHeadCell {
    pub wins: u32,
    pub losses: u32,
}

impl HeadToHeadCell {
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_ratio(&self) -> f64 {
        self.wins as f64 / self.games() as f64
    }
}

/// Chart-ready win ratios: `ratios[i][j]` is `players[i]` against `players[j]`,
/// `None` for pairs that never met.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinRatioMatrix {
    pub players: Vec<PlayerName>,
    pub ratios: Vec<Vec<Option<f64>>>,
}

/// Pairwise results: `tally[a][b]` is a's record against b.
///
/// Every played pair is present in both directions; a missing pair never met.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HeadToHead {
    tally: BTreeMap<PlayerName, BTreeMap<PlayerName, HeadToHeadCell>>,
}

impl HeadToHead {
    /// Tally every record in `records`
    pub fn build<'r, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'r MatchRecord>,
    {
        let mut tally: BTreeMap<PlayerName, BTreeMap<PlayerName, HeadToHeadCell>> = BTreeMap::new();

        for record in records {
            tally
                .entry(record.winner.clone())
                .or_default()
                .entry(record.loser.clone())
                .or_default()
                .wins += 1;
            tally
                .entry(record.loser.clone())
                .or_default()
                .entry(record.winner.clone())
                .or_default()
                .losses += 1;
        }

        Self { tally }
    }

    /// Like [`HeadToHead::build`], but `None` when fewer than two players took part
    pub fn for_scope<'r, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'r MatchRecord>,
    {
        let tally = Self::build(records);
        (tally.player_count() >= 2).then_some(tally)
    }

    pub fn get(&self, player: &str, opponent: &str) -> Option<HeadToHeadCell> {
        self.tally.get(player)?.get(opponent).copied()
    }

    pub fn win_ratio(&self, player: &str, opponent: &str) -> Option<f64> {
        self.get(player, opponent).map(|cell| cell.win_ratio())
    }

    pub fn players(&self) -> BTreeSet<&str> {
        self.tally.keys().map(String::as_str).collect()
    }

    pub fn player_count(&self) -> usize {
        self.tally.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tally.is_empty()
    }

    /// A player's opponents, most wins first (fewest losses, then name, on ties)
    pub fn opponents_of(&self, player: &str) -> Vec<(&str, HeadToHeadCell)> {
        let Some(row) = self.tally.get(player) else {
            return Vec::new();
        };

        let mut opponents: Vec<(&str, HeadToHeadCell)> =
            row.iter().map(|(name, cell)| (name.as_str(), *cell)).collect();
        opponents.sort_by(|a, b| {
            b.1.wins
                .cmp(&a.1.wins)
                .then(a.1.losses.cmp(&b.1.losses))
                .then(a.0.cmp(b.0))
        });
        opponents
    }

    /// Dense win-ratio matrix over the sorted player list, NaN for pairs that never met
    pub fn win_ratio_matrix(&self) -> (Vec<&str>, Array2<f64>) {
        let players: Vec<&str> = self.tally.keys().map(String::as_str).collect();
        let n = players.len();
        let mut matrix = Array2::<f64>::from_elem((n, n), f64::NAN);

        for (i, player) in players.iter().enumerate() {
            for (j, opponent) in players.iter().enumerate() {
                if let Some(ratio) = self.win_ratio(player, opponent) {
                    matrix[[i, j]] = ratio;
                }
            }
        }

        (players, matrix)
    }

    pub fn to_matrix(&self) -> WinRatioMatrix {
        let (players, matrix) = self.win_ratio_matrix();
        let ratios = matrix
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|r| (!r.is_nan()).then_some(*r)).collect())
            .collect();

        WinRatioMatrix {
            players: players.into_iter().map(str::to_string).collect(),
            ratios,
        }
    }
}
