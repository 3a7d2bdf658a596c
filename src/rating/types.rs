use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::PlayerName;

pub type RatingValue = f64;
pub type RatingMap = BTreeMap<PlayerName, PlayerRating>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRating {
    pub name: PlayerName,
    pub elo: RatingValue,
    pub matches: u32,
}

impl PlayerRating {
    pub fn new(name: &str, elo: RatingValue) -> Self {
        Self {
            name: name.to_string(),
            elo,
            matches: 0,
        }
    }
}

/// Elo of `player`, falling back to `default` for players never rated
pub fn elo_or(ratings: &RatingMap, player: &str, default: RatingValue) -> RatingValue {
    ratings.get(player).map(|r| r.elo).unwrap_or(default)
}

/// Players ordered by Elo descending (name ascending on ties), with 1-based ranks
pub fn ranked(ratings: &RatingMap) -> Vec<(u32, &PlayerRating)> {
    let mut players: Vec<&PlayerRating> = ratings.values().collect();
    players.sort_by(|a, b| b.elo.total_cmp(&a.elo).then_with(|| a.name.cmp(&b.name)));

    players
        .into_iter()
        .enumerate()
        .map(|(idx, rating)| (idx as u32 + 1, rating))
        .collect()
}
