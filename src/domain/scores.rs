use std::sync::LazyLock;

use regex::Regex;

use crate::errors::RowRejection;

static SCORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*-\s*(\d+)\s*$").expect("valid score pattern"));

/// Largest set count a single match can record
pub const MAX_SETS: u32 = 99;

/// Sets won by the winner and by the loser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScore {
    pub winner_sets: u32,
    pub loser_sets: u32,
}

/// Parse a `"2-1"` style score.
///
/// Sheets record the score in either orientation, so the larger side is
/// always credited to the winner. Drawn scores cannot produce a winner.
pub fn parse_score(value: &str) -> Result<SetScore, RowRejection> {
    let captures = SCORE_PATTERN
        .captures(value)
        .ok_or_else(|| RowRejection::MalformedScore(value.to_string()))?;

    let left = parse_sets(&captures[1], value)?;
    let right = parse_sets(&captures[2], value)?;

    if left == right {
        return Err(RowRejection::DrawnScore(value.to_string()));
    }

    Ok(SetScore {
        winner_sets: left.max(right),
        loser_sets: left.min(right),
    })
}

fn parse_sets(digits: &str, value: &str) -> Result<u32, RowRejection> {
    digits
        .parse()
        .ok()
        .filter(|sets| *sets <= MAX_SETS)
        .ok_or_else(|| RowRejection::MalformedScore(value.to_string()))
}
