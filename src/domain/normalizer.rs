use std::collections::HashMap;

use chrono::NaiveDateTime;
use log::{info, warn};
use serde_json::Value;

use super::dates::{parse_date, parse_datetime};
use super::models::{MatchRecord, PlayerName, RawRow, UNKNOWN_PLAYER, sort_chronologically};
use super::scores::parse_score;
use crate::config::PlayerAliases;
use crate::config::columns::{ALL_FIELDS, Field};
use crate::config::settings::SchemaSettings;
use crate::errors::RowRejection;

/// Turns raw spreadsheet rows into validated match records
pub struct RecordNormalizer<'a> {
    schema: &'a SchemaSettings,
    aliases: &'a PlayerAliases,
}

impl<'a> RecordNormalizer<'a> {
    pub fn new(schema: &'a SchemaSettings, aliases: &'a PlayerAliases) -> Self {
        Self { schema, aliases }
    }

    /// Normalize every row, dropping rejected ones, and return the survivors
    /// in replay order.
    pub fn normalize_rows(&self, rows: &[RawRow]) -> Vec<MatchRecord> {
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = 0;

        for (sequence, row) in rows.iter().enumerate() {
            match self.normalize_row(row, sequence) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    rejected += 1;
                    warn!("Skipping row {}: {}", sequence + 1, reason);
                }
            }
        }

        if rejected > 0 {
            info!("  → Rejected {} of {} rows", rejected, rows.len());
        }

        sort_chronologically(&mut records);
        records
    }

    pub fn normalize_row(
        &self,
        row: &RawRow,
        sequence: usize,
    ) -> Result<MatchRecord, RowRejection> {
        let cells = ResolvedRow::resolve(row);

        let winner = self.required_name(&cells, Field::Winner)?;
        let loser = self.resolve_loser(&cells, &winner)?;
        check_players(&winner, &loser)?;

        let score_text = cells
            .text(Field::Score)
            .ok_or(RowRejection::MissingField(Field::Score.label()))?;
        let score = parse_score(&score_text)?;

        let timestamp = self.resolve_timestamp(&cells)?;

        Ok(MatchRecord {
            timestamp,
            winner,
            loser,
            winner_sets: score.winner_sets,
            loser_sets: score.loser_sets,
            sequence,
        })
    }

    fn resolve_loser(
        &self,
        cells: &ResolvedRow,
        winner: &str,
    ) -> Result<PlayerName, RowRejection> {
        // A blank loser cell defers to the player pair
        if cells.text(Field::Loser).is_some() {
            return self.required_name(cells, Field::Loser);
        }

        let first = self.required_name(cells, Field::PlayerOne)?;
        let second = self.required_name(cells, Field::PlayerTwo)?;
        check_players(&first, &second)?;

        if winner == UNKNOWN_PLAYER {
            Err(RowRejection::UnknownPlayer)
        } else if winner == first {
            Ok(second)
        } else if winner == second {
            Ok(first)
        } else {
            Err(RowRejection::WinnerNotAPlayer(winner.to_string()))
        }
    }

    fn resolve_timestamp(&self, cells: &ResolvedRow) -> Result<NaiveDateTime, RowRejection> {
        let primary = cells.text(Field::Timestamp);

        let Some(override_text) = cells.text(Field::MatchDate) else {
            let primary = primary.ok_or(RowRejection::MissingField(Field::Timestamp.label()))?;
            return parse_datetime(
                &primary,
                &self.schema.timestamp_formats,
                Field::Timestamp.label(),
            );
        };

        let date = parse_date(
            &override_text,
            &self.schema.override_formats,
            Field::MatchDate.label(),
        )?;

        // Keep the recorded time of day so same-day matches stay in order
        let time = primary
            .and_then(|text| {
                parse_datetime(&text, &self.schema.timestamp_formats, Field::Timestamp.label())
                    .ok()
            })
            .map(|dt| dt.time())
            .unwrap_or(self.schema.default_time);

        Ok(date.and_time(time))
    }

    fn required_name(&self, cells: &ResolvedRow, field: Field) -> Result<PlayerName, RowRejection> {
        self.name(cells, field)
            .ok_or(RowRejection::MissingField(field.label()))
    }

    fn name(&self, cells: &ResolvedRow, field: Field) -> Option<PlayerName> {
        let value = cells.get(field)?;
        let name = match value {
            Value::String(s) if !s.trim().is_empty() => self.aliases.resolve(s.trim()),
            _ => UNKNOWN_PLAYER.to_string(),
        };
        Some(name)
    }
}

fn check_players(first: &str, second: &str) -> Result<(), RowRejection> {
    if first == UNKNOWN_PLAYER || second == UNKNOWN_PLAYER {
        return Err(RowRejection::UnknownPlayer);
    }
    if first == second {
        return Err(RowRejection::SamePlayer(first.to_string()));
    }
    Ok(())
}

/// A row's cells keyed by logical field, using the highest-priority alias present
struct ResolvedRow<'r> {
    cells: HashMap<Field, (usize, &'r Value)>,
}

impl<'r> ResolvedRow<'r> {
    fn resolve(row: &'r RawRow) -> Self {
        let mut cells: HashMap<Field, (usize, &'r Value)> = HashMap::new();

        for (header, value) in row {
            for field in ALL_FIELDS {
                let Some(rank) = field.alias_rank(header) else {
                    continue;
                };
                let better = cells.get(&field).is_none_or(|(current, _)| rank < *current);
                if better {
                    cells.insert(field, (rank, value));
                }
            }
        }

        Self { cells }
    }

    fn get(&self, field: Field) -> Option<&'r Value> {
        self.cells.get(&field).map(|(_, value)| *value)
    }

    /// Cell text, or `None` when the column is absent, null or blank
    fn text(&self, field: Field) -> Option<String> {
        match self.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            other => Some(other.to_string()),
        }
    }
}
