/// Logical fields of a match row and the spreadsheet headers accepted for each.
///
/// Headers are compared case-insensitively after trimming. Earlier aliases win
/// when a sheet carries more than one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Timestamp,
    MatchDate,
    Winner,
    Loser,
    PlayerOne,
    PlayerTwo,
    Score,
}

impl Field {
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Timestamp => &["Timestamp", "Date"],
            Field::MatchDate => &["Match Date", "Played On", "Date Override"],
            Field::Winner => &["Winner"],
            Field::Loser => &["Runner up", "Loser"],
            Field::PlayerOne => &["Player 1"],
            Field::PlayerTwo => &["Player 2"],
            Field::Score => &["Set Score", "Score", "Final Score"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::MatchDate => "match date",
            Field::Winner => "winner",
            Field::Loser => "loser",
            Field::PlayerOne => "player 1",
            Field::PlayerTwo => "player 2",
            Field::Score => "score",
        }
    }

    /// Priority of `header` for this field, if it is one of the aliases
    pub fn alias_rank(&self, header: &str) -> Option<usize> {
        let header = header.trim();
        self.aliases()
            .iter()
            .position(|alias| alias.eq_ignore_ascii_case(header))
    }
}

pub const ALL_FIELDS: [Field; 7] = [
    Field::Timestamp,
    Field::MatchDate,
    Field::Winner,
    Field::Loser,
    Field::PlayerOne,
    Field::PlayerTwo,
    Field::Score,
];
