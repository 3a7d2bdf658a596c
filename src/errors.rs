use thiserror::Error;

/// Reason a raw spreadsheet row was dropped during normalization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("missing required column: {0}")]
    MissingField(&'static str),

    #[error("unparseable {field} value: {value:?}")]
    UnparseableDate { field: &'static str, value: String },

    #[error("ambiguous {field} value {value:?} (formats disagree)")]
    AmbiguousDate { field: &'static str, value: String },

    #[error("malformed score: {0:?}")]
    MalformedScore(String),

    #[error("drawn score: {0:?}")]
    DrawnScore(String),

    #[error("unknown player name")]
    UnknownPlayer,

    #[error("player {0:?} cannot play against themselves")]
    SamePlayer(String),

    #[error("winner {0:?} is neither of the listed players")]
    WinnerNotAPlayer(String),
}

/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", url)
}

/// Add context to delivery errors
pub fn delivery_context(channel: &str) -> String {
    format!("Failed to deliver message to {}", channel)
}

/// Add context to file input errors
pub fn input_context(path: &str) -> String {
    format!("Failed to read input file: {}", path)
}
