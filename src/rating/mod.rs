pub mod elo;
pub mod types;

pub use elo::{EloEngine, expected_score, update_pair};
pub use types::{PlayerRating, RatingMap, RatingValue};
