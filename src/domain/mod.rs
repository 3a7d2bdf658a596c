pub mod dates;
pub mod models;
pub mod normalizer;
pub mod scores;

pub use models::*;
pub use normalizer::RecordNormalizer;
