pub mod head_to_head;
pub mod leaderboard;
pub mod period;
pub mod progression;

pub use head_to_head::{HeadToHead, HeadToHeadCell, WinRatioMatrix};
pub use leaderboard::{Leaderboard, LeaderboardBuilder, LeaderboardEntry, PeriodStats};
pub use period::{ALL_PERIODS, Period};
pub use progression::{Progression, ProgressionTracker, WeeklySnapshot};
