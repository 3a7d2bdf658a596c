use chrono::NaiveTime;

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub initial_rating: f64,
    pub k_factor: f64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            initial_rating: 1500.0,
            k_factor: 32.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeaderboardSettings {
    pub win_bonus: f64,
    pub set_diff_bonus: f64,
    /// Last month's final standings are only posted during the first days of a month
    pub last_month_grace_days: u32,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            win_bonus: 10.0,
            set_diff_bonus: 3.0,
            last_month_grace_days: 7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressionSettings {
    pub activity_days: i64,
    pub weeks: u32,
    pub rank_threshold: u32,
    pub elo_threshold: f64,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            activity_days: 35,
            weeks: 5,
            rank_threshold: 0,
            elo_threshold: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaSettings {
    /// Tried in order against the primary timestamp column
    pub timestamp_formats: Vec<String>,
    /// Tried against the optional override date column
    pub override_formats: Vec<String>,
    /// Time of day used when only the override date is usable
    pub default_time: NaiveTime,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            timestamp_formats: vec![
                "%m/%d/%Y %H:%M:%S".to_string(),
                "%m/%d/%Y %H:%M".to_string(),
                "%m/%d/%Y".to_string(),
            ],
            override_formats: vec!["%d/%m/%Y".to_string(), "%Y-%m-%d".to_string()],
            default_time: NaiveTime::MIN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub app_id: Option<String>,
    pub access_key: Option<String>,
    pub table_name: String,
    pub timeout_secs: u64,
    pub api_base_url: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            app_id: None,
            access_key: None,
            table_name: "ASPTTDailyScores".to_string(),
            timeout_secs: 20,
            api_base_url: "https://api.appsheet.com/api/v2".to_string(),
        }
    }
}

impl SourceSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            app_id: read_env("APPSHEET_APP_ID"),
            access_key: read_env("APPSHEET_ACCESS_KEY"),
            table_name: read_env("APPSHEET_TABLE_NAME").unwrap_or(defaults.table_name),
            ..defaults
        }
    }

    pub fn is_configured(&self) -> bool {
        self.app_id.is_some() && self.access_key.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct DeliverySettings {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub rate_limit_ms: u64,
    pub timeout_secs: u64,
    pub api_base_url: String,
    pub user_agent: String,
    pub max_attempts: u32,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            rate_limit_ms: 1000, // Telegram allows roughly one message per second per chat
            timeout_secs: 30,
            api_base_url: "https://api.telegram.org".to_string(),
            user_agent: "TTLadder/0.1".to_string(),
            max_attempts: 3,
        }
    }
}

impl DeliverySettings {
    pub fn from_env() -> Self {
        Self {
            bot_token: read_env("TELEGRAM_BOT_TOKEN"),
            chat_id: read_env("TELEGRAM_CHAT_ID"),
            ..Self::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub leaderboard: LeaderboardSettings,
    pub progression: ProgressionSettings,
    pub schema: SchemaSettings,
    pub source: SourceSettings,
    pub delivery: DeliverySettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus credentials taken from the environment
    pub fn from_env() -> Self {
        Self {
            source: SourceSettings::from_env(),
            delivery: DeliverySettings::from_env(),
            ..Self::default()
        }
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scoring_rules() {
        let config = AppConfig::new();

        assert_eq!(config.rating.initial_rating, 1500.0);
        assert_eq!(config.rating.k_factor, 32.0);
        assert_eq!(config.leaderboard.win_bonus, 10.0);
        assert_eq!(config.leaderboard.set_diff_bonus, 3.0);
        assert_eq!(config.progression.activity_days, 35);
        assert_eq!(config.progression.weeks, 5);
    }

    #[test]
    fn test_unconfigured_collaborators() {
        let config = AppConfig::new();

        assert!(!config.source.is_configured());
        assert!(!config.delivery.is_configured());
        assert_eq!(config.source.table_name, "ASPTTDailyScores");
    }
}
