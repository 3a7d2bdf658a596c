use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::info;

use super::fetch_rows;
use crate::config::settings::AppConfig;
use crate::config::PlayerAliases;
use crate::domain::RecordNormalizer;
use crate::report::{ReportSnapshot, build_snapshot};

/// Builds the report snapshot without delivering anything
pub struct SnapshotService {
    config: AppConfig,
    input: Option<PathBuf>,
    aliases: PlayerAliases,
    now: NaiveDateTime,
}

impl SnapshotService {
    pub fn new(
        config: AppConfig,
        input: Option<PathBuf>,
        aliases: PlayerAliases,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            config,
            input,
            aliases,
            now,
        }
    }

    pub async fn build(&self) -> Result<ReportSnapshot> {
        let rows = fetch_rows(self.input.as_deref(), &self.config.source).await?;
        let records =
            RecordNormalizer::new(&self.config.schema, &self.aliases).normalize_rows(&rows);
        info!("  → {} of {} rows usable", records.len(), rows.len());

        Ok(build_snapshot(&records, self.now, &self.config))
    }
}

pub fn to_json(snapshot: &ReportSnapshot, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(snapshot)
    } else {
        serde_json::to_string(snapshot)
    };
    json.context("Failed to serialize report snapshot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    #[tokio::test]
    async fn test_snapshot_json() {
        let path = std::env::temp_dir().join("ttladder_test_snapshot_rows.json");
        fs::write(
            &path,
            r#"{"Rows": [
                {"Timestamp": "03/10/2025 12:00:00",
                 "Winner": "Pavan", "Loser": "Kiran", "Score": "2-1"}
            ]}"#,
        )
        .unwrap();
        let now = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();

        let service = SnapshotService::new(
            AppConfig::new(),
            Some(path.clone()),
            PlayerAliases::new(),
            now,
        );
        let snapshot = service.build().await.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&snapshot, false).unwrap()).unwrap();

        assert_eq!(json["matches"], 1);
        assert!(json["ratings"]["Pavan"].as_f64().unwrap() > 1500.0);

        // Cleanup
        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_fetch_errors_propagate() {
        let path = std::env::temp_dir().join("ttladder_test_snapshot_missing.json");
        let service = SnapshotService::new(
            AppConfig::new(),
            Some(path),
            PlayerAliases::new(),
            chrono::Local::now().naive_local(),
        );

        assert!(service.build().await.is_err());
    }
}
