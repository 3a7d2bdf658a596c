pub mod appsheet_client;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::config::settings::SourceSettings;
use crate::domain::RawRow;
use crate::errors::input_context;
pub use appsheet_client::AppSheetClient;

/// Where raw match rows come from
pub enum RowSource {
    AppSheet(AppSheetClient),
    File(PathBuf),
}

impl RowSource {
    /// A local export when `input` is given, otherwise the configured AppSheet table
    pub fn select(input: Option<PathBuf>, settings: &SourceSettings) -> Result<Self> {
        match input {
            Some(path) => Ok(RowSource::File(path)),
            None => Ok(RowSource::AppSheet(AppSheetClient::new(settings)?)),
        }
    }

    pub async fn fetch_rows(&mut self) -> Result<Vec<RawRow>> {
        match self {
            RowSource::AppSheet(client) => client.fetch_rows().await,
            RowSource::File(path) => load_rows_from_file(path),
        }
    }
}

fn load_rows_from_file(path: &PathBuf) -> Result<Vec<RawRow>> {
    let display = path.display().to_string();
    let json = fs::read_to_string(path).with_context(|| input_context(&display))?;
    let payload = serde_json::from_str(&json).with_context(|| input_context(&display))?;
    let rows = appsheet_client::parse_rows(payload)?;

    info!("Loaded {} rows from {}", rows.len(), display);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_source() {
        let path = std::env::temp_dir().join("ttladder_test_rows.json");
        fs::write(&path, r#"[{"Winner": "Pavan", "Loser": "Kiran", "Score": "2-0"}]"#).unwrap();

        let mut source = RowSource::select(Some(path.clone()), &SourceSettings::default()).unwrap();
        let rows = source.fetch_rows().await.unwrap();

        assert_eq!(rows.len(), 1);

        // Cleanup
        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("ttladder_test_does_not_exist.json");
        let mut source = RowSource::File(path);

        assert!(source.fetch_rows().await.is_err());
    }
}
