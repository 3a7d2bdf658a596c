use crate::config::settings::SourceSettings;
use crate::domain::RawRow;
use crate::errors::fetch_context;
use crate::http::RateLimitedClient;
use anyhow::{Context, Result};
use log::info;
use serde_json::{Value, json};

const USER_AGENT: &str = "TTLadder/0.1";

/// Reads match rows from an AppSheet table through the v2 REST API
pub struct AppSheetClient {
    client: RateLimitedClient,
    base_url: String,
    app_id: String,
    access_key: String,
    table_name: String,
}

impl AppSheetClient {
    pub fn new(settings: &SourceSettings) -> Result<Self> {
        let app_id = settings
            .app_id
            .clone()
            .context("APPSHEET_APP_ID is not set")?;
        let access_key = settings
            .access_key
            .clone()
            .context("APPSHEET_ACCESS_KEY is not set")?;
        let client = RateLimitedClient::new(USER_AGENT, settings.timeout_secs, 0)?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.clone(),
            app_id,
            access_key,
            table_name: settings.table_name.clone(),
        })
    }

    /// Fetch every row of the configured table
    pub async fn fetch_rows(&mut self) -> Result<Vec<RawRow>> {
        let url = self.build_action_url();
        info!("Fetching rows from AppSheet table {}", self.table_name);

        let body = json!({ "Action": "Find", "Properties": {}, "Rows": [] });
        let response = self
            .client
            .post_json(&url, &[("applicationaccesskey", self.access_key.as_str())], &body)
            .await
            .with_context(|| fetch_context(&url))?;

        let payload: Value = response
            .json()
            .await
            .context("Failed to parse AppSheet response as JSON")?;
        let rows = parse_rows(payload)?;

        info!("  → Fetched {} rows", rows.len());
        Ok(rows)
    }

    fn build_action_url(&self) -> String {
        format!(
            "{}/apps/{}/tables/{}/Action",
            self.base_url,
            urlencoding::encode(&self.app_id),
            urlencoding::encode(&self.table_name)
        )
    }
}

/// Accept either a bare row array or an object wrapping it under `Rows`
pub fn parse_rows(payload: Value) -> Result<Vec<RawRow>> {
    let rows = match payload {
        Value::Array(rows) => Value::Array(rows),
        Value::Object(mut map) => map
            .remove("Rows")
            .context("AppSheet response object has no Rows field")?,
        other => anyhow::bail!("Unexpected AppSheet response: {}", other),
    };

    serde_json::from_value(rows).context("AppSheet rows are not JSON objects")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SourceSettings {
        SourceSettings {
            app_id: Some("app-123".to_string()),
            access_key: Some("key".to_string()),
            table_name: "TT Daily Scores".to_string(),
            ..SourceSettings::default()
        }
    }

    #[test]
    fn test_action_url_encodes_table_name() {
        let client = AppSheetClient::new(&settings()).unwrap();

        assert_eq!(
            client.build_action_url(),
            "https://api.appsheet.com/api/v2/apps/app-123/tables/TT%20Daily%20Scores/Action"
        );
    }

    #[test]
    fn test_missing_credentials() {
        let settings = SourceSettings::default();

        assert!(AppSheetClient::new(&settings).is_err());
    }

    #[test]
    fn test_parse_row_array() {
        let rows = parse_rows(json!([
            {"Winner": "Pavan", "Runner up": "Kiran", "Set Score": "2-1"},
            {"Winner": "Kiran", "Runner up": "Pavan", "Set Score": "2-0"},
        ]))
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Winner"], "Pavan");
    }

    #[test]
    fn test_parse_wrapped_rows() {
        let rows = parse_rows(json!({"Rows": [{"Winner": "Pavan"}]})).unwrap();
        assert_eq!(rows.len(), 1);

        assert!(parse_rows(json!({"Error": "denied"})).is_err());
        assert!(parse_rows(json!("nope")).is_err());
        assert!(parse_rows(json!([1, 2])).is_err());
    }
}
