pub mod report;
pub mod snapshot;

use std::path::Path;

use anyhow::Result;

use crate::api::RowSource;
use crate::config::PlayerAliases;
use crate::config::settings::SourceSettings;
use crate::domain::RawRow;

pub use report::{ReportService, RunSummary};
pub use snapshot::SnapshotService;

/// Read rows from `input` when given, otherwise from the configured AppSheet table
pub async fn fetch_rows(input: Option<&Path>, settings: &SourceSettings) -> Result<Vec<RawRow>> {
    let mut source = RowSource::select(input.map(Path::to_path_buf), settings)?;
    source.fetch_rows().await
}

/// Aliases from `path`, or an empty table that leaves every name as typed
pub fn load_aliases(path: Option<&Path>) -> Result<PlayerAliases> {
    match path {
        Some(path) => PlayerAliases::load(path),
        None => Ok(PlayerAliases::new()),
    }
}
