//! Snapshot export of the whole blob.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::CenterResult;
use crate::store::CenterStore;

/// File name of the export taken on `date`, e.g. `KAT_EDU_BACKUP-2024-03-10.json`.
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.json", prefix, date.format("%Y-%m-%d"))
}

/// Writes the store as pretty JSON into `dir` and returns the file path.
///
/// A second export on the same day overwrites the first.
pub async fn export_snapshot(
    store: &CenterStore,
    dir: &Path,
    prefix: &str,
    date: NaiveDate,
) -> CenterResult<PathBuf> {
    let path = dir.join(export_file_name(prefix, date));
    let body = serde_json::to_vec_pretty(&store.to_json()?)?;
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, body).await?;
    info!(path = %path.display(), "Exported snapshot");
    Ok(path)
}
