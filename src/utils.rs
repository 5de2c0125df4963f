use crate::error::ScraperError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::Path;

pub(crate) fn get_now() -> DateTime<Utc> {
    Utc::now()
}

pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Writes `value` as 2-space indented JSON, creating parent directories.
pub(crate) async fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), ScraperError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
