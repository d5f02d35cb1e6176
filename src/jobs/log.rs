//! Append-only job log files

use super::error::{JobError, JobResult};
use chrono::{DateTime, TimeZone};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// `18/10/2026-14:05:09`
pub const HEARTBEAT_FORMAT: &str = "%d/%m/%Y-%H:%M:%S";
/// `2026-10-18 14:05:09`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn heartbeat_timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format(HEARTBEAT_FORMAT).to_string()
}

pub fn timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Append lines to `path`, creating the file if needed
pub async fn append_lines(path: &Path, lines: &[String]) -> JobResult<()> {
    let to_err = |source| JobError::Log {
        path: path.to_path_buf(),
        source,
    };

    let mut buf = String::new();
    for line in lines {
        buf.push_str(line);
        buf.push('\n');
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(to_err)?;
    file.write_all(buf.as_bytes()).await.map_err(to_err)?;
    file.flush().await.map_err(to_err)?;

    Ok(())
}
