//! Line-delimited JSON reader for the record collections.

use crate::record::Record;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

/// Failures while reading a collection from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The data file could not be opened or read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io { source: std::io::Error, path: PathBuf },

    /// A non-blank line is not valid JSON.
    #[error("Malformed record at {}:{line}: {source}", .path.display())]
    Parse { source: serde_json::Error, path: PathBuf, line: usize },

    /// A non-blank line is valid JSON but not an object.
    #[error("Record at {}:{line} is not a JSON object (found {found})", .path.display())]
    NotAnObject { path: PathBuf, line: usize, found: &'static str },
}

impl LoadError {
    /// 1-based line number of the offending record, when the failure is per-line.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::Parse { line, .. } | Self::NotAnObject { line, .. } => Some(*line),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::NotAnObject { path, .. } => {
                path
            },
        }
    }
}

/// Reads a JSONL file into records, in file order.
///
/// Blank and whitespace-only lines are skipped. The first malformed line aborts the
/// read; nothing parsed so far is returned.
///
/// # Errors
/// Returns [`LoadError::Io`] if the file cannot be read, [`LoadError::Parse`] or
/// [`LoadError::NotAnObject`] for a bad line.
pub async fn read_jsonl(path: impl AsRef<Path>) -> Result<Vec<Record>, LoadError> {
    let path = path.as_ref();
    let file =
        File::open(path).await.map_err(|source| LoadError::Io { source, path: path.into() })?;

    let records = parse_jsonl(BufReader::new(file), path).await?;
    debug!(path = %path.display(), count = records.len(), "Parsed JSONL file");
    Ok(records)
}

/// Parses JSONL from any buffered reader; `origin` only labels errors.
///
/// # Errors
/// Same as [`read_jsonl`].
pub async fn parse_jsonl<R>(reader: R, origin: &Path) -> Result<Vec<Record>, LoadError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut records = Vec::new();
    let mut line_no = 0;

    while let Some(line) =
        lines.next_line().await.map_err(|source| LoadError::Io { source, path: origin.into() })?
    {
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let value: serde_json::Value = serde_json::from_str(trimmed).map_err(|source| {
            LoadError::Parse { source, path: origin.into(), line: line_no }
        })?;

        let record = Record::try_from(value).map_err(|other| LoadError::NotAnObject {
            path: origin.into(),
            line: line_no,
            found: json_kind(&other),
        })?;
        records.push(record);
    }

    Ok(records)
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn parse(input: &str) -> Result<Vec<Record>, LoadError> {
        parse_jsonl(input.as_bytes(), Path::new("inline.jsonl")).await
    }

    #[tokio::test]
    async fn keeps_source_order_and_skips_blank_lines() {
        let records = parse("{\"id\":1}\n\n   \n{\"id\":2}\r\n{\"id\":3}").await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.get("id").cloned()).collect();
        assert_eq!(ids, vec![Some(json!(1)), Some(json!(2)), Some(json!(3))]);
    }

    #[tokio::test]
    async fn empty_input_yields_no_records() {
        assert!(parse("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reports_line_of_malformed_record() {
        let err = parse("{\"id\":1}\n\n{\"id\":").await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 3, .. }));
        assert_eq!(err.path(), Path::new("inline.jsonl"));
    }

    #[tokio::test]
    async fn rejects_non_object_lines() {
        let err = parse("{\"id\":1}\n[1,2]").await.unwrap_err();
        assert!(matches!(err, LoadError::NotAnObject { line: 2, found: "array", .. }));
    }
}
