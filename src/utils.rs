//! Output formatting for decoded records
//!
//! Records have a column set that is only known at runtime, so tables are
//! built row by row instead of through a derived `Tabled` impl.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "display")]
use crate::database::RowRecord;

/// Unified output format for all commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Compact JSON (single line)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// JSON Lines format (one JSON object per line)
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    /// Check if this is a JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    /// Get a list of all format names for help text
    pub fn all_names() -> &'static [&'static str] {
        &[
            "table",
            "markdown",
            "json",
            "json-pretty",
            "json-line",
            "psv",
        ]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
            Self::JsonLine => write!(f, "json-line"),
            Self::Psv => write!(f, "psv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonline" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

/// Header for a set of records: every key in first-seen order
///
/// Rows with null columns carry fewer keys, so no single record is enough.
#[cfg(feature = "display")]
pub fn record_columns(records: &[RowRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}

/// Render records as text in the requested format
#[cfg(feature = "display")]
pub fn format_records(records: &[RowRecord], output_format: OutputFormat) -> String {
    use itertools::Itertools;
    use tabled::builder::Builder;
    use tabled::settings::Style;

    let columns = record_columns(records);
    let cells = |record: &RowRecord| -> Vec<String> {
        columns
            .iter()
            .map(|c| record.get(c).unwrap_or_default().to_string())
            .collect()
    };

    match output_format {
        OutputFormat::Table | OutputFormat::Markdown => {
            let mut builder = Builder::default();
            builder.push_record(columns.iter().cloned());
            for record in records {
                builder.push_record(cells(record));
            }
            let mut table = builder.build();
            if output_format == OutputFormat::Markdown {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }
            table.to_string()
        }
        OutputFormat::Json => serde_json::to_string(records).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(records).unwrap_or_default(),
        OutputFormat::JsonLine => records
            .iter()
            .filter_map(|r| serde_json::to_string(r).ok())
            .join("\n"),
        OutputFormat::Psv => {
            let mut lines = vec![columns.iter().join("|")];
            lines.extend(records.iter().map(|r| cells(r).join("|")));
            lines.join("\n")
        }
    }
}
