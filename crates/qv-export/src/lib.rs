#![forbid(unsafe_code)]

//! Copyable textual exports of a compiled edge set.
//!
//! Every format keeps the compiler's row order and quotes every field, so the
//! same edge set always exports to byte-identical text.

use std::fmt::{self, Write};
use std::str::FromStr;

use qv_core::EdgeSet;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Export format identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// `tibble::tribble(...)` code literal.
    #[default]
    Tribble,
    /// `data.frame(from = c(...), to = c(...))` code literal.
    DataFrame,
    /// Quoted CSV with a `from,to` header.
    Csv,
    /// JSON array of `{ "from", "to" }` objects.
    Json,
}

impl ExportFormat {
    pub const ALL: [Self; 4] = [Self::Tribble, Self::DataFrame, Self::Csv, Self::Json];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tribble => "tribble",
            Self::DataFrame => "data-frame",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for export format parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseExportFormatError(String);

impl fmt::Display for ParseExportFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown export format: {}", self.0)
    }
}

impl std::error::Error for ParseExportFormatError {}

impl FromStr for ExportFormat {
    type Err = ParseExportFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tribble" | "tibble" => Ok(Self::Tribble),
            "data-frame" | "dataframe" | "data.frame" => Ok(Self::DataFrame),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ParseExportFormatError(s.to_string())),
        }
    }
}

/// Render `edges` in the requested format.
#[must_use]
pub fn export(edges: &EdgeSet, format: ExportFormat) -> String {
    match format {
        ExportFormat::Tribble => export_tribble(edges),
        ExportFormat::DataFrame => export_data_frame(edges),
        ExportFormat::Csv => export_csv(edges),
        ExportFormat::Json => export_json(edges),
    }
}

/// Row-wise code literal with `from` and `to` columns.
#[must_use]
pub fn export_tribble(edges: &EdgeSet) -> String {
    let mut out = String::from("tibble::tribble(\n  ~from, ~to");
    for edge in edges {
        let _ = write!(
            out,
            ",\n  {}, {}",
            quote_code(edge.from.as_str()),
            quote_code(edge.to.as_str())
        );
    }
    out.push_str("\n)");
    out
}

/// Column-wise code literal.
#[must_use]
pub fn export_data_frame(edges: &EdgeSet) -> String {
    let column = |values: Vec<String>| {
        if values.is_empty() {
            "character(0)".to_string()
        } else {
            format!("c({})", values.join(", "))
        }
    };
    let from = column(edges.iter().map(|e| quote_code(e.from.as_str())).collect());
    let to = column(edges.iter().map(|e| quote_code(e.to.as_str())).collect());
    format!("data.frame(\n  from = {from},\n  to = {to}\n)")
}

#[must_use]
pub fn export_csv(edges: &EdgeSet) -> String {
    let mut out = String::from("\"from\",\"to\"\n");
    for edge in edges {
        let _ = writeln!(
            out,
            "{},{}",
            quote_csv(edge.from.as_str()),
            quote_csv(edge.to.as_str())
        );
    }
    out
}

#[must_use]
pub fn export_json(edges: &EdgeSet) -> String {
    let rows: Vec<Value> = edges
        .iter()
        .map(|edge| json!({ "from": edge.from.as_str(), "to": edge.to.as_str() }))
        .collect();
    format!("{:#}", Value::Array(rows))
}

/// Double-quoted string literal with backslash escapes.
fn quote_code(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// RFC 4180 field: always quoted, inner quotes doubled.
fn quote_csv(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
