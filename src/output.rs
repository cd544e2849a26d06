//! Output rendering for the command line
//!
//! Storages print as a fixed-width table, JSON or YAML. Absent fields show
//! as `-` in tables and `null` elsewhere.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::provider::StoragesState;
use crate::pve::field::Field;
use crate::pve::storages::StorageRecord;

/// Placeholder for absent values in tables
const ABSENT: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Formats for nested documents that have no tabular form
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

/// Table column definition
struct ColumnDef {
    header: &'static str,
    width: usize,
    extract: fn(&StorageRecord) -> String,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef { header: "STORAGE", width: 20, extract: storage_cell },
    ColumnDef { header: "TYPE", width: 10, extract: type_cell },
    ColumnDef { header: "CONTENT", width: 32, extract: content_cell },
    ColumnDef { header: "PATH", width: 24, extract: path_cell },
    ColumnDef { header: "PRIORITY", width: 8, extract: priority_cell },
    ColumnDef { header: "PRUNE-BACKUPS", width: 20, extract: prune_backups_cell },
];

fn storage_cell(s: &StorageRecord) -> String {
    text(&s.storage)
}

fn type_cell(s: &StorageRecord) -> String {
    text(&s.storage_type)
}

fn content_cell(s: &StorageRecord) -> String {
    text(&s.content)
}

fn path_cell(s: &StorageRecord) -> String {
    text(&s.path)
}

fn priority_cell(s: &StorageRecord) -> String {
    number(&s.priority)
}

fn prune_backups_cell(s: &StorageRecord) -> String {
    text(&s.prune_backups)
}

fn text(field: &Field<String>) -> String {
    field
        .as_ref()
        .into_option()
        .map_or_else(|| ABSENT.to_string(), |v| v.clone())
}

fn number(field: &Field<i64>) -> String {
    field
        .as_ref()
        .into_option()
        .map_or_else(|| ABSENT.to_string(), |v| v.to_string())
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Render storages as a table, one row per record in API order
pub fn render_table(storages: &[StorageRecord]) -> String {
    let mut out = String::new();

    let header: Vec<String> = COLUMNS
        .iter()
        .map(|c| format!("{:<width$}", c.header, width = c.width))
        .collect();
    out.push_str(header.join(" ").trim_end());
    out.push('\n');

    for record in storages {
        let row: Vec<String> = COLUMNS
            .iter()
            .map(|c| {
                let cell = truncate_string(&(c.extract)(record), c.width);
                format!("{:<width$}", cell, width = c.width)
            })
            .collect();
        out.push_str(row.join(" ").trim_end());
        out.push('\n');
    }

    out
}

/// Render a storages read in the requested format
pub fn render_storages(state: &StoragesState, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(&state.storages)),
        OutputFormat::Json => render_document(state, DocumentFormat::Json),
        OutputFormat::Yaml => render_document(state, DocumentFormat::Yaml),
    }
}

/// Render any serializable document as JSON or YAML
pub fn render_document<T: Serialize>(value: &T, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Json => Ok(serde_json::to_string_pretty(value)? + "\n"),
        DocumentFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}
