use crate::error::Result;
use crate::index::PageIndex;
use crate::model::{Notebook, Store};
use chrono::{DateTime, Local};
use csv::{QuoteStyle, WriterBuilder};
use once_cell::sync::Lazy;
use regex::Regex;

pub const CSV_HEADER: [&str; 6] = ["notebook", "page", "date", "time", "title", "content"];

static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\-]+").expect("valid filename regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

/// A rendered export, ready to be written wherever the caller wants.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub content: String,
    pub format: ExportFormat,
}

/// One notebook as CSV: a header and one row per page. `id` and
/// `lastModified` are not exported.
pub fn to_csv(notebook: &Notebook) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for (index, page) in PageIndex::all().zip(notebook.pages()) {
        let page_no = index.to_string();
        let record: [&str; 6] = [
            &notebook.name,
            &page_no,
            &page.date,
            &page.time,
            &page.title,
            &page.content,
        ];
        writer.write_record(record)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    // Every field came from a String, so the output is valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `"My Notes!"` becomes `My_Notes__notebook.csv`.
pub fn csv_filename(notebook_name: &str) -> String {
    format!(
        "{}_notebook.csv",
        UNSAFE_FILENAME_CHARS.replace_all(notebook_name, "_")
    )
}

/// The whole store, pretty-printed. This is the full-fidelity backup.
pub fn to_json(store: &Store) -> Result<String> {
    Ok(serde_json::to_string_pretty(store)?)
}

pub fn json_filename(now: DateTime<Local>) -> String {
    format!("quire-backup-{}.json", now.format("%Y-%m-%d"))
}

pub fn csv_artifact(notebook: &Notebook) -> Result<ExportArtifact> {
    Ok(ExportArtifact {
        filename: csv_filename(&notebook.name),
        content: to_csv(notebook)?,
        format: ExportFormat::Csv,
    })
}

pub fn json_artifact(store: &Store) -> Result<ExportArtifact> {
    Ok(ExportArtifact {
        filename: json_filename(Local::now()),
        content: to_json(store)?,
        format: ExportFormat::Json,
    })
}
