use chrono::NaiveDate;
use serde::Serialize;

pub const DATE_COLUMN: &str = "Date";
pub const CLOSE_COLUMN: &str = "Close";
pub const VOLUME_COLUMN: &str = "Volume";

/// A spreadsheet document plus the tab within it. Only built by the URL parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetReference {
    pub spreadsheet_id: String,
    pub tab_id: String,
}

impl SheetReference {
    pub fn export_url(&self, base_url: &str) -> String {
        format!(
            "{}/spreadsheets/d/{}/export?format=csv&gid={}",
            base_url, self.spreadsheet_id, self.tab_id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Close")]
    pub close: Option<f64>,
    #[serde(rename = "Volume")]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    /// Trimmed source headers in order, followed by any synthesized columns.
    pub columns: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_close(&self) -> bool {
        self.rows.iter().any(|row| row.close.is_some())
    }

    pub fn has_volume(&self) -> bool {
        self.rows.iter().any(|row| row.volume.is_some())
    }

    pub fn head(&self, n: usize) -> &[NormalizedRow] {
        &self.rows[..self.rows.len().min(n)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: Level::Warning, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: Level::Info, message: message.into() }
    }
}

/// Outcome of a data load: the table (possibly empty) and what went wrong on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub table: NormalizedTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            table: NormalizedTable::empty(),
            diagnostics: vec![Diagnostic::error(message)],
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }
}
