use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::AppError;
use crate::models::{
    Diagnostic, LoadReport, NormalizedRow, NormalizedTable, CLOSE_COLUMN, DATE_COLUMN,
    VOLUME_COLUMN,
};
use crate::services::cache::TtlCache;
use crate::services::fetch::Fetch;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

// Slash dates are read month-first.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Fetches a sheet's CSV export and normalizes it into a `NormalizedTable`.
pub struct DataLoader<F: Fetch> {
    fetcher: Arc<F>,
    timeout: Duration,
    cache: TtlCache<String, LoadReport>,
}

impl<F: Fetch> DataLoader<F> {
    pub fn new(fetcher: Arc<F>, timeout: Duration, ttl: Duration) -> Self {
        Self {
            fetcher,
            timeout,
            cache: TtlCache::new(ttl),
        }
    }

    /// Never fails: problems come back as diagnostics next to an empty or degraded table.
    ///
    /// Anything derived from a received body is cached for the TTL; transport
    /// failures are not, so the next call retries the request.
    pub async fn load(&self, export_url: &str) -> LoadReport {
        if let Some(cached) = self.cache.get(&export_url.to_string()) {
            tracing::debug!("Data cache hit for {}", export_url);
            return cached;
        }

        let start = std::time::Instant::now();
        tracing::info!("Downloading CSV export from {}", export_url);

        let body = match self.fetcher.get(export_url, self.timeout).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("CSV download failed: {}", e);
                return LoadReport::failed(format!("Data load error: {}", e));
            }
        };
        tracing::info!(
            "CSV downloaded, size: {}KB, took: {:?}",
            body.len() / 1024,
            start.elapsed()
        );

        let report = normalize_csv(&body);
        self.cache.insert(export_url.to_string(), report.clone());
        report
    }
}

/// Turns a CSV export body into a report, mapping every failure to a diagnostic.
pub fn normalize_csv(body: &[u8]) -> LoadReport {
    match normalize(body) {
        Ok(report) => report,
        Err(AppError::SchemaError(msg)) => {
            tracing::error!("CSV schema rejected: {}", msg);
            LoadReport::failed(msg)
        }
        Err(e) => {
            tracing::error!("CSV could not be parsed: {}", e);
            LoadReport::failed(format!("Data load error: {}", e))
        }
    }
}

fn normalize(body: &[u8]) -> Result<LoadReport, AppError> {
    let text = std::str::from_utf8(body)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| name.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let date_idx = column_index(&columns, DATE_COLUMN)
        .ok_or_else(|| AppError::SchemaError(format!("'{}' column missing.", DATE_COLUMN)))?;
    let close_idx = column_index(&columns, CLOSE_COLUMN);
    let volume_idx = column_index(&columns, VOLUME_COLUMN);

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    let mut overflowing = 0usize;
    for record in reader.records() {
        let record = record?;
        if record.len() > columns.len() {
            overflowing += 1;
        }

        let Some(date) = record.get(date_idx).and_then(parse_date) else {
            dropped += 1;
            continue;
        };

        rows.push(NormalizedRow {
            date,
            close: close_idx.and_then(|i| record.get(i)).and_then(parse_number),
            volume: volume_idx.and_then(|i| record.get(i)).and_then(parse_number),
        });
    }

    if dropped > 0 {
        tracing::warn!("Dropped {} rows with unparseable dates", dropped);
    }
    if rows.is_empty() {
        return Err(AppError::SchemaError("No valid dates.".to_string()));
    }

    let mut table = NormalizedTable { columns, rows };
    let mut diagnostics = Vec::new();
    for (name, idx) in [(CLOSE_COLUMN, close_idx), (VOLUME_COLUMN, volume_idx)] {
        if idx.is_none() {
            tracing::warn!("'{}' column missing, filling with nulls", name);
            diagnostics.push(Diagnostic::warning(format!("'{}' column missing.", name)));
            table.columns.push(name.to_string());
        }
    }
    if overflowing > 0 {
        tracing::warn!("{} rows had more cells than headers", overflowing);
        diagnostics.push(Diagnostic::warning(extra_cells_message(overflowing)));
    }

    tracing::info!(
        "Normalized {} rows across {} columns",
        table.len(),
        table.columns.len()
    );
    Ok(LoadReport { table, diagnostics })
}

// Usually an unquoted thousands separator shifting every later cell.
fn extra_cells_message(rows: usize) -> String {
    format!(
        "{} row(s) had more cells than headers; extra cells were ignored. Quote numbers containing commas.",
        rows
    )
}

fn column_index(columns: &[String], name: &str) -> Option<usize> {
    columns.iter().position(|column| column == name)
}

/// Best-effort calendar date parse. Time-of-day parts are discarded.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.naive_local().date());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(cell, format).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(cell, format).ok())
        })
}

/// Strips `$` and `,` then reads a float. Blank and non-finite cells are null.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
