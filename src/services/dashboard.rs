use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::models::{Diagnostic, NormalizedRow};
use crate::services::charts::{self, ChartOptions, CLOSE_MISSING, VOLUME_MISSING};
use crate::services::data_loader::DataLoader;
use crate::services::fetch::Fetch;
use crate::services::title_fetcher::TitleFetcher;
use crate::services::url_parser;
use crate::theme::{self, ThemePalette};

const PREVIEW_ROWS: usize = 5;

pub const INVALID_URL: &str = "Invalid Google Sheet URL.";
pub const TITLE_UNAVAILABLE: &str =
    "Note: Spreadsheet title couldn't be fetched (private sheet or network issue).";
const NO_DATA: &str = "No data loaded. Check URL, sharing, GID, columns.";
const TITLE_FAILED_PREFIX: &str = "Doc title failed. ";

/// Current state of every control on the page. Absent menu labels select the default entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardRequest {
    pub url: String,
    pub palette: Option<String>,
    pub date_format: Option<String>,
    pub rotation: Option<String>,
    pub price_format: Option<String>,
    pub volume_format: Option<String>,
    pub show_preview: bool,
    pub show_table: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub palette_name: &'static str,
    pub palette: ThemePalette,
    pub palette_css: String,
    pub spreadsheet_id: Option<String>,
    pub tab_id: Option<String>,
    pub title: Option<String>,
    pub messages: Vec<Diagnostic>,
    pub row_count: usize,
    pub price_chart: Option<Value>,
    pub volume_chart: Option<Value>,
    pub preview: Option<Preview>,
    pub table: Option<Vec<NormalizedRow>>,
}

impl DashboardResponse {
    fn blank(palette_name: &'static str, palette: ThemePalette) -> Self {
        Self {
            palette_name,
            palette,
            palette_css: theme::palette_css(&palette),
            spreadsheet_id: None,
            tab_id: None,
            title: None,
            messages: Vec::new(),
            row_count: 0,
            price_chart: None,
            volume_chart: None,
            preview: None,
            table: None,
        }
    }
}

/// One full pass of the page: parse the URL, look up the title, load the data, build charts.
pub struct Dashboard<F: Fetch> {
    base_url: String,
    titles: TitleFetcher<F>,
    loader: DataLoader<F>,
}

impl<F: Fetch> Dashboard<F> {
    pub fn new(config: &Config, fetcher: Arc<F>) -> Self {
        Self {
            base_url: config.sheets_base_url.clone(),
            titles: TitleFetcher::new(
                fetcher.clone(),
                config.sheets_base_url.clone(),
                config.title_timeout,
                config.title_cache_ttl,
            ),
            loader: DataLoader::new(fetcher, config.data_timeout, config.data_cache_ttl),
        }
    }

    pub async fn render(&self, request: &DashboardRequest) -> DashboardResponse {
        let (palette_name, palette) = theme::palette(request.palette.as_deref());
        let mut response = DashboardResponse::blank(palette_name, palette);

        if request.url.is_empty() {
            return response;
        }

        let Some(sheet) = url_parser::parse(request.url.trim()) else {
            tracing::warn!("Rejected URL without a spreadsheet id");
            response.messages.push(Diagnostic::error(INVALID_URL));
            return response;
        };

        let title = self.titles.fetch(&sheet.spreadsheet_id).await;
        response.messages.push(Diagnostic::info(format!("Loading GID `{}`...", sheet.tab_id)));

        let report = self.loader.load(&sheet.export_url(&self.base_url)).await;
        if report.has_errors() {
            tracing::warn!("No usable data for spreadsheet {} tab {}", sheet.spreadsheet_id, sheet.tab_id);
        }
        response.messages.extend(report.diagnostics);
        response.spreadsheet_id = Some(sheet.spreadsheet_id);
        response.tab_id = Some(sheet.tab_id);
        response.title = title;

        let table = report.table;
        if table.is_empty() {
            let prefix = if response.title.is_none() { TITLE_FAILED_PREFIX } else { "" };
            response.messages.push(Diagnostic::warning(format!("{}{}", prefix, NO_DATA)));
            return response;
        }

        if response.title.is_none() {
            response.messages.push(Diagnostic::info(TITLE_UNAVAILABLE));
        }

        let options = ChartOptions {
            mark_color: palette.button_color.to_string(),
            date_format: theme::date_format(request.date_format.as_deref()).to_string(),
            label_angle: theme::rotation(request.rotation.as_deref()),
            price_format: theme::price_format(request.price_format.as_deref()).to_string(),
            volume_format: theme::volume_format(request.volume_format.as_deref()).to_string(),
        };

        response.price_chart = charts::price_chart(&table, &options);
        if response.price_chart.is_none() {
            response.messages.push(Diagnostic::info(CLOSE_MISSING));
        }
        response.volume_chart = charts::volume_chart(&table, &options);
        if response.volume_chart.is_none() {
            response.messages.push(Diagnostic::info(VOLUME_MISSING));
        }

        response.row_count = table.len();
        if request.show_preview {
            response.preview = Some(Preview {
                columns: table.columns.clone(),
                rows: table.head(PREVIEW_ROWS).to_vec(),
            });
        }
        if request.show_table {
            response.table = Some(table.rows);
        }

        response
    }
}
