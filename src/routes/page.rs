use axum::{extract::State, response::Html, routing::get, Router};
use std::path::Path;
use std::sync::Arc;

use crate::{error::AppError, theme, AppState};

const TEMPLATE: &str = include_str!("page.html");

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let path = &state.config.stylesheet_path;
    let (base_css, notice) = match read_stylesheet(path).await {
        Ok(css) => (css, None),
        Err(e) => {
            let notice = stylesheet_missing(path);
            tracing::warn!("{} ({})", notice, e);
            (theme::FALLBACK_CSS.to_string(), Some(notice))
        }
    };

    Html(render_page(&base_css, notice.as_deref()))
}

fn stylesheet_missing(path: &Path) -> String {
    format!("{} not found. Applying minimal fallback styles.", path.display())
}

async fn read_stylesheet(path: &Path) -> Result<String, AppError> {
    Ok(tokio::fs::read_to_string(path).await?)
}

/// Fills the page template. `notice` is shown above the controls as a warning banner.
pub fn render_page(base_css: &str, notice: Option<&str>) -> String {
    let (_, default_palette) = theme::palette(None);
    let palette_names: Vec<&str> = theme::PALETTES.iter().map(|(name, _)| *name).collect();
    let notice = notice
        .map(|text| format!("<div class=\"message warning\">{}</div>", escape_html(text)))
        .unwrap_or_default();

    TEMPLATE
        .replace("@@NOTICE@@", &notice)
        .replace("@@BASE_CSS@@", base_css)
        .replace("@@PALETTE_CSS@@", &theme::palette_css(&default_palette))
        .replace("@@PALETTE_OPTIONS@@", &options(&palette_names))
        .replace("@@DATE_OPTIONS@@", &options(&labels(&theme::DATE_FORMATS)))
        .replace("@@ROTATION_OPTIONS@@", &options(&labels(&theme::ROTATIONS)))
        .replace("@@PRICE_OPTIONS@@", &options(&labels(&theme::PRICE_FORMATS)))
        .replace("@@VOLUME_OPTIONS@@", &options(&labels(&theme::VOLUME_FORMATS)))
}

fn labels<T>(menu: &[(&'static str, T)]) -> Vec<&'static str> {
    menu.iter().map(|(label, _)| *label).collect()
}

fn options(labels: &[&str]) -> String {
    labels
        .iter()
        .map(|label| {
            let label = escape_html(label);
            format!("<option value=\"{}\">{}</option>", label, label)
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
