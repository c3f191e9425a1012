use axum::{extract::Path, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppError,
    theme::{self, ThemePalette},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/themes", get(list_themes))
        .route("/api/themes/:name", get(get_palette))
}

#[derive(Debug, Serialize)]
pub struct NamedPalette {
    name: &'static str,
    #[serde(flatten)]
    colors: ThemePalette,
}

#[derive(Debug, Serialize)]
pub struct MenuOption<T> {
    label: &'static str,
    value: T,
}

#[derive(Debug, Serialize)]
pub struct ThemeCatalog {
    palettes: Vec<NamedPalette>,
    date_formats: Vec<MenuOption<&'static str>>,
    rotations: Vec<MenuOption<i32>>,
    price_formats: Vec<MenuOption<&'static str>>,
    volume_formats: Vec<MenuOption<&'static str>>,
}

fn menu<T: Copy>(entries: &[(&'static str, T)]) -> Vec<MenuOption<T>> {
    entries
        .iter()
        .map(|&(label, value)| MenuOption { label, value })
        .collect()
}

pub fn catalog() -> ThemeCatalog {
    ThemeCatalog {
        palettes: theme::PALETTES
            .iter()
            .map(|&(name, colors)| NamedPalette { name, colors })
            .collect(),
        date_formats: menu(&theme::DATE_FORMATS),
        rotations: menu(&theme::ROTATIONS),
        price_formats: menu(&theme::PRICE_FORMATS),
        volume_formats: menu(&theme::VOLUME_FORMATS),
    }
}

async fn list_themes() -> Json<ThemeCatalog> {
    Json(catalog())
}

async fn get_palette(Path(name): Path<String>) -> Result<Json<NamedPalette>, AppError> {
    theme::PALETTES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(name, colors)| Json(NamedPalette { name, colors }))
        .ok_or_else(|| AppError::NotFound(format!("Unknown palette: {}", name)))
}
