use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{NormalizedTable, CLOSE_COLUMN, DATE_COLUMN, VOLUME_COLUMN};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const TITLE_FONT_SIZE: u32 = 16;
const PRICE_CHART_HEIGHT: u32 = 350;
const VOLUME_CHART_HEIGHT: u32 = 250;

pub const CLOSE_MISSING: &str = "Closing price data missing or invalid.";
pub const VOLUME_MISSING: &str = "Volume data missing or invalid.";

/// Formatting knobs shared by both charts, resolved from the theme menus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub mark_color: String,
    pub date_format: String,
    pub label_angle: i32,
    pub price_format: String,
    pub volume_format: String,
}

/// Line chart of closing price over date, or `None` when no close value is present.
pub fn price_chart(table: &NormalizedTable, options: &ChartOptions) -> Option<Value> {
    if !table.has_close() {
        return None;
    }

    Some(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": { "text": "Stock Closing Price", "fontSize": TITLE_FONT_SIZE },
        "height": PRICE_CHART_HEIGHT,
        "width": "container",
        "autosize": { "type": "fit", "contains": "padding" },
        "data": { "values": chart_values(table) },
        "params": [pan_zoom()],
        "mark": { "type": "line", "strokeWidth": 2, "color": options.mark_color },
        "encoding": {
            "x": date_axis(options),
            "y": {
                "field": CLOSE_COLUMN,
                "type": "quantitative",
                "title": "Closing Price",
                "scale": { "zero": false },
                "axis": { "format": options.price_format },
            },
            "tooltip": [
                date_tooltip(options),
                {
                    "field": CLOSE_COLUMN,
                    "type": "quantitative",
                    "title": "Price",
                    "format": options.price_format,
                },
            ],
        },
    }))
}

/// Bar chart of volume over date, or `None` when no volume value is present.
pub fn volume_chart(table: &NormalizedTable, options: &ChartOptions) -> Option<Value> {
    if !table.has_volume() {
        return None;
    }

    Some(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": { "text": "Trading Volume", "fontSize": TITLE_FONT_SIZE },
        "height": VOLUME_CHART_HEIGHT,
        "width": "container",
        "autosize": { "type": "fit", "contains": "padding" },
        "data": { "values": chart_values(table) },
        "params": [pan_zoom()],
        "mark": { "type": "bar", "color": options.mark_color },
        "encoding": {
            "x": date_axis(options),
            "y": {
                "field": VOLUME_COLUMN,
                "type": "quantitative",
                "title": "Volume",
                "axis": { "format": options.volume_format },
            },
            "tooltip": [
                date_tooltip(options),
                {
                    "field": VOLUME_COLUMN,
                    "type": "quantitative",
                    "title": "Volume",
                    "format": options.volume_format,
                },
            ],
        },
    }))
}

fn date_axis(options: &ChartOptions) -> Value {
    json!({
        "field": DATE_COLUMN,
        "type": "temporal",
        "title": "Date",
        "axis": { "format": options.date_format, "labelAngle": options.label_angle },
    })
}

fn date_tooltip(options: &ChartOptions) -> Value {
    json!({
        "field": DATE_COLUMN,
        "type": "temporal",
        "title": "Date",
        "format": options.date_format,
    })
}

// Interval selection bound to scales: drag to pan, wheel to zoom.
fn pan_zoom() -> Value {
    json!({ "name": "grid", "select": "interval", "bind": "scales" })
}

// Dates go out as naive local midnight. A bare `YYYY-MM-DD` is read as UTC by
// Vega and would render a day early west of Greenwich.
fn chart_values(table: &NormalizedTable) -> Vec<Value> {
    table
        .rows
        .iter()
        .map(|row| {
            json!({
                DATE_COLUMN: row.date.format("%Y-%m-%dT00:00:00").to_string(),
                CLOSE_COLUMN: row.close,
                VOLUME_COLUMN: row.volume,
            })
        })
        .collect()
}
