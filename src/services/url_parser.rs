use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::SheetReference;

const DEFAULT_TAB_ID: &str = "0";

static SPREADSHEET_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/spreadsheets/d/([^/]+)").expect("valid spreadsheet id pattern"));
static TAB_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#&?]gid=([^&]+)").expect("valid gid pattern"));

/// Pulls the spreadsheet id and tab id out of a Google Sheets URL.
///
/// Returns `None` when the URL has no `/spreadsheets/d/<id>` segment. The tab
/// defaults to `"0"` when no `gid=` parameter is present.
pub fn parse(url: &str) -> Option<SheetReference> {
    let spreadsheet_id = SPREADSHEET_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|id| !id.is_empty())?;

    let tab_id = TAB_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map_or(DEFAULT_TAB_ID, |m| m.as_str());

    Some(SheetReference {
        spreadsheet_id: spreadsheet_id.to_string(),
        tab_id: tab_id.to_string(),
    })
}
