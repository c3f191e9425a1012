use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::services::cache::TtlCache;
use crate::services::fetch::Fetch;

const MAX_TITLE_CHARS: usize = 100;
const REJECTED_MARKERS: [&str; 2] = ["Sign in", "Error"];

static TITLE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title>(.*?)</title>").expect("valid title pattern"));
static SHEETS_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-\s*Google Sheets\s*$").expect("valid suffix pattern"));

/// Best-effort lookup of a spreadsheet's document title from its edit page.
pub struct TitleFetcher<F: Fetch> {
    fetcher: Arc<F>,
    base_url: String,
    timeout: Duration,
    cache: TtlCache<String, Option<String>>,
}

impl<F: Fetch> TitleFetcher<F> {
    pub fn new(fetcher: Arc<F>, base_url: impl Into<String>, timeout: Duration, ttl: Duration) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            timeout,
            cache: TtlCache::new(ttl),
        }
    }

    /// Returns the title, or `None` for any failure. Misses are cached too.
    pub async fn fetch(&self, spreadsheet_id: &str) -> Option<String> {
        if spreadsheet_id.is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.get(&spreadsheet_id.to_string()) {
            tracing::debug!("Title cache hit for {}", spreadsheet_id);
            return cached;
        }

        let title = self.fetch_uncached(spreadsheet_id).await;
        self.cache.insert(spreadsheet_id.to_string(), title.clone());
        title
    }

    async fn fetch_uncached(&self, spreadsheet_id: &str) -> Option<String> {
        let url = edit_url(&self.base_url, spreadsheet_id);

        let start = std::time::Instant::now();
        let body = match self.fetcher.get(&url, self.timeout).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Title fetch failed for {}: {}", spreadsheet_id, e);
                return None;
            }
        };

        let html = match std::str::from_utf8(&body) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Title page for {} is not UTF-8: {}", spreadsheet_id, e);
                return None;
            }
        };

        let title = extract_title(html);
        tracing::info!(
            "Title lookup for {} finished in {:?}, found: {}",
            spreadsheet_id,
            start.elapsed(),
            title.is_some()
        );
        title
    }
}

pub fn edit_url(base_url: &str, spreadsheet_id: &str) -> String {
    format!("{}/spreadsheets/d/{}/edit", base_url, spreadsheet_id)
}

/// Scrapes the first `<title>` and rejects sign-in or error interstitials.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_TAG.captures(html)?.get(1)?.as_str().trim();
    let title = SHEETS_SUFFIX.replace(raw, "").trim().to_string();

    if title.chars().count() > MAX_TITLE_CHARS
        || REJECTED_MARKERS.iter().any(|marker| title.contains(marker))
        || title.is_empty()
    {
        return None;
    }

    Some(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::StubFetcher;

    const BASE: &str = "http://sheets.test";

    fn titles_for(stub: &Arc<StubFetcher>) -> TitleFetcher<StubFetcher> {
        TitleFetcher::new(stub.clone(), BASE, Duration::from_secs(10), Duration::from_secs(3600))
    }

    #[test]
    fn edit_url_points_at_edit_view() {
        assert_eq!(
            edit_url("https://docs.google.com", "ABC123"),
            "https://docs.google.com/spreadsheets/d/ABC123/edit"
        );
    }

    #[test]
    fn strips_google_sheets_suffix() {
        let html = "<html><head><TITLE>\n  Quarterly Prices - Google Sheets \n</TITLE></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Quarterly Prices"));
    }

    #[test]
    fn suffix_match_is_case_insensitive() {
        assert_eq!(extract_title("<title>Prices - google sheets</title>").as_deref(), Some("Prices"));
    }

    #[test]
    fn rejects_interstitial_titles() {
        assert_eq!(extract_title("<title>Google Sheets - Sign in</title>"), None);
        assert_eq!(extract_title("<title>Error 404 (Not Found)</title>"), None);
        assert_eq!(extract_title("<title> - Google Sheets</title>"), None);
        assert_eq!(extract_title("<html>no title here</html>"), None);
    }

    #[test]
    fn rejects_overlong_titles() {
        let long = format!("<title>{}</title>", "x".repeat(101));
        assert_eq!(extract_title(&long), None);
        let edge = format!("<title>{}</title>", "x".repeat(100));
        assert_eq!(extract_title(&edge).map(|t| t.len()), Some(100));
    }

    #[test]
    fn uses_first_title_only() {
        let html = "<title>First</title><svg><title>Second</title></svg>";
        assert_eq!(extract_title(html).as_deref(), Some("First"));
    }

    #[tokio::test]
    async fn caches_result_per_spreadsheet() {
        let stub = StubFetcher::new();
        stub.respond(&edit_url(BASE, "ABC"), "<title>Prices - Google Sheets</title>");
        let titles = titles_for(&stub);

        assert_eq!(titles.fetch("ABC").await.as_deref(), Some("Prices"));
        assert_eq!(titles.fetch("ABC").await.as_deref(), Some("Prices"));
        assert_eq!(stub.calls_to(&edit_url(BASE, "ABC")), 1);

        assert_eq!(titles.fetch("DEF").await, None);
        assert_eq!(stub.total_calls(), 2);
    }

    #[tokio::test]
    async fn expired_title_is_refetched() {
        let stub = StubFetcher::new();
        stub.respond(&edit_url(BASE, "ABC"), "<title>Prices - Google Sheets</title>");
        let titles = TitleFetcher::new(stub.clone(), BASE, Duration::from_secs(10), Duration::from_millis(50));

        assert_eq!(titles.fetch("ABC").await.as_deref(), Some("Prices"));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(titles.fetch("ABC").await.as_deref(), Some("Prices"));
        assert_eq!(stub.calls_to(&edit_url(BASE, "ABC")), 2);
    }

    #[tokio::test]
    async fn transport_failure_is_absent_and_cached() {
        let stub = StubFetcher::new();
        stub.fail(&edit_url(BASE, "ABC"), "operation timed out");
        let titles = titles_for(&stub);

        assert_eq!(titles.fetch("ABC").await, None);
        assert_eq!(titles.fetch("ABC").await, None);
        assert_eq!(stub.total_calls(), 1);
    }

    #[tokio::test]
    async fn non_utf8_page_is_absent() {
        let stub = StubFetcher::new();
        stub.respond(&edit_url(BASE, "ABC"), vec![0xffu8, 0xfe, 0x00]);
        assert_eq!(titles_for(&stub).fetch("ABC").await, None);
    }

    #[tokio::test]
    async fn empty_id_skips_network() {
        let stub = StubFetcher::new();
        assert_eq!(titles_for(&stub).fetch("").await, None);
        assert_eq!(stub.total_calls(), 0);
    }
}
