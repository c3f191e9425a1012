use axum::{http::Method, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod dashboard;
pub mod page;
pub mod themes;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_check))
        .merge(page::routes())
        .merge(themes::routes())
        .merge(dashboard::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn spawn(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    // Stands in for docs.google.com: one public sheet, everything else 404.
    async fn spawn_sheets_host(export_hits: Arc<AtomicUsize>) -> SocketAddr {
        let sheets = Router::new()
            .route(
                "/spreadsheets/d/PUBLIC/edit",
                get(|| async { "<html><title>Weekly Prices - Google Sheets</title></html>" }),
            )
            .route(
                "/spreadsheets/d/PUBLIC/export",
                get(move || {
                    let hits = export_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "Date ,Close,Volume\n2024-01-01,\"$1,234.50\",1000000\nnot-a-date,1,2\n"
                    }
                }),
            )
            .fallback(|| async { (StatusCode::NOT_FOUND, "missing").into_response() });
        spawn(sheets).await
    }

    async fn spawn_app(sheets_addr: SocketAddr) -> SocketAddr {
        let config = Config {
            sheets_base_url: format!("http://{}", sheets_addr),
            stylesheet_path: "does/not/exist.css".into(),
            ..Config::default()
        };
        let state = Arc::new(AppState::new(config).unwrap());
        spawn(router(state)).await
    }

    #[tokio::test]
    async fn dashboard_end_to_end_over_http() {
        let hits = Arc::new(AtomicUsize::new(0));
        let sheets_addr = spawn_sheets_host(hits.clone()).await;
        let app_addr = spawn_app(sheets_addr).await;
        let client = reqwest::Client::new();
        let endpoint = format!("http://{}/api/dashboard", app_addr);
        let body = json!({
            "url": "https://docs.google.com/spreadsheets/d/PUBLIC/edit#gid=3",
            "palette": "Forest Green",
            "show_table": true,
        });

        let response: Value = client.post(&endpoint).json(&body).send().await.unwrap().json().await.unwrap();
        assert_eq!(response["title"], "Weekly Prices");
        assert_eq!(response["tab_id"], "3");
        assert_eq!(response["row_count"], 1);
        assert_eq!(response["table"][0]["Date"], "2024-01-01");
        assert_eq!(response["table"][0]["Close"], 1234.5);
        assert_eq!(response["table"][0]["Volume"], 1000000.0);
        assert_eq!(response["price_chart"]["mark"]["color"], "#4CAF50");
        assert!(response["volume_chart"].is_object());

        client.post(&endpoint).json(&body).send().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn private_sheet_degrades_to_messages() {
        let sheets_addr = spawn_sheets_host(Arc::new(AtomicUsize::new(0))).await;
        let app_addr = spawn_app(sheets_addr).await;

        let response: Value = reqwest::Client::new()
            .post(format!("http://{}/api/dashboard", app_addr))
            .json(&json!({ "url": "https://docs.google.com/spreadsheets/d/PRIVATE/edit" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(response["title"].is_null());
        let messages: Vec<&str> = response["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["message"].as_str().unwrap())
            .collect();
        assert_eq!(messages[0], "Loading GID `0`...");
        assert!(messages[1].starts_with("Data load error:"));
        assert!(messages[1].contains("404"));
        assert_eq!(messages[2], "Doc title failed. No data loaded. Check URL, sharing, GID, columns.");
    }

    #[tokio::test]
    async fn page_and_health_are_served() {
        let sheets_addr = spawn_sheets_host(Arc::new(AtomicUsize::new(0))).await;
        let app_addr = spawn_app(sheets_addr).await;

        let health = reqwest::get(format!("http://{}/health", app_addr)).await.unwrap();
        assert_eq!(health.text().await.unwrap(), "OK");

        let page = reqwest::get(format!("http://{}/", app_addr)).await.unwrap().text().await.unwrap();
        assert!(page.contains("Stock Data and Style Demo"));
        assert!(page.contains(crate::theme::FALLBACK_CSS));
        assert!(page.contains("does/not/exist.css not found. Applying minimal fallback styles."));

        let palette = reqwest::get(format!("http://{}/api/themes/Plaid", app_addr)).await.unwrap();
        assert_eq!(palette.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
