//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::dashboard: dashboard page, chart partials and JSON data
//! - routes::analysis: generated analysis of the selected range
//! - routes::settings: configuration display
//! - routes::range: month range query and selector

pub mod charts;
pub mod error;
pub mod routes;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json, Redirect},
    routing::{get, post},
    Router,
};
use findash_ai::AnalysisClient;
use findash_config::Config;
use findash_core::Dashboard;
use findash_utils::{escape_html, CurrencyFormat};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<RwLock<Dashboard>>,
    pub config: Config,
    pub currency: CurrencyFormat,
    /// Present when analysis is enabled and an API key was found at start-up
    pub ai: Option<AnalysisClient>,
}

impl AppState {
    pub fn new(config: Config, dashboard: Arc<RwLock<Dashboard>>) -> Self {
        let currency = CurrencyFormat::from(&config.currency);
        let ai = if config.ai.enabled {
            match AnalysisClient::from_config(&config.ai) {
                Ok(client) => Some(client),
                Err(e) => {
                    log::warn!("Analysis disabled until configured: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self { dashboard, config, currency, ai }
    }

    pub fn with_ai(mut self, client: AnalysisClient) -> Self {
        self.ai = Some(client);
        self
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::analysis::{api_analysis, htmx_analysis};
    use routes::dashboard::{
        api_compositions, api_kpis, api_months, api_records, api_summary, htmx_dashboard_content,
        htmx_portfolio, page_dashboard,
    };
    use routes::settings::{api_settings, page_settings};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/months", get(api_months))
        .route("/api/records", get(api_records))
        .route("/api/compositions", get(api_compositions))
        .route("/api/kpis", get(api_kpis))
        .route("/api/summary", get(api_summary))
        .route("/api/analysis", post(api_analysis))
        .route("/api/reload", post(api_reload))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(index_page))
        .route("/dashboard", get(page_dashboard))
        .route("/settings", get(page_settings))
        // HTMX partial routes
        .route("/dashboard/content", get(htmx_dashboard_content))
        .route("/dashboard/portfolio", get(htmx_portfolio))
        .route("/dashboard/analysis", post(htmx_analysis))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let dashboard = state.dashboard.read().await;
    Json(serde_json::json!({
        "status": "ok",
        "loaded": dashboard.is_loaded(),
        "months": dashboard.dataset().map(|d| d.len()).unwrap_or(0),
    }))
}

async fn index_page() -> Redirect {
    Redirect::to("/dashboard")
}

/// Reload dataset API endpoint
async fn api_reload(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    if !state.config.data.allow_reload {
        return Err(ApiError::BadRequest { message: "Reloading is disabled".to_string() });
    }

    let mut dashboard = state.dashboard.write().await;
    dashboard.reload().await?;
    let months = dashboard.dataset().map(|d| d.len()).unwrap_or(0);
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Reloaded {} months", months),
    })))
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Findash</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [("/dashboard", "Dashboard"), ("/settings", "Settings")];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-blue-700'>Findash</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label) in &links {
        let active_class = if current_path.starts_with(path) {
            "bg-blue-50 text-blue-700"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'><span>{}</span></a></li>"#,
            path, active_class, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Check if request is from HTMX (partial page update)
fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(
    headers: &HeaderMap,
    title: &str,
    current_path: &str,
    inner_content: &str,
) -> String {
    if is_htmx_request(headers) {
        format!(
            r#"<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>"#,
            inner_content
        )
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-56 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path), inner_content))
    }
}

/// Start the HTTP server
pub async fn start_server(config: Config, dashboard: Arc<RwLock<Dashboard>>) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let state = AppState::new(config, dashboard);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Findash server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /dashboard (Dashboard)");
    log::info!("  - /settings (Configuration)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(sample_state().await, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["loaded"], true);
        assert_eq!(json["months"], 12);
    }

    #[tokio::test]
    async fn test_index_redirects() {
        let (status, _) = get(sample_state().await, "/").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_reload() {
        let (status, body) = post(sample_state().await, "/api/reload").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Reloaded 12 months"));

        let mut state = sample_state().await;
        state.config.data.allow_reload = false;
        let (status, _) = post(state, "/api/reload").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_page_response_partial() {
        let mut headers = axum::http::HeaderMap::new();
        let full = super::page_response(&headers, "Dashboard", "/dashboard", "<p>x</p>");
        assert!(full.starts_with("<!DOCTYPE html>"));
        assert!(full.contains("bg-blue-50 text-blue-700"));

        headers.insert("hx-request", "true".parse().unwrap());
        let partial = super::page_response(&headers, "Dashboard", "/dashboard", "<p>x</p>");
        assert!(!partial.contains("<html"));
        assert!(partial.contains("<p>x</p>"));
    }
}
