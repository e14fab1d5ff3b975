// Bike Sharing Dashboard - Web Server
// HTML dashboard + JSON API with Axum

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use bike_dashboard::{
    load_csv, logging, parse_date_param, Dashboard, DashboardConfig, DateRange, RentalRecord,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state. The dashboard is immutable, so no lock is needed.
#[derive(Clone)]
struct AppState {
    dashboard: Arc<Dashboard>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD`, both optional
#[derive(Debug, Default, Deserialize)]
struct RangeQuery {
    start: Option<String>,
    end: Option<String>,
}

impl RangeQuery {
    /// Missing bounds default to the dataset span
    fn resolve(&self, full: DateRange) -> Result<DateRange, String> {
        let parse = |value: &Option<String>, fallback: NaiveDate, name: &str| match value
            .as_deref()
            .filter(|v| !v.is_empty())
        {
            None => Ok(fallback),
            Some(raw) => parse_date_param(raw)
                .ok_or_else(|| format!("invalid {} date {:?}, expected YYYY-MM-DD", name, raw)),
        };

        Ok(DateRange::new(
            parse(&self.start, full.start, "start")?,
            parse(&self.end, full.end, "end")?,
        ))
    }
}

#[derive(Serialize)]
struct RangeResponse {
    min_date: NaiveDate,
    max_date: NaiveDate,
    days: usize,
}

fn bad_request(message: String) -> Response {
    tracing::debug!(%message, "rejected request");
    (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::err(message))).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/range - Dataset date bounds for the picker
async fn get_range(State(state): State<AppState>) -> impl IntoResponse {
    let dataset = state.dashboard.dataset();
    Json(ApiResponse::ok(RangeResponse {
        min_date: dataset.min_date(),
        max_date: dataset.max_date(),
        days: dataset.len(),
    }))
}

/// GET /api/dashboard - All chart groups for a range
async fn get_dashboard(State(state): State<AppState>, Query(query): Query<RangeQuery>) -> Response {
    match query.resolve(state.dashboard.full_range()) {
        Ok(range) => {
            let view = state.dashboard.render(range);
            (StatusCode::OK, Json(ApiResponse::ok(view))).into_response()
        }
        Err(message) => bad_request(message),
    }
}

/// GET /api/records - Filtered daily rows
async fn get_records(State(state): State<AppState>, Query(query): Query<RangeQuery>) -> Response {
    let dashboard = &state.dashboard;
    match query.resolve(dashboard.full_range()) {
        Ok(range) => {
            let range = range.clamp_to(dashboard.dataset().min_date(), dashboard.dataset().max_date());
            let records: Vec<RentalRecord> = dashboard.dataset().filter(&range).records().to_vec();
            (StatusCode::OK, Json(ApiResponse::ok(records))).into_response()
        }
        Err(message) => bad_request(message),
    }
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/range", get(get_range))
        .route("/dashboard", get(get_dashboard))
        .route("/records", get(get_records))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing("bike-server");

    let config = DashboardConfig::from_env().context("Failed to load configuration")?;
    let dataset = load_csv(&config.data_path)
        .with_context(|| format!("Failed to load dataset {}", config.data_path.display()))?;

    let addr = config.bind_addr.clone();
    let state = AppState {
        dashboard: Arc::new(Dashboard::new(dataset, config)),
    };

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, "server running");
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/dashboard", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use bike_dashboard::Dataset;
    use tower::ServiceExt;

    const CSV: &str = "dteday,season,weathersit,holiday,workingday,casual,cnt\n\
                       2011-01-01,1,2,0,0,331,985\n\
                       2011-01-02,1,2,0,0,131,801\n\
                       2011-01-03,1,1,0,1,120,1349";

    fn test_router() -> Router {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        router(AppState {
            dashboard: Arc::new(Dashboard::new(dataset, DashboardConfig::default())),
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = test_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_dashboard_rejects_bad_date() {
        let (status, body) = get_json("/api/dashboard?start=bad").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("invalid start date"));
    }

    #[tokio::test]
    async fn test_dashboard_inverted_range_is_empty() {
        let (status, body) = get_json("/api/dashboard?start=2013-05-01&end=2013-01-01").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["summary"]["days"], 0);
        assert_eq!(body["data"]["groups"].as_array().unwrap().len(), 4);
        assert!(body["data"]["groups"]
            .as_array()
            .unwrap()
            .iter()
            .all(|g| g["status"] == "rendered"));
    }

    #[tokio::test]
    async fn test_dashboard_full_range_by_default() {
        let (status, body) = get_json("/api/dashboard").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["summary"]["days"], 3);
        assert_eq!(body["data"]["range"]["start"], "2011-01-01");
        assert_eq!(body["data"]["range"]["end"], "2011-01-03");
    }

    #[tokio::test]
    async fn test_range_returns_dataset_bounds() {
        let (status, body) = get_json("/api/range").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["min_date"], "2011-01-01");
        assert_eq!(body["data"]["max_date"], "2011-01-03");
        assert_eq!(body["data"]["days"], 3);
    }

    #[tokio::test]
    async fn test_records_inverted_range_is_empty() {
        let (status, body) = get_json("/api/records?start=2010-05-01&end=2010-01-01").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    fn full() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2012, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_missing_bounds_default_to_full_range() {
        let query = RangeQuery {
            start: Some("2011-06-01".into()),
            end: None,
        };
        let range = query.resolve(full()).unwrap();

        assert_eq!(range.start, NaiveDate::from_ymd_opt(2011, 6, 1).unwrap());
        assert_eq!(range.end, full().end);
        assert_eq!(RangeQuery::default().resolve(full()).unwrap(), full());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let query = RangeQuery {
            start: Some("June 1st".into()),
            end: None,
        };
        let err = query.resolve(full()).unwrap_err();
        assert!(err.contains("invalid start date"));
    }
}
