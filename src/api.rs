//! HTTP API for the tool savings comparator.
//!
//! This module exposes a minimal REST API around the comparator using
//! the [`axum`](https://crates.io/crates/axum) framework.  Clients
//! submit a team size and tool selection and receive the cost
//! comparison in JSON.  The pricing configuration is loaded once and
//! shared read-only across requests.

use crate::catalog::PricingConfig;
use crate::engine::{compare, compare_batch, team_size_sweep};
use crate::error::ComparisonError;
use crate::format::{summarize, UsdFormatter};
use crate::models::{BillingCadence, ComparisonRequest, ComparisonResult};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Application state shared across requests.
pub struct AppState {
    pub config: PricingConfig,
    pub formatter: UsdFormatter,
}

/// A comparison result together with its display summary.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    #[serde(flatten)]
    pub result: ComparisonResult,
    pub summary: String,
}

/// Error body returned for rejected requests.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub field: String,
}

impl From<&ComparisonError> for ErrorBody {
    fn from(err: &ComparisonError) -> Self {
        Self {
            error: err.to_string(),
            field: err.field(),
        }
    }
}

/// One element of a batch response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Ok { ok: CompareResponse },
    Err(ErrorBody),
}

/// Body of POST /api/compare/sweep: one tool selection evaluated at
/// several team sizes.
#[derive(Debug, Deserialize)]
pub struct SweepRequest {
    pub selected_tools: BTreeMap<String, String>,
    pub billing_cadence: BillingCadence,
    pub team_sizes: Vec<i64>,
}

/// Build the API router over the given configuration.
pub fn build_router(config: PricingConfig) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config,
        formatter: UsdFormatter::default(),
    });
    let router = Router::new()
        .route("/api/compare", post(compare_handler))
        .route("/api/compare/batch", post(compare_batch_handler))
        .route("/api/compare/sweep", post(compare_sweep_handler))
        .route("/api/catalog", get(catalog_handler))
        .with_state(state.clone());
    (router, state)
}

fn respond(state: &AppState, result: ComparisonResult) -> CompareResponse {
    let summary = summarize(&result, &state.formatter);
    CompareResponse { result, summary }
}

/// Handler for POST /api/compare
async fn compare_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<ComparisonRequest>,
) -> Response {
    let config = &app_state.config;
    match compare(&request, &config.tools, &config.pricing) {
        Ok(result) => {
            debug!(team_size = result.team_size, "comparison served");
            (StatusCode::OK, Json(respond(&app_state, result))).into_response()
        }
        Err(err) => {
            warn!(error = %err, "rejected comparison request");
            (StatusCode::BAD_REQUEST, Json(ErrorBody::from(&err))).into_response()
        }
    }
}

/// Handler for POST /api/compare/batch
async fn compare_batch_handler(
    State(app_state): State<Arc<AppState>>,
    Json(requests): Json<Vec<ComparisonRequest>>,
) -> Json<Vec<BatchItem>> {
    let config = &app_state.config;
    debug!(count = requests.len(), "batch comparison");
    let outcomes = compare_batch(&requests, &config.tools, &config.pricing);
    Json(batch_items(&app_state, outcomes))
}

/// Handler for POST /api/compare/sweep
async fn compare_sweep_handler(
    State(app_state): State<Arc<AppState>>,
    Json(sweep): Json<SweepRequest>,
) -> Json<Vec<BatchItem>> {
    let config = &app_state.config;
    debug!(count = sweep.team_sizes.len(), "team size sweep");
    let template = ComparisonRequest {
        team_size: 0,
        selected_tools: sweep.selected_tools,
        billing_cadence: sweep.billing_cadence,
    };
    let outcomes = team_size_sweep(&template, &sweep.team_sizes, &config.tools, &config.pricing);
    Json(batch_items(&app_state, outcomes))
}

fn batch_items(
    state: &AppState,
    outcomes: Vec<Result<ComparisonResult, ComparisonError>>,
) -> Vec<BatchItem> {
    outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Ok(result) => BatchItem::Ok {
                ok: respond(state, result),
            },
            Err(err) => BatchItem::Err(ErrorBody::from(&err)),
        })
        .collect()
}

/// Handler for GET /api/catalog
async fn catalog_handler(State(app_state): State<Arc<AppState>>) -> Json<PricingConfig> {
    Json(app_state.config.clone())
}

/// Launch the API server.  Binds to `addr` and blocks until the server
/// terminates.
pub async fn serve(addr: &str, config: PricingConfig) -> Result<()> {
    let (router, _state) = build_router(config);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);
    axum::serve(listener, router)
        .await
        .context("server terminated with an error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(PricingConfig::builtin()).0
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn full_stack(team_size: i64) -> Value {
        json!({
            "team_size": team_size,
            "selected_tools": {
                "email": "superhuman",
                "calendar": "calendly",
                "meeting": "otter",
                "productivity": "notion"
            },
            "billing_cadence": "annual"
        })
    }

    #[tokio::test]
    async fn compare_returns_totals_and_summary() {
        let (status, body) = post_json(app(), "/api/compare", full_stack(50)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_annual_total"], "37600");
        assert_eq!(body["platform_annual_total"], "17700");
        assert_eq!(body["annual_delta"], "19900");
        assert_eq!(body["summary"], "Save $19,900 per year");
    }

    #[tokio::test]
    async fn invalid_team_size_is_a_bad_request() {
        let (status, body) = post_json(app(), "/api/compare", full_stack(0)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "team_size");
    }

    #[tokio::test]
    async fn batch_reports_each_item() {
        let (status, body) =
            post_json(app(), "/api/compare/batch", json!([full_stack(50), full_stack(-5)])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["ok"]["annual_delta"], "19900");
        assert_eq!(body[1]["field"], "team_size");
    }

    #[tokio::test]
    async fn selection_errors_name_the_offending_field() {
        let mut missing = full_stack(5);
        missing["selected_tools"]
            .as_object_mut()
            .unwrap()
            .remove("calendar");
        let (status, body) = post_json(app(), "/api/compare", missing).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "selected_tools.calendar");
        assert_eq!(body["error"], "no tool selected for category `calendar`");

        let mut unrecognized = full_stack(5);
        unrecognized["selected_tools"]["crm"] = json!("hubspot");
        let (status, body) = post_json(app(), "/api/compare", unrecognized).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "selected_tools.crm");
        assert_eq!(body["error"], "unrecognized category `crm`");

        let mut unknown = full_stack(5);
        unknown["selected_tools"]["meeting"] = json!("zoom");
        let (status, body) = post_json(app(), "/api/compare", unknown).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "selected_tools.meeting");
        assert_eq!(body["error"], "unknown tool `zoom` for category `meeting`");
    }

    #[tokio::test]
    async fn sweep_evaluates_each_team_size() {
        let mut sweep = full_stack(0);
        sweep.as_object_mut().unwrap().remove("team_size");
        sweep["team_sizes"] = json!([10, 0, 20]);
        let (status, body) = post_json(app(), "/api/compare/sweep", sweep).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["ok"]["annual_delta"], "3980");
        assert_eq!(body[1]["field"], "team_size");
        assert_eq!(body[2]["ok"]["annual_delta"], "7960");
        assert_eq!(body[2]["ok"]["summary"], "Save $7,960 per year");
    }

    #[tokio::test]
    async fn catalog_lists_tools_and_pricing() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/catalog")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["tools"].as_array().unwrap().len(), 8);
        assert_eq!(body["pricing"]["annual_billing_annual_per_user"], "288");
    }
}
