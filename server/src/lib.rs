use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use engine::corpus::{self, page_details};
use engine::{DocId, SearchEngine, SearchOutcome, Snapshot};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SearchResponse {
    Success {
        query: String,
        took_s: f64,
        results: Vec<SearchHit>,
    },
    NoMatch {
        query: String,
        took_s: f64,
        suggestions: Vec<String>,
    },
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub title: String,
    pub url: Option<String>,
    pub snippet: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub pages_dir: PathBuf,
    pub admin_token: Option<String>,
}

pub fn build_app(engine: Arc<SearchEngine>, pages_dir: PathBuf) -> Router {
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let state = AppState { engine, pages_dir, admin_token };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/rebuild", post(rebuild_handler))
        .with_state(state)
        .layer(cors)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let outcome = state.engine.search(&params.q);
    let resp = match outcome {
        SearchOutcome::Success { results } => {
            let snapshot = state.engine.snapshot();
            let hits = results
                .into_iter()
                .map(|hit| decorate(&snapshot, hit.doc_id, hit.score))
                .collect();
            SearchResponse::Success {
                query: params.q,
                took_s: start.elapsed().as_secs_f64(),
                results: hits,
            }
        }
        SearchOutcome::NoMatch { suggestions } => SearchResponse::NoMatch {
            query: params.q,
            took_s: start.elapsed().as_secs_f64(),
            suggestions,
        },
    };
    Json(resp)
}

fn decorate(snapshot: &Snapshot, doc_id: DocId, score: f64) -> SearchHit {
    let (title, url, snippet) = match snapshot.document(doc_id) {
        Some(doc) => {
            let details = page_details(&doc.text);
            let snippet: String = doc.text.chars().take(200).collect();
            (details.title, details.url, Some(snippet))
        }
        None => (String::new(), None, None),
    };
    SearchHit { doc_id, score, title, url, snippet }
}

/// Reload the on-disk corpus and swap in a fresh snapshot. Guarded by the
/// same admin-token header scheme as the rest of the admin surface.
async fn rebuild_handler(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let corpus = corpus::load_corpus(&state.pages_dir)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    let num_docs = corpus.len();
    state.engine.rebuild(corpus);
    Ok(Json(serde_json::json!({ "num_docs": num_docs })))
}

fn authorize(state: &AppState, headers: &axum::http::HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
