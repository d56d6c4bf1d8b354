//! HTTP surface for the journal.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `GET /api/entry-types`: Configured categories
//! - `POST /api/entries`: Submit free text (`{"content": "...", "type": "journal"}`).
//!   Processing happens in the background; the response only acknowledges it.
//! - `GET /api/entries?type=journal`: Full document text of a category
//!
//! Authentication is not handled here; deploy behind an authenticating proxy.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::journal::{Journal, ProcessOutcome};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    journal: Arc<Journal>,
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

fn error_response(status: StatusCode, error: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error,
            message: message.into(),
        }),
    )
        .into_response()
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// One category in the entry type listing
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EntryTypeInfo {
    pub id: String,
    pub title: String,
}

async fn entry_types(State(state): State<AppState>) -> Json<Vec<EntryTypeInfo>> {
    Json(
        state
            .journal
            .registry()
            .categories()
            .iter()
            .map(|c| EntryTypeInfo {
                id: c.id.clone(),
                title: c.title.clone(),
            })
            .collect(),
    )
}

/// Entry submission body
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub content: String,
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
}

/// Status body for accepted submissions
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
}

async fn create_entry(State(state): State<AppState>, Json(req): Json<EntryRequest>) -> Response {
    if req.content.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "empty_content", "Entry content is required");
    }

    let category = req
        .entry_type
        .unwrap_or_else(|| state.journal.registry().default_category().id.clone());
    let journal = state.journal.clone();

    tokio::spawn(async move {
        tracing::info!("Processing {} entry ({} bytes)", category, req.content.len());
        match journal.process(&category, &req.content).await {
            Ok(ProcessOutcome::Saved(report)) => {
                tracing::info!("Entry saved to {}", report.path.display())
            }
            Ok(ProcessOutcome::Skipped) => {}
            Err(e) => tracing::error!("Error processing entry: {}", e),
        }
    });

    (StatusCode::OK, Json(StatusResponse { status: "created" })).into_response()
}

/// Query for reading a document
#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
}

async fn get_entries(State(state): State<AppState>, Query(query): Query<EntriesQuery>) -> Response {
    let category = query
        .entry_type
        .unwrap_or_else(|| state.journal.registry().default_category().id.clone());

    match state.journal.read(&category).await {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error reading {} entries: {}", category, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "read_failed",
                "Failed to read entries",
            )
        }
    }
}

/// Builds the application router.
pub fn router(journal: Arc<Journal>) -> Router {
    let state = AppState { journal };

    Router::new()
        .route("/health", get(health))
        .route("/api/entry-types", get(entry_types))
        .route("/api/entries", get(get_entries).post(create_entry))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryRegistry;
    use crate::engine::Dialect;
    use crate::store::DocumentStore;
    use crate::summarizer::{SummarizeError, Summarizer};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use futures::future::BoxFuture;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct FixedSummarizer;

    impl Summarizer for FixedSummarizer {
        fn complete<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, SummarizeError>> {
            Box::pin(async { Ok("```json\n{\"summary\": \"standup notes\"}\n```".to_string()) })
        }
    }

    fn setup() -> (Arc<Journal>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path(), Dialect::Markdown);
        let journal = Journal::new(CategoryRegistry::builtin(), store, Dialect::Markdown)
            .with_summarizer(Arc::new(FixedSummarizer));
        (Arc::new(journal), temp_dir)
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (journal, _temp) = setup();
        let response = router(journal)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_entry_types() {
        let (journal, _temp) = setup();
        let response = router(journal)
            .oneshot(Request::get("/api/entry-types").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let types: Vec<EntryTypeInfo> = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            types,
            vec![
                EntryTypeInfo {
                    id: "journal".to_string(),
                    title: "Journal".to_string()
                },
                EntryTypeInfo {
                    id: "notes".to_string(),
                    title: "Notes".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_get_entries_missing_document_is_empty() {
        let (journal, _temp) = setup();
        let response = router(journal)
            .oneshot(
                Request::get("/api/entries?type=notes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_get_entries_storage_failure_is_500() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path(), Dialect::Markdown);
        // A directory where the document file should be.
        std::fs::create_dir(temp_dir.path().join("journal.md")).unwrap();
        let journal = Arc::new(Journal::new(
            CategoryRegistry::builtin(),
            store,
            Dialect::Markdown,
        ));

        let response = router(journal)
            .oneshot(Request::get("/api/entries").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_entry_rejects_empty_content() {
        let (journal, _temp) = setup();
        let response = router(journal)
            .oneshot(
                Request::post("/api/entries")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"content": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_entry_acknowledges_then_saves() {
        let (journal, temp) = setup();
        let response = router(journal.clone())
            .oneshot(
                Request::post("/api/entries")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"content": "talked about the release", "type": "notes"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"status":"created"}"#);

        // Processing runs in the background.
        let path = temp.path().join("notes.md");
        for _ in 0..100 {
            if path.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        let text = journal.read("notes").await.unwrap();
        assert!(text.contains("### Summary\n\nstandup notes\n"));
        assert!(text.contains("### Raw Input\n\ntalked about the release\n"));
    }
}
