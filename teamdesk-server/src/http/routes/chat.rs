//! AI chat assistant endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use teamdesk_core::models::{required_text, MAX_LONG_TEXT};

use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /chat - forward the query to the model
async fn chat(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let query = required_text("query", req.query.as_deref().unwrap_or_default(), MAX_LONG_TEXT)?;
    let reply = state.chat.send(&query).await?;
    Ok(Json(ChatResponse { reply }))
}

/// Chat routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

#[cfg(test)]
mod tests {
    use crate::http::test_support::{app, app_with, post, StubChat};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn reply_from_model() {
        let stub = StubChat::replying("Your top lead is Sarah Lee.");
        let (status, json) = post(
            app_with(stub.clone()),
            "/api/chat",
            json!({ "query": "  Who is my top lead?  " }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reply"], "Your top lead is Sarah Lee.");
        assert_eq!(*stub.prompts.lock().unwrap(), vec!["Who is my top lead?"]);
    }

    #[tokio::test]
    async fn empty_query_is_400() {
        let (status, json) = post(app(), "/api/chat", json!({ "query": "   " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"], "query cannot be empty");
    }

    #[tokio::test]
    async fn model_failure_is_500() {
        let (status, json) = post(
            app_with(StubChat::replying("")),
            "/api/chat",
            json!({ "query": "hello" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["details"], "GEMINI_API_KEY is not set");
    }
}
