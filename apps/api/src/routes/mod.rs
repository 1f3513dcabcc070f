pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis session
        .route("/api/v1/analysis/text", post(handlers::handle_submit_text))
        .route(
            "/api/v1/analysis/upload",
            // The "Max 5MB" hint shown to users is advisory; nothing enforces it.
            post(handlers::handle_upload).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/api/v1/analysis/current",
            get(handlers::handle_current).delete(handlers::handle_reset),
        )
        .route(
            "/api/v1/analysis/current/humanize",
            post(handlers::handle_humanize),
        )
        .route(
            "/api/v1/analysis/current/download",
            get(handlers::handle_download),
        )
        // History
        .route("/api/v1/history", get(handlers::handle_history))
        .route(
            "/api/v1/history/:id",
            get(handlers::handle_select_history).delete(handlers::handle_delete_history),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::MockAnalyzer;
    use crate::session::storage::MemoryStorage;
    use crate::session::{AnalysisController, SessionStore};

    const BOUNDARY: &str = "resume-guard-boundary";

    async fn app() -> Router {
        let store = SessionStore::load(Arc::new(MemoryStorage::new()), None).await;
        let controller = AnalysisController::new(Arc::new(MockAnalyzer::instant(21)), store);
        build_router(AppState {
            controller: Arc::new(controller),
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn multipart_upload(file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        Request::post("/api/v1/analysis/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = send_json(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_short_paste_is_bad_request() {
        let app = app().await;
        let (status, body) = send_json(
            &app,
            post_json("/api/v1/analysis/text", json!({ "text": "too short" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "TEXT_TOO_SHORT");
    }

    #[tokio::test]
    async fn test_paste_flow_populates_history() {
        let app = app().await;
        let text = "b".repeat(600);
        let (status, result) = send_json(
            &app,
            post_json("/api/v1/analysis/text", json!({ "text": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["aiProbability"], 40);
        assert_eq!(result["humanProbability"], 60);
        assert_eq!(result["fileName"], "Manual Entry");
        assert_eq!(result["suggestions"].as_array().unwrap().len(), 3);

        let (_, history) = send_json(&app, get("/api/v1/history")).await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["id"], result["id"]);
        assert_eq!(history[0]["aiScore"], 40);

        let (_, snapshot) = send_json(&app, get("/api/v1/analysis/current")).await;
        assert_eq!(snapshot["phase"], "ready");
        assert_eq!(snapshot["isAnalyzing"], false);
    }

    #[tokio::test]
    async fn test_upload_txt_then_humanize_and_download() {
        let app = app().await;
        let text = "c".repeat(600);
        let (status, result) = send_json(
            &app,
            multipart_upload("resume.txt", "text/plain", text.as_bytes()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["fileName"], "resume.txt");
        assert_eq!(result["aiProbability"], 40);

        let (status, humanized) = send_json(
            &app,
            Request::post("/api/v1/analysis/current/humanize")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(humanized["aiProbability"], 5);
        assert_eq!(humanized["humanProbability"], 95);

        let (_, history) = send_json(&app, get("/api/v1/history")).await;
        assert_eq!(history[0]["aiScore"], 5);

        let response = app
            .clone()
            .oneshot(get("/api/v1/analysis/current/download?view=humanized"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("resume_humanized_"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            std::str::from_utf8(&body).unwrap(),
            humanized["humanizedText"].as_str().unwrap()
        );
    }

    #[tokio::test]
    async fn test_upload_unsupported_type() {
        let app = app().await;
        let (status, body) = send_json(
            &app,
            multipart_upload("data.json", "application/json", b"{\"a\":1}"),
        )
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_TYPE");

        let (_, history) = send_json(&app, get("/api/v1/history")).await;
        assert!(history.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_corrupt_pdf() {
        let app = app().await;
        let (status, body) =
            send_json(&app, multipart_upload("cv.pdf", "application/pdf", b"nope")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "PDF_UNREADABLE");
    }

    #[tokio::test]
    async fn test_humanize_without_analysis_is_not_found() {
        let app = app().await;
        let (status, body) = send_json(
            &app,
            Request::post("/api/v1/analysis/current/humanize")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NO_ACTIVE_ANALYSIS");
    }

    #[tokio::test]
    async fn test_reset_select_and_delete_history() {
        let app = app().await;
        let (_, result) = send_json(
            &app,
            post_json("/api/v1/analysis/text", json!({ "text": "d".repeat(80) })),
        )
        .await;
        let id = result["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Request::delete("/api/v1/analysis/current")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, snapshot) = send_json(&app, get("/api/v1/analysis/current")).await;
        assert_eq!(snapshot["phase"], "idle");

        let (status, selection) = send_json(&app, get(&format!("/api/v1/history/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(selection["fullReportAvailable"], false);
        assert_eq!(selection["item"]["id"], id);

        let (status, _) = send(
            &app,
            Request::delete(format!("/api/v1/history/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send_json(&app, get(&format!("/api/v1/history/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
