pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::chat::handlers as chat;
use crate::hr::handlers as hr;
use crate::interview::{handlers as interview, socket};
use crate::jobs::handlers as jobs;
use crate::notifications::handlers as notifications;
use crate::profile::handlers as profile;
use crate::state::AppState;

/// Upper bound for uploaded CV PDFs.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Accounts & profiles
        .route("/auth/register", post(auth::handle_register))
        .route("/auth/login", post(auth::handle_login))
        .route(
            "/profile/:user_id",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        .route(
            "/parse-linkedin",
            post(profile::handle_parse_linkedin).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/parse-resume-text", post(profile::handle_parse_resume_text))
        // Feed
        .route("/jobs/:user_id", get(jobs::handle_get_feed))
        .route("/swipe-right", post(jobs::handle_swipe_right))
        .route("/swipe-left", post(jobs::handle_swipe_left))
        // Applications
        .route("/generate-resume/:app_id", post(applications::handle_generate_resume))
        .route("/dashboard/:user_id", get(applications::handle_dashboard))
        .route(
            "/application/:app_id",
            get(applications::handle_get_application).delete(applications::handle_delete_application),
        )
        .route("/application/:app_id/status", patch(applications::handle_update_status))
        .route("/application/:app_id/notes", put(applications::handle_update_notes))
        .route("/application/:app_id/apply", post(applications::handle_apply))
        .route("/application/:app_id/resume-pdf", get(applications::handle_resume_pdf))
        // AI-HR chat
        .route("/hr-personalities/:company", get(chat::handle_get_personality))
        .route("/chat/:application_id", get(chat::handle_get_history))
        .route("/chat", post(chat::handle_chat))
        // Interviews
        .route("/interview/feedback", post(interview::handle_create_feedback))
        .route(
            "/interview/feedback/:application_id",
            get(interview::handle_list_feedback),
        )
        .route("/ws/interview/:application_id", get(socket::handle_interview_ws))
        // Notifications
        .route("/notifications/:user_id", get(notifications::handle_list_notifications))
        .route("/notifications/:id/read", patch(notifications::handle_mark_read))
        .route(
            "/notifications/read-all/:user_id",
            post(notifications::handle_mark_all_read),
        )
        // HR
        .route("/hr/post-job", post(hr::handle_post_job))
        .route("/hr/my-jobs/:user_id", get(hr::handle_my_jobs))
        .route("/hr/job/:job_id", delete(hr::handle_delete_job))
        .route("/hr/applications/:user_id", get(hr::handle_hr_applications))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::LlmClient;

    fn test_state() -> AppState {
        AppState::for_tests(LlmClient::disabled())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "kanso-api");
    }

    #[tokio::test]
    async fn test_root() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "KansoAI Engine Running");
    }

    #[tokio::test]
    async fn test_chat_without_ai_is_service_unavailable() {
        let app = build_router(test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(format!(
                r#"{{"application_id":"{}","message":"hi"}}"#,
                uuid::Uuid::nil()
            )))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"]["code"], "AI_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_parse_resume_text_needs_no_database() {
        let app = build_router(test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/parse-resume-text")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text":"Jane\nEngineer\nSkills\nRust, Go"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["headline"], "Engineer");
        assert_eq!(json["skills"], serde_json::json!(["Rust", "Go"]));
    }

    #[tokio::test]
    async fn test_status_update_looks_up_application_first() {
        // The pool is unreachable, so reaching the lookup surfaces as a 500.
        let app = build_router(test_state());
        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/application/{}/status?status=archived", uuid::Uuid::nil()))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"]["code"], "DATABASE_ERROR");
    }
}
