use crate::intake::IntakeService;
use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use entourage_core::SignupOutcome;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<IntakeService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/waitlist", post(join_waitlist))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn join_waitlist(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response<Body> {
    let outcome = match body {
        Ok(body) => state.intake.submit(&body).await,
        Err(rejection) => {
            error!(error = %rejection, "failed to read signup request body");
            SignupOutcome::Unexpected
        }
    };
    outcome_response(outcome)
}

fn outcome_response(outcome: SignupOutcome) -> Response<Body> {
    let status =
        StatusCode::from_u16(outcome.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(outcome.response())).into_response()
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    error!("waitlist handler panicked");
    outcome_response(SignupOutcome::Unexpected)
}

#[cfg(test)]
mod tests {
    use super::{router, AppState};
    use crate::intake::tests::{memory_sink, template, RecordingNotifier};
    use crate::intake::IntakeService;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use entourage_notify::Notifier;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(notifier: Option<Arc<RecordingNotifier>>) -> Router {
        let notifier = notifier.map(|notifier| notifier as Arc<dyn Notifier>);
        let intake = IntakeService::new(memory_sink(), notifier, template());
        router(AppState {
            intake: Arc::new(intake),
        })
    }

    async fn post_json(app: &Router, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/waitlist")
            .header("content-type", "application/json")
            .body(body.into())
            .expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    #[tokio::test]
    async fn missing_email_is_bad_request() {
        let app = app(None);
        let (status, body) = post_json(&app, json!({"name": "John"}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Email is required"}));
    }

    #[tokio::test]
    async fn invalid_email_is_bad_request() {
        let app = app(None);
        let (status, body) = post_json(&app, json!({"email": "not-an-email"}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid email format"}));
    }

    #[tokio::test]
    async fn join_then_duplicate() {
        let notifier = Arc::new(RecordingNotifier::default());
        let app = app(Some(Arc::clone(&notifier)));

        let (status, body) =
            post_json(&app, json!({"email": "user@example.com"}).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Successfully joined the waitlist!"}));

        let (status, body) =
            post_json(&app, json!({"email": "USER@example.com"}).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "You are already on the waitlist!"}));
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn failing_notifier_still_returns_success() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let app = app(Some(Arc::clone(&notifier)));
        let (status, body) =
            post_json(&app, json!({"email": "user@example.com"}).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Successfully joined the waitlist!");
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_server_error() {
        let app = app(None);
        let (status, body) = post_json(&app, "{\"email\":").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Something went wrong"}));
    }

    #[tokio::test]
    async fn array_email_is_server_error() {
        let app = app(None);
        let (status, body) = post_json(&app, json!({"email": ["a@b.co"]}).to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Something went wrong"}));

        let (status, body) = post_json(&app, json!({"email": ["a", "b"]}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid email format"}));
    }

    #[tokio::test]
    async fn byte_order_mark_email_is_bad_request() {
        let app = app(None);
        let (status, body) =
            post_json(&app, json!({"email": "\u{FEFF}user@example.com"}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid email format"}));
    }

    #[tokio::test]
    async fn content_type_is_not_required() {
        let app = app(None);
        let request = Request::builder()
            .method("POST")
            .uri("/api/waitlist")
            .body(Body::from(json!({"email": "user@example.com"}).to_string()))
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_check() {
        let app = app(None);
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert_eq!(&bytes[..], b"OK");
    }
}
