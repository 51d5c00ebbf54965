use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use kanban_board::api::{create_router, AppState};
use kanban_board::auth::VerificationStore;
use kanban_board::config::Config;
use kanban_board::services::Mailer;

/// In-memory database with the real migrations applied. A single
/// connection keeps every query on the same in-memory instance.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Router wired like production, minus a configured email provider: the
/// empty API key turns every send into a logged no-op.
pub fn test_app(pool: SqlitePool) -> Router {
    test_app_with_verification(pool).0
}

/// Same as `test_app`, but hands back the verification store so tests can
/// mint tokens without scraping outbound email.
pub fn test_app_with_verification(pool: SqlitePool) -> (Router, Arc<VerificationStore>) {
    let config = Config::default();
    let mailer = Mailer::new(reqwest::Client::new(), &config);
    let verification = Arc::new(VerificationStore::new(Duration::from_secs(3600)));
    let state = AppState::new(
        Some(pool),
        mailer,
        Arc::clone(&verification),
        Arc::new(config.clone()),
    );

    (create_router(state, &config), verification)
}

pub async fn make_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, String) {
    let mut request = Request::builder().uri(uri).method(method);

    if body.is_some() {
        request = request.header("content-type", "application/json");
    }

    let request = request
        .body(Body::from(body.unwrap_or_default()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_str = String::from_utf8(body.to_vec()).unwrap();

    (status, body_str)
}
