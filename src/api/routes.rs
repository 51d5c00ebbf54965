use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::api::state::AppState;
use crate::auth;
use crate::config::Config;

pub fn create_router(state: AppState, config: &Config) -> Router {
    let origins: Vec<HeaderValue> = config
        .cors_origin
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let board_routes = Router::new()
        .route(
            "/",
            get(handlers::boards::list_boards).post(handlers::boards::create_board),
        )
        .route(
            "/{id}",
            get(handlers::boards::get_board)
                .patch(handlers::boards::rename_board)
                .delete(handlers::boards::delete_board),
        )
        .route(
            "/{id}/share",
            get(handlers::boards::list_shares)
                .post(handlers::boards::share_board)
                .delete(handlers::boards::unshare_board),
        );

    let column_routes = Router::new()
        .route("/", post(handlers::columns::create_column))
        .route(
            "/{id}",
            patch(handlers::columns::rename_column).delete(handlers::columns::delete_column),
        );

    let card_routes = Router::new()
        .route("/", post(handlers::cards::create_card))
        .route(
            "/{id}",
            get(handlers::cards::get_card)
                .patch(handlers::cards::update_card)
                .delete(handlers::cards::delete_card),
        )
        .route("/{id}/move", patch(handlers::cards::move_card));

    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::liveness))
        .route("/api/users", get(handlers::users::get_user))
        .route("/api/auth/register", post(auth::handlers::register))
        .route("/api/auth/login", post(auth::handlers::login))
        .route("/api/auth/verify", post(auth::handlers::verify_email))
        .route("/api/auth/verified", get(auth::handlers::check_verified))
        .nest("/api/boards", board_routes)
        .nest("/api/columns", column_routes)
        .nest("/api/cards", card_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let serve_dir = ServeDir::new(&config.frontend_dir).not_found_service(
        ServeDir::new(&config.frontend_dir).append_index_html_on_directories(true),
    );

    api_routes.fallback_service(serve_dir)
}
