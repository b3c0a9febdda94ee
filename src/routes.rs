// src/routes.rs

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{analysis, auth, questions, scores},
    state::AppState,
    utils::jwt::admin_middleware,
};

/// Assembles the main application router.
///
/// * Public routes: login, question asset, answer validation, submit.
/// * Admin routes: reporting and score management, behind the token check.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    // The exam page is served separately and may live on any origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let public_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/questions", get(questions::get_questions))
        .route("/questions/validate", post(questions::validate_answers))
        .route("/submit", post(scores::submit));

    let admin_routes = Router::new()
        .route(
            "/scores",
            get(scores::list_scores).delete(scores::clear_scores),
        )
        .route("/scores/{student_number}", delete(scores::delete_score))
        .route("/scores/{student_number}/details", get(scores::get_details))
        .route("/stats", get(scores::get_stats))
        .route("/analysis/question-stats", get(analysis::question_stats))
        .route("/analysis/class-stats", get(analysis::class_stats))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            admin_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(admin_routes))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
