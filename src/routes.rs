// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, course, glossary, progress, quiz, tool},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public catalog, glossary and quiz routes.
/// * Learner progress routes behind JWT authentication.
/// * Authoring routes behind authentication plus the admin role.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let course_routes = Router::new()
        .route("/", get(course::list_courses))
        .route("/{id}", get(course::get_course))
        .route("/{id}/lessons", get(course::list_lessons))
        .route("/{id}/lessons/{order_index}", get(course::get_lesson))
        .route("/{id}/quiz", get(quiz::list_course_quiz));

    let glossary_routes = Router::new()
        .route("/", get(glossary::list_terms))
        .route("/search", get(glossary::search_terms))
        .route("/annotate", post(glossary::annotate_content));

    let quiz_routes = Router::new().route("/submit", post(quiz::submit_answer));

    let tool_routes = Router::new()
        .route("/", get(tool::list_tools))
        .route("/{id}", get(tool::get_tool));

    let progress_routes = Router::new()
        .route("/", get(progress::get_progress))
        .route("/glossary-views", post(progress::credit_glossary_view))
        .route(
            "/lessons",
            get(progress::list_lesson_completions).post(progress::record_lesson_completion),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/glossary", post(admin::create_term))
        .route("/glossary/{id}", delete(admin::delete_term))
        .route("/courses", post(admin::create_course))
        .route("/courses/{id}/lessons", post(admin::create_lesson))
        .route("/quiz", post(admin::create_question))
        .route("/tools", post(admin::create_tool))
        // Auth runs first, then the admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/courses", course_routes)
        .nest("/api/glossary", glossary_routes)
        .nest("/api/quiz", quiz_routes)
        .nest("/api/tools", tool_routes)
        .nest("/api/progress", progress_routes)
        .nest("/api/admin", admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
