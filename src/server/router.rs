//! Router builder for the course library routes

use crate::server::handlers::{
    AppState, get_author, get_course_for_author, get_root, list_authors, list_courses_for_author,
};
use axum::{Router, routing::get};

/// Build the read-only API routes
///
/// - GET /api - Root links
/// - GET /api/authors - Paged, sorted, shaped author collection
/// - GET /api/authors/{authorId} - Single author
/// - GET /api/authors/{authorId}/courses - Courses of an author
/// - GET /api/authors/{authorId}/courses/{courseId} - Single course
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api", get(get_root))
        .route("/api/authors", get(list_authors))
        .route("/api/authors/{authorId}", get(get_author))
        .route(
            "/api/authors/{authorId}/courses",
            get(list_courses_for_author),
        )
        .route(
            "/api/authors/{authorId}/courses/{courseId}",
            get(get_course_for_author),
        )
        .with_state(state)
}
