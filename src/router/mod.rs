pub mod auth_router;
pub mod course_router;
pub mod enrollment_router;
pub mod student_router;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handler::health_handler::health_handler;
use crate::service::Services;
use crate::util::rate_limiter::FixedWindowRateLimiter;

use auth_router::auth_router;
use course_router::course_router;
use enrollment_router::enrollment_router;
use student_router::student_router;

/// The full HTTP surface.
pub fn create_router(services: Services, auth_limiter: Arc<FixedWindowRateLimiter>) -> Router {
    Router::new()
        .merge(student_router(services.students))
        .merge(course_router(services.courses))
        .merge(enrollment_router(services.enrollments))
        .merge(auth_router(services.auth, auth_limiter))
        .route("/health", get(health_handler))
}
