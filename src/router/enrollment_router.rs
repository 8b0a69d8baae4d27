use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handler::enrollment_handler::{create_enrollment_handler, list_enrollments_handler};
use crate::service::enrollment_service::EnrollmentServiceImpl;

pub fn enrollment_router(service: Arc<EnrollmentServiceImpl>) -> Router {
    Router::new()
        .route("/enrollments", get(list_enrollments_handler).post(create_enrollment_handler))
        .with_state(service)
}
