use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handler::student_handler::{create_student_handler, get_student_handler, list_students_handler};
use crate::service::student_service::StudentServiceImpl;

pub fn student_router(service: Arc<StudentServiceImpl>) -> Router {
    Router::new()
        .route("/students", get(list_students_handler).post(create_student_handler))
        .route("/students/{id}", get(get_student_handler))
        .with_state(service)
}
