use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handler::course_handler::{
    create_course_handler, delete_course_handler, get_course_handler, list_course_enrollments_handler,
    list_courses_handler,
};
use crate::service::course_service::CourseServiceImpl;

pub fn course_router(service: Arc<CourseServiceImpl>) -> Router {
    Router::new()
        .route("/courses", get(list_courses_handler).post(create_course_handler))
        .route("/courses/{id}", get(get_course_handler).delete(delete_course_handler))
        .route("/courses/{id}/enrollments", get(list_course_enrollments_handler))
        .with_state(service)
}
