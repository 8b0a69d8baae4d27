use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::dto::course_dto::NewCourseRequest;
use crate::handler::parse_path_id;
use crate::service::course_service::{CourseService, CourseServiceImpl};
use crate::util::error::HandlerError;

// Create
pub async fn create_course_handler(
    State(service): State<Arc<CourseServiceImpl>>,
    Json(payload): Json<NewCourseRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let course = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

// List
pub async fn list_courses_handler(
    State(service): State<Arc<CourseServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list().await?))
}

// Get by id, instructor populated
pub async fn get_course_handler(
    State(service): State<Arc<CourseServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id)?;
    Ok(Json(service.get(&id).await?))
}

// Delete with enrollments
pub async fn delete_course_handler(
    State(service): State<Arc<CourseServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id)?;
    Ok(Json(service.delete(&id).await?))
}

// Enrollments of one course
pub async fn list_course_enrollments_handler(
    State(service): State<Arc<CourseServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id)?;
    Ok(Json(service.list_enrollments(&id).await?))
}
