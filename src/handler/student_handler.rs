use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::dto::student_dto::NewStudentRequest;
use crate::handler::parse_path_id;
use crate::service::student_service::{StudentService, StudentServiceImpl};
use crate::util::error::HandlerError;

// Create
pub async fn create_student_handler(
    State(service): State<Arc<StudentServiceImpl>>,
    Json(payload): Json<NewStudentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let student = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

// List
pub async fn list_students_handler(
    State(service): State<Arc<StudentServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list().await?))
}

// Get by id
pub async fn get_student_handler(
    State(service): State<Arc<StudentServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_path_id(&id)?;
    Ok(Json(service.get(&id).await?))
}
