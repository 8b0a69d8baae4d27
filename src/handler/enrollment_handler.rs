use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::dto::enrollment_dto::NewEnrollmentRequest;
use crate::service::enrollment_service::{EnrollmentService, EnrollmentServiceImpl};
use crate::util::error::HandlerError;

pub async fn create_enrollment_handler(
    State(service): State<Arc<EnrollmentServiceImpl>>,
    Json(payload): Json<NewEnrollmentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let enrollment = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn list_enrollments_handler(
    State(service): State<Arc<EnrollmentServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list().await?))
}
