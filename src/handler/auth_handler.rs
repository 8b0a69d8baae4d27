use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, RefreshTokenRequest};
use crate::dto::student_dto::NewStudentRequest;
use crate::service::auth_service::{AuthService, AuthServiceImpl};
use crate::util::error::{HandlerError, ServiceError};
use crate::util::validation::FieldErrors;

fn validate_payload(payload: &impl Validate) -> Result<(), HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::from(ServiceError::Validation(FieldErrors::from(e))))
}

// Register
pub async fn register_handler(
    State(service): State<Arc<AuthServiceImpl>>,
    Json(payload): Json<NewStudentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let res = service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

// Login
pub async fn login_handler(
    State(service): State<Arc<AuthServiceImpl>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    Ok(Json(service.login(payload).await?))
}

// Refresh Token
pub async fn refresh_token_handler(
    State(service): State<Arc<AuthServiceImpl>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    Ok(Json(service.refresh_token(payload).await?))
}
