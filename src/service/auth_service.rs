use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument, warn};

use crate::dto::auth_dto::{AuthResponse, LoginRequest, RefreshTokenRequest};
use crate::dto::student_dto::{NewStudentRequest, StudentResponse};
use crate::model::Student;
use crate::repository::student_repo::StudentRepository;
use crate::service::student_service::{store_student, validate_new_student};
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl, TokenPair};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};
use crate::util::validation::{self, FieldError, FieldErrorKind, FieldErrors};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ServiceError> {
    value.ok_or_else(|| ServiceError::Validation(FieldError::new(field, FieldErrorKind::Missing).into()))
}

/// Normalized email and raw password of a login attempt. The email goes
/// through the same normalization as registration, so anything registration
/// stored can be looked up again.
pub fn validate_login(request: &LoginRequest) -> Result<(String, &str), FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = errors.check(validation::email("email", request.email.as_deref()));
    let password = match request.password.as_deref() {
        None => {
            errors.push(FieldError::new("password", FieldErrorKind::Missing));
            None
        }
        Some("") => {
            errors.push(FieldError::new("password", FieldErrorKind::Empty));
            None
        }
        Some(p) => Some(p),
    };
    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok((email, password)),
        _ => Err(errors),
    }
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, request: NewStudentRequest) -> Result<AuthResponse, ServiceError>;
    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ServiceError>;
    async fn refresh_token(&self, request: RefreshTokenRequest) -> Result<TokenPair, ServiceError>;
}

pub struct AuthServiceImpl {
    pub student_repo: Arc<dyn StudentRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl AuthServiceImpl {
    pub fn new(student_repo: Arc<dyn StudentRepository>, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        Self { student_repo, jwt_utils }
    }

    fn issue_tokens(&self, student: &Student) -> Result<TokenPair, ServiceError> {
        let id = student
            .id
            .ok_or_else(|| ServiceError::InternalError("Stored student has no id".to_string()))?;
        self.jwt_utils
            .generate_token_pair(&id.to_hex(), &student.email, student.role)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    #[instrument(skip(self, request))]
    async fn register(&self, request: NewStudentRequest) -> Result<AuthResponse, ServiceError> {
        info!("Registering new user");
        let validated = validate_new_student(&request)?;
        let student = store_student(self.student_repo.as_ref(), validated).await?;
        let tokens = self.issue_tokens(&student)?;
        info!(id = ?student.id, "User registered");
        Ok(AuthResponse { user: StudentResponse::from(student), tokens })
    }

    #[instrument(skip(self, request))]
    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ServiceError> {
        let (email, password) = validate_login(&request)?;
        info!(email = %email, "User login attempt");

        let Some(student) = self.student_repo.find_by_email(&email).await? else {
            warn!(email = %email, "Login for unknown email");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let valid = PasswordUtilsImpl::verify_password(password, &student.password_hash).map_err(|e| {
            error!("Stored password hash unusable: {}", e);
            ServiceError::InternalError(format!("Password verify error: {}", e))
        })?;
        if !valid {
            warn!(email = %email, "Invalid password");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let tokens = self.issue_tokens(&student)?;
        info!("User logged in successfully");
        Ok(AuthResponse { user: StudentResponse::from(student), tokens })
    }

    #[instrument(skip(self, request))]
    async fn refresh_token(&self, request: RefreshTokenRequest) -> Result<TokenPair, ServiceError> {
        info!("Refreshing token");
        let claims = self
            .jwt_utils
            .validate_refresh_token(required("refresh_token", request.refresh_token.as_deref())?)
            .map_err(|e| ServiceError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        // Tokens of deleted users stop refreshing.
        let id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Invalid refresh token subject".to_string()))?;
        let student = self
            .student_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("User no longer exists".to_string()))?;

        self.issue_tokens(&student)
    }
}
