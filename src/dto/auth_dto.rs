use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::student_dto::StudentResponse;
use crate::util::jwt::TokenPair;

/// Fields are optional so a missing one is reported like any other invalid
/// field. The email is checked after normalization, in the service.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(required)]
    pub email: Option<String>,
    #[validate(required, length(min = 1, max = 128))]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(required, length(min = 10))]
    pub refresh_token: Option<String>,
}

/// Registration and login result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: StudentResponse,
    pub tokens: TokenPair,
}
