use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use crate::handler::auth_handler::{login_handler, refresh_token_handler, register_handler};
use crate::middlewares::rate_limit_middleware::rate_limit;
use crate::service::auth_service::AuthServiceImpl;
use crate::util::rate_limiter::FixedWindowRateLimiter;

/// `/api/auth/*`. All routes share one limiter.
pub fn auth_router(service: Arc<AuthServiceImpl>, limiter: Arc<FixedWindowRateLimiter>) -> Router {
    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/refresh-token", post(refresh_token_handler))
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit))
        .with_state(service)
}
