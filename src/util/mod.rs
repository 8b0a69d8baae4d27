pub mod error;
pub mod jwt;
pub mod logger;
pub mod password;
pub mod rate_limiter;
pub mod validation;
