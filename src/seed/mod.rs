//! Bulk data generation and the scaling/transaction load test.

pub mod generator;
pub mod population;
pub mod runner;

pub const STUDENT_COUNT: usize = 1000;
pub const INSTRUCTOR_EVERY: usize = 10;
pub const COURSE_COUNT: usize = 50;
pub const ENROLLMENTS_PER_COURSE: usize = 4;
/// Plaintext shared by every seeded student; hashed once per run.
pub const SEED_PASSWORD: &str = "seed-password";
pub const LOOKUP_EMAIL: &str = "u10@mail.com";
pub const FORCED_ROLLBACK_MESSAGE: &str = "FORCED ERROR TO TEST ROLLBACK";

pub use runner::{LoadTest, LoadTestError, LoadTestReport};
