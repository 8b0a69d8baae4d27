pub mod course;
pub mod enrollment;
pub mod student;

pub use course::{Course, Lesson};
pub use enrollment::Enrollment;
pub use student::{Role, Student};

/// RFC 3339 timestamp used for `createdAt` / `updatedAt`.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}
