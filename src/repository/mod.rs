pub mod course_repo;
pub mod database;
pub mod enrollment_repo;
pub mod repository_error;
pub mod student_repo;

pub use course_repo::{CourseRepository, MongoCourseRepository};
pub use database::Database;
pub use enrollment_repo::{EnrollmentRepository, MongoEnrollmentRepository};
pub use repository_error::{RepositoryError, RepositoryResult};
pub use student_repo::{MongoStudentRepository, StudentRepository};
