pub mod auth_service;
pub mod course_service;
pub mod enrollment_service;
pub mod student_service;

use std::sync::Arc;

use crate::repository::course_repo::CourseRepository;
use crate::repository::enrollment_repo::EnrollmentRepository;
use crate::repository::student_repo::StudentRepository;
use crate::util::jwt::JwtTokenUtilsImpl;

use auth_service::AuthServiceImpl;
use course_service::CourseServiceImpl;
use enrollment_service::EnrollmentServiceImpl;
use student_service::StudentServiceImpl;

/// Every service the HTTP layer needs, wired to one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub students: Arc<StudentServiceImpl>,
    pub courses: Arc<CourseServiceImpl>,
    pub enrollments: Arc<EnrollmentServiceImpl>,
    pub auth: Arc<AuthServiceImpl>,
}

impl Services {
    pub fn new(
        student_repo: Arc<dyn StudentRepository>,
        course_repo: Arc<dyn CourseRepository>,
        enrollment_repo: Arc<dyn EnrollmentRepository>,
        jwt_utils: Arc<JwtTokenUtilsImpl>,
    ) -> Self {
        Services {
            students: Arc::new(StudentServiceImpl::new(student_repo.clone())),
            courses: Arc::new(CourseServiceImpl::new(
                course_repo.clone(),
                student_repo.clone(),
                enrollment_repo.clone(),
            )),
            enrollments: Arc::new(EnrollmentServiceImpl::new(
                enrollment_repo,
                student_repo.clone(),
                course_repo,
            )),
            auth: Arc::new(AuthServiceImpl::new(student_repo, jwt_utils)),
        }
    }
}
