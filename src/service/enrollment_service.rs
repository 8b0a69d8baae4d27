use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::course_dto::CourseSummary;
use crate::dto::enrollment_dto::{EnrollmentResponse, NewEnrollmentRequest, PopulatedEnrollmentResponse};
use crate::dto::student_dto::StudentSummary;
use crate::model::{Course, Enrollment, Student};
use crate::repository::course_repo::CourseRepository;
use crate::repository::enrollment_repo::EnrollmentRepository;
use crate::repository::student_repo::StudentRepository;
use crate::util::error::ServiceError;
use crate::util::validation::{self, FieldErrors};

pub const ENROLLMENT_LIST_LIMIT: i64 = 500;

/// Ids in first-seen order without repeats, ready for an `$in` query.
pub(crate) fn distinct_ids(ids: impl IntoIterator<Item = ObjectId>) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Joins enrollments with already-fetched students and courses.
pub(crate) fn populate(
    enrollments: Vec<Enrollment>,
    students: &[Student],
    courses: &[Course],
) -> Vec<PopulatedEnrollmentResponse> {
    let students: HashMap<ObjectId, StudentSummary> = students
        .iter()
        .filter_map(|s| s.id.map(|id| (id, StudentSummary::from(s))))
        .collect();
    let courses: HashMap<ObjectId, CourseSummary> = courses
        .iter()
        .filter_map(|c| c.id.map(|id| (id, CourseSummary::from(c))))
        .collect();

    enrollments
        .into_iter()
        .map(|enrollment| {
            let student = students.get(&enrollment.student).cloned();
            let course = courses.get(&enrollment.course).cloned();
            PopulatedEnrollmentResponse::new(enrollment, student, course)
        })
        .collect()
}

#[async_trait]
pub trait EnrollmentService: Send + Sync {
    async fn create(&self, request: NewEnrollmentRequest) -> Result<EnrollmentResponse, ServiceError>;
    async fn list(&self) -> Result<Vec<PopulatedEnrollmentResponse>, ServiceError>;
}

pub struct EnrollmentServiceImpl {
    pub enrollment_repo: Arc<dyn EnrollmentRepository>,
    pub student_repo: Arc<dyn StudentRepository>,
    pub course_repo: Arc<dyn CourseRepository>,
}

impl EnrollmentServiceImpl {
    pub fn new(
        enrollment_repo: Arc<dyn EnrollmentRepository>,
        student_repo: Arc<dyn StudentRepository>,
        course_repo: Arc<dyn CourseRepository>,
    ) -> Self {
        Self { enrollment_repo, student_repo, course_repo }
    }
}

#[async_trait]
impl EnrollmentService for EnrollmentServiceImpl {
    #[instrument(skip(self, request))]
    async fn create(&self, request: NewEnrollmentRequest) -> Result<EnrollmentResponse, ServiceError> {
        let mut errors = FieldErrors::new();
        let student = errors.check(validation::object_id("student", request.student.as_deref()));
        let course = errors.check(validation::object_id("course", request.course.as_deref()));
        let (Some(student), Some(course)) = (student, course) else {
            return Err(ServiceError::Validation(errors));
        };

        let enrollment = self
            .enrollment_repo
            .enroll(Enrollment { id: None, student, course, created_at: None, updated_at: None })
            .await?;
        info!(id = ?enrollment.id, "Enrollment created");
        Ok(EnrollmentResponse::from(enrollment))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<PopulatedEnrollmentResponse>, ServiceError> {
        let enrollments = self.enrollment_repo.list(ENROLLMENT_LIST_LIMIT).await?;
        let student_ids = distinct_ids(enrollments.iter().map(|e| e.student));
        let course_ids = distinct_ids(enrollments.iter().map(|e| e.course));

        let students = self.student_repo.find_by_ids(&student_ids).await?;
        let courses = self.course_repo.find_by_ids(&course_ids).await?;
        Ok(populate(enrollments, &students, &courses))
    }
}
