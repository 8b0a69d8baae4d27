use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::course_dto::{CourseDeletedResponse, CourseDetailResponse, CourseResponse, NewCourseRequest};
use crate::dto::enrollment_dto::PopulatedEnrollmentResponse;
use crate::dto::student_dto::StudentSummary;
use crate::model::{Course, Lesson};
use crate::repository::course_repo::CourseRepository;
use crate::repository::enrollment_repo::EnrollmentRepository;
use crate::repository::student_repo::StudentRepository;
use crate::service::enrollment_service::{distinct_ids, populate};
use crate::util::error::ServiceError;
use crate::util::validation::{self, FieldError, FieldErrorKind, FieldErrors, MAX_TITLE_LEN};

pub const COURSE_LIST_LIMIT: i64 = 200;

#[async_trait]
pub trait CourseService: Send + Sync {
    async fn create(&self, request: NewCourseRequest) -> Result<CourseResponse, ServiceError>;
    async fn list(&self) -> Result<Vec<CourseResponse>, ServiceError>;
    async fn get(&self, id: &ObjectId) -> Result<CourseDetailResponse, ServiceError>;
    async fn delete(&self, id: &ObjectId) -> Result<CourseDeletedResponse, ServiceError>;
    async fn list_enrollments(&self, id: &ObjectId) -> Result<Vec<PopulatedEnrollmentResponse>, ServiceError>;
}

pub struct CourseServiceImpl {
    pub course_repo: Arc<dyn CourseRepository>,
    pub student_repo: Arc<dyn StudentRepository>,
    pub enrollment_repo: Arc<dyn EnrollmentRepository>,
}

impl CourseServiceImpl {
    pub fn new(
        course_repo: Arc<dyn CourseRepository>,
        student_repo: Arc<dyn StudentRepository>,
        enrollment_repo: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self { course_repo, student_repo, enrollment_repo }
    }

    /// The instructor must be an existing student allowed to teach.
    async fn check_instructor(&self, id: &ObjectId) -> Result<Option<FieldError>, ServiceError> {
        let reason = match self.student_repo.find_by_id(id).await? {
            None => "does not reference an existing user",
            Some(student) if !student.role.can_teach() => "must reference an instructor or admin",
            Some(_) => return Ok(None),
        };
        Ok(Some(FieldError::new(
            "instructor",
            FieldErrorKind::InvalidReference { reason: reason.to_string() },
        )))
    }

    async fn find_course(&self, id: &ObjectId) -> Result<Course, ServiceError> {
        self.course_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Course not found for ID: {}", id)))
    }
}

fn validate_lessons(request: &NewCourseRequest, errors: &mut FieldErrors) -> Vec<Lesson> {
    request
        .lessons
        .iter()
        .enumerate()
        .filter_map(|(i, lesson)| {
            let field = format!("lessons[{}].title", i);
            let title = errors.check(validation::required_text(&field, lesson.title.as_deref(), MAX_TITLE_LEN))?;
            Some(Lesson { title, duration: lesson.duration.unwrap_or(0) })
        })
        .collect()
}

#[async_trait]
impl CourseService for CourseServiceImpl {
    #[instrument(skip(self, request))]
    async fn create(&self, request: NewCourseRequest) -> Result<CourseResponse, ServiceError> {
        info!("Creating course");
        let mut errors = FieldErrors::new();
        let title = errors.check(validation::required_text("title", request.title.as_deref(), MAX_TITLE_LEN));
        let instructor = errors
            .check(validation::optional_object_id("instructor", request.instructor.as_deref()))
            .flatten();
        let lessons = validate_lessons(&request, &mut errors);

        if let Some(instructor) = &instructor {
            if let Some(e) = self.check_instructor(instructor).await? {
                errors.push(e);
            }
        }
        errors.into_result()?;

        let course = Course {
            id: None,
            // Present whenever no field error was recorded
            title: title.unwrap_or_default(),
            description: validation::optional_text(request.description.as_deref()),
            category: validation::optional_text(request.category.as_deref()),
            instructor,
            lessons,
            enrolled_count: 0,
            created_at: None,
            updated_at: None,
        };
        let course = self.course_repo.insert(course).await?;
        info!(id = ?course.id, "Course created");
        Ok(CourseResponse::from(course))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<CourseResponse>, ServiceError> {
        let courses = self.course_repo.list(COURSE_LIST_LIMIT).await?;
        Ok(courses.into_iter().map(CourseResponse::from).collect())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get(&self, id: &ObjectId) -> Result<CourseDetailResponse, ServiceError> {
        let course = self.find_course(id).await?;
        let instructor = match &course.instructor {
            Some(instructor_id) => self
                .student_repo
                .find_by_id(instructor_id)
                .await?
                .as_ref()
                .map(StudentSummary::from),
            None => None,
        };
        Ok(CourseDetailResponse::new(course, instructor))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &ObjectId) -> Result<CourseDeletedResponse, ServiceError> {
        let removed = self.course_repo.delete_cascade(id).await?;
        info!(enrollments_removed = removed, "Course deleted");
        Ok(CourseDeletedResponse::new(removed))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn list_enrollments(&self, id: &ObjectId) -> Result<Vec<PopulatedEnrollmentResponse>, ServiceError> {
        let course = self.find_course(id).await?;
        let enrollments = self.enrollment_repo.find_by_course(id).await?;
        let student_ids = distinct_ids(enrollments.iter().map(|e| e.student));
        let students = self.student_repo.find_by_ids(&student_ids).await?;
        Ok(populate(enrollments, &students, std::slice::from_ref(&course)))
    }
}
