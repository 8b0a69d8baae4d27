#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bson::oid::ObjectId;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use enrollment_backend::config::{JwtConfig, RateLimitConfig};
use enrollment_backend::model::{timestamp_now, Course, Enrollment, Role, Student};
use enrollment_backend::repository::course_repo::CourseRepository;
use enrollment_backend::repository::enrollment_repo::EnrollmentRepository;
use enrollment_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use enrollment_backend::repository::student_repo::StudentRepository;
use enrollment_backend::router::create_router;
use enrollment_backend::service::Services;
use enrollment_backend::util::jwt::JwtTokenUtilsImpl;
use enrollment_backend::util::rate_limiter::FixedWindowRateLimiter;

/// In-memory stand-in for the three MongoDB collections. Mirrors the
/// repositories' observable behavior: unique emails, insertion order,
/// all-or-nothing enroll and cascade delete.
#[derive(Default)]
pub struct InMemoryStore {
    pub students: Mutex<Vec<Student>>,
    pub courses: Mutex<Vec<Course>>,
    pub enrollments: Mutex<Vec<Enrollment>>,
}

fn take(limit: i64) -> usize {
    if limit <= 0 { usize::MAX } else { limit as usize }
}

fn stamp(id: &mut Option<ObjectId>, created: &mut Option<String>, updated: &mut Option<String>) {
    let now = timestamp_now();
    *id = Some(ObjectId::new());
    *created = Some(now.clone());
    *updated = Some(now);
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn course(&self, id: &ObjectId) -> Option<Course> {
        self.courses.lock().unwrap().iter().find(|c| c.id.as_ref() == Some(id)).cloned()
    }

    pub fn enrollment_count(&self) -> usize {
        self.enrollments.lock().unwrap().len()
    }

    pub fn stored_student(&self, email: &str) -> Option<Student> {
        self.students.lock().unwrap().iter().find(|s| s.email == email).cloned()
    }

    /// Inserts a student directly, bypassing validation and hashing.
    pub fn seed_student(&self, name: &str, email: &str, role: Role) -> ObjectId {
        let id = ObjectId::new();
        self.students.lock().unwrap().push(Student {
            id: Some(id),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "seeded".to_string(),
            role,
            created_at: Some(timestamp_now()),
            updated_at: Some(timestamp_now()),
        });
        id
    }

    /// Inserts an enrollment directly, leaving course counters alone.
    pub fn seed_enrollment(&self, student: ObjectId, course: ObjectId) -> ObjectId {
        let id = ObjectId::new();
        self.enrollments.lock().unwrap().push(Enrollment {
            id: Some(id),
            student,
            course,
            created_at: Some(timestamp_now()),
            updated_at: Some(timestamp_now()),
        });
        id
    }

    pub fn seed_course(&self, title: &str, instructor: Option<ObjectId>) -> ObjectId {
        let id = ObjectId::new();
        self.courses.lock().unwrap().push(Course {
            id: Some(id),
            title: title.to_string(),
            description: None,
            category: Some("programming".to_string()),
            instructor,
            lessons: Vec::new(),
            enrolled_count: 0,
            created_at: Some(timestamp_now()),
            updated_at: Some(timestamp_now()),
        });
        id
    }
}

#[async_trait]
impl StudentRepository for InMemoryStore {
    async fn insert(&self, mut student: Student) -> RepositoryResult<Student> {
        let mut students = self.students.lock().unwrap();
        if students.iter().any(|s| s.email == student.email) {
            return Err(RepositoryError::already_exists("Duplicate key: email_1"));
        }
        stamp(&mut student.id, &mut student.created_at, &mut student.updated_at);
        students.push(student.clone());
        Ok(student)
    }

    async fn insert_many(&self, students: Vec<Student>) -> RepositoryResult<Vec<Student>> {
        let mut inserted = Vec::with_capacity(students.len());
        for student in students {
            inserted.push(StudentRepository::insert(self, student).await?);
        }
        Ok(inserted)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Student>> {
        Ok(self.students.lock().unwrap().iter().find(|s| s.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Student>> {
        Ok(self.stored_student(email))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Student>> {
        let students = self.students.lock().unwrap();
        Ok(students.iter().filter(|s| s.id.is_some_and(|id| ids.contains(&id))).cloned().collect())
    }

    async fn find_by_role(&self, role: Role) -> RepositoryResult<Vec<Student>> {
        let students = self.students.lock().unwrap();
        Ok(students.iter().filter(|s| s.role == role).cloned().collect())
    }

    async fn list(&self, limit: i64) -> RepositoryResult<Vec<Student>> {
        Ok(self.students.lock().unwrap().iter().take(take(limit)).cloned().collect())
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        let mut students = self.students.lock().unwrap();
        let n = students.len() as u64;
        students.clear();
        Ok(n)
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn insert(&self, mut course: Course) -> RepositoryResult<Course> {
        stamp(&mut course.id, &mut course.created_at, &mut course.updated_at);
        self.courses.lock().unwrap().push(course.clone());
        Ok(course)
    }

    async fn insert_many(&self, courses: Vec<Course>) -> RepositoryResult<Vec<Course>> {
        let mut inserted = Vec::with_capacity(courses.len());
        for course in courses {
            inserted.push(CourseRepository::insert(self, course).await?);
        }
        Ok(inserted)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Course>> {
        Ok(self.course(id))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Course>> {
        let courses = self.courses.lock().unwrap();
        Ok(courses.iter().filter(|c| c.id.is_some_and(|id| ids.contains(&id))).cloned().collect())
    }

    async fn list(&self, limit: i64) -> RepositoryResult<Vec<Course>> {
        Ok(self.courses.lock().unwrap().iter().take(take(limit)).cloned().collect())
    }

    async fn delete_cascade(&self, id: &ObjectId) -> RepositoryResult<u64> {
        // Both locks held so the two deletes are observed together.
        let mut courses = self.courses.lock().unwrap();
        let mut enrollments = self.enrollments.lock().unwrap();
        let Some(pos) = courses.iter().position(|c| c.id.as_ref() == Some(id)) else {
            return Err(RepositoryError::not_found(format!("Course not found for ID: {}", id)));
        };
        let before = enrollments.len();
        enrollments.retain(|e| &e.course != id);
        courses.remove(pos);
        Ok((before - enrollments.len()) as u64)
    }

    async fn set_enrolled_count(&self, id: &ObjectId, count: i64) -> RepositoryResult<()> {
        let mut courses = self.courses.lock().unwrap();
        let course = courses
            .iter_mut()
            .find(|c| c.id.as_ref() == Some(id))
            .ok_or_else(|| RepositoryError::not_found("Course not found"))?;
        course.enrolled_count = count;
        Ok(())
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        let mut courses = self.courses.lock().unwrap();
        let n = courses.len() as u64;
        courses.clear();
        Ok(n)
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn enroll(&self, mut enrollment: Enrollment) -> RepositoryResult<Enrollment> {
        let students = self.students.lock().unwrap();
        let mut courses = self.courses.lock().unwrap();
        let mut enrollments = self.enrollments.lock().unwrap();

        if !students.iter().any(|s| s.id == Some(enrollment.student)) {
            return Err(RepositoryError::not_found(format!(
                "Student not found for ID: {}",
                enrollment.student
            )));
        }
        let course = courses
            .iter_mut()
            .find(|c| c.id == Some(enrollment.course))
            .ok_or_else(|| RepositoryError::not_found(format!("Course not found for ID: {}", enrollment.course)))?;

        stamp(&mut enrollment.id, &mut enrollment.created_at, &mut enrollment.updated_at);
        course.enrolled_count += 1;
        enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn insert_many(&self, enrollments: Vec<Enrollment>) -> RepositoryResult<Vec<Enrollment>> {
        let mut stored = self.enrollments.lock().unwrap();
        let mut inserted = Vec::with_capacity(enrollments.len());
        for mut enrollment in enrollments {
                stamp(&mut enrollment.id, &mut enrollment.created_at, &mut enrollment.updated_at);
            stored.push(enrollment.clone());
            inserted.push(enrollment);
        }
        Ok(inserted)
    }

    async fn list(&self, limit: i64) -> RepositoryResult<Vec<Enrollment>> {
        Ok(self.enrollments.lock().unwrap().iter().take(take(limit)).cloned().collect())
    }

    async fn find_by_course(&self, course: &ObjectId) -> RepositoryResult<Vec<Enrollment>> {
        let enrollments = self.enrollments.lock().unwrap();
        Ok(enrollments.iter().filter(|e| &e.course == course).cloned().collect())
    }

    async fn find_by_courses(&self, courses: &[ObjectId]) -> RepositoryResult<Vec<Enrollment>> {
        let enrollments = self.enrollments.lock().unwrap();
        Ok(enrollments.iter().filter(|e| courses.contains(&e.course)).cloned().collect())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.enrollment_count() as u64)
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        let mut enrollments = self.enrollments.lock().unwrap();
        let n = enrollments.len() as u64;
        enrollments.clear();
        Ok(n)
    }
}

pub fn test_services(store: &Arc<InMemoryStore>) -> Services {
    Services::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default())),
    )
}

/// Router over `store` with the default auth limiter (10 per 15 minutes).
pub fn test_app(store: &Arc<InMemoryStore>) -> Router {
    let limiter = Arc::new(FixedWindowRateLimiter::from_config(&RateLimitConfig::default()));
    create_router(test_services(store), limiter)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

/// Sends one request and returns the status with the body parsed as JSON
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
