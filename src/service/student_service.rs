use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument, warn};

use crate::dto::student_dto::{NewStudentRequest, StudentResponse};
use crate::model::{Role, Student};
use crate::repository::student_repo::StudentRepository;
use crate::util::error::ServiceError;
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};
use crate::util::validation::{self, FieldErrors, MAX_NAME_LEN};

/// Most students returned by one listing.
pub const STUDENT_LIST_LIMIT: i64 = 100;

/// A new-student payload that passed validation. Name and email are
/// normalized; the password is still plaintext.
#[derive(Debug, Clone)]
pub struct ValidatedStudent {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Checks every field and reports all failures together.
pub fn validate_new_student(request: &NewStudentRequest) -> Result<ValidatedStudent, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = errors.check(validation::required_text("name", request.name.as_deref(), MAX_NAME_LEN));
    let email = errors.check(validation::email("email", request.email.as_deref()));
    let password = errors.check(validation::password("password", request.password.as_deref()));
    let role = errors.check(validation::role("role", request.role.as_deref()));

    match (name, email, password, role) {
        (Some(name), Some(email), Some(password), Some(role)) => Ok(ValidatedStudent { name, email, password, role }),
        _ => Err(errors),
    }
}

/// Stores a validated student: rejects a taken email, hashes the password
/// once and inserts. A race past the pre-check still lands on the unique
/// index and comes back as `Conflict`.
pub async fn store_student(repo: &dyn StudentRepository, student: ValidatedStudent) -> Result<Student, ServiceError> {
    if repo.find_by_email(&student.email).await?.is_some() {
        warn!(email = %student.email, "Email already registered");
        return Err(ServiceError::Conflict("Email already registered".to_string()));
    }

    let password_hash = PasswordUtilsImpl::hash_password(&student.password)
        .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))?;

    let inserted = repo
        .insert(Student {
            id: None,
            name: student.name,
            email: student.email,
            password_hash,
            role: student.role,
            created_at: None,
            updated_at: None,
        })
        .await;
    match inserted {
        Ok(student) => Ok(student),
        Err(e) => {
            error!("Failed to insert student: {}", e);
            match ServiceError::from(e) {
                ServiceError::Conflict(_) => Err(ServiceError::Conflict("Email already registered".to_string())),
                other => Err(other),
            }
        }
    }
}

#[async_trait]
pub trait StudentService: Send + Sync {
    async fn create(&self, request: NewStudentRequest) -> Result<StudentResponse, ServiceError>;
    async fn list(&self) -> Result<Vec<StudentResponse>, ServiceError>;
    async fn get(&self, id: &ObjectId) -> Result<StudentResponse, ServiceError>;
}

pub struct StudentServiceImpl {
    pub student_repo: Arc<dyn StudentRepository>,
}

impl StudentServiceImpl {
    pub fn new(student_repo: Arc<dyn StudentRepository>) -> Self {
        Self { student_repo }
    }
}

#[async_trait]
impl StudentService for StudentServiceImpl {
    #[instrument(skip(self, request))]
    async fn create(&self, request: NewStudentRequest) -> Result<StudentResponse, ServiceError> {
        info!("Creating student");
        let validated = validate_new_student(&request)?;
        let student = store_student(self.student_repo.as_ref(), validated).await?;
        info!(id = ?student.id, "Student created");
        Ok(StudentResponse::from(student))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<StudentResponse>, ServiceError> {
        let students = self.student_repo.list(STUDENT_LIST_LIMIT).await?;
        Ok(students.into_iter().map(StudentResponse::from).collect())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get(&self, id: &ObjectId) -> Result<StudentResponse, ServiceError> {
        self.student_repo
            .find_by_id(id)
            .await?
            .map(StudentResponse::from)
            .ok_or_else(|| ServiceError::NotFound(format!("Student not found for ID: {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: Option<&str>, email: Option<&str>, password: Option<&str>) -> NewStudentRequest {
        NewStudentRequest {
            name: name.map(String::from),
            email: email.map(String::from),
            password: password.map(String::from),
            role: None,
        }
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let validated = validate_new_student(&request(Some("  Ada "), Some(" ADA@X.com"), Some("pw"))).unwrap();
        assert_eq!(validated.name, "Ada");
        assert_eq!(validated.email, "ada@x.com");
        assert_eq!(validated.password, "pw");
        assert_eq!(validated.role, Role::Student);
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let errors = validate_new_student(&request(None, None, None)).unwrap_err();
        assert!(errors.contains_field("name"));
        assert!(errors.contains_field("email"));
        assert!(errors.contains_field("password"));
        assert!(!errors.contains_field("role"));
    }

    #[test]
    fn test_validate_rejects_unknown_role() {
        let mut req = request(Some("A"), Some("a@x.com"), Some("pw"));
        req.role = Some("dean".to_string());
        let errors = validate_new_student(&req).unwrap_err();
        assert_eq!(errors.messages(), vec!["role: must be one of student, instructor, admin".to_string()]);
    }
}
