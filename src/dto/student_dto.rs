use serde::{Deserialize, Serialize};

use crate::dto::hex_id;
use crate::model::{Role, Student};

/// Body of `POST /students` and `POST /api/auth/register`.
///
/// Every field is optional at the serde level so that missing fields are
/// reported one by one by the service's validation instead of as a single
/// JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Student as returned to clients. Never carries password material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        StudentResponse {
            id: hex_id(student.id),
            name: student.name,
            email: student.email,
            role: student.role,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

/// Populated `{ id, name, email }` reference used for instructors and
/// enrolled students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        StudentSummary {
            id: hex_id(student.id),
            name: student.name.clone(),
            email: student.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    fn sample() -> Student {
        Student {
            id: Some(ObjectId::new()),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            role: Role::Instructor,
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            updated_at: None,
        }
    }

    #[test]
    fn test_response_omits_password_hash() {
        let student = sample();
        let id = student.id.unwrap().to_hex();
        let json = serde_json::to_value(StudentResponse::from(student)).unwrap();

        assert_eq!(json["id"], id);
        assert_eq!(json["role"], "instructor");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00Z");
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_request_tolerates_missing_fields() {
        let request: NewStudentRequest = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        assert_eq!(request.name.as_deref(), Some("A"));
        assert!(request.email.is_none());
        assert!(request.password.is_none());
    }
}
