use serde::{Deserialize, Serialize};

use crate::dto::course_dto::CourseSummary;
use crate::dto::hex_id;
use crate::dto::student_dto::StudentSummary;
use crate::model::Enrollment;

/// Body of `POST /enrollments`; both ids in hex form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewEnrollmentRequest {
    pub student: Option<String>,
    pub course: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: String,
    pub student: String,
    pub course: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        EnrollmentResponse {
            id: hex_id(enrollment.id),
            student: enrollment.student.to_hex(),
            course: enrollment.course.to_hex(),
            created_at: enrollment.created_at,
            updated_at: enrollment.updated_at,
        }
    }
}

/// Enrollment with both references resolved. A reference whose target no
/// longer exists is `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedEnrollmentResponse {
    pub id: String,
    pub student: Option<StudentSummary>,
    pub course: Option<CourseSummary>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl PopulatedEnrollmentResponse {
    pub fn new(enrollment: Enrollment, student: Option<StudentSummary>, course: Option<CourseSummary>) -> Self {
        PopulatedEnrollmentResponse {
            id: hex_id(enrollment.id),
            student,
            course,
            created_at: enrollment.created_at,
            updated_at: enrollment.updated_at,
        }
    }
}
