use serde::{Deserialize, Serialize};

use crate::dto::hex_id;
use crate::dto::student_dto::StudentSummary;
use crate::model::{Course, Lesson};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LessonRequest {
    pub title: Option<String>,
    /// Minutes; 0 when omitted
    pub duration: Option<u32>,
}

/// Body of `POST /courses`. `instructor` is a student id in hex form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub instructor: Option<String>,
    pub lessons: Vec<LessonRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub instructor: Option<String>,
    pub lessons: Vec<Lesson>,
    pub enrolled_count: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        CourseResponse {
            id: hex_id(course.id),
            title: course.title,
            description: course.description,
            category: course.category,
            instructor: course.instructor.map(|id| id.to_hex()),
            lessons: course.lessons,
            enrolled_count: course.enrolled_count,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

/// `GET /courses/{id}`: the course with its instructor resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// `null` when unset or when the referenced student no longer exists
    pub instructor: Option<StudentSummary>,
    pub lessons: Vec<Lesson>,
    pub enrolled_count: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl CourseDetailResponse {
    pub fn new(course: Course, instructor: Option<StudentSummary>) -> Self {
        CourseDetailResponse {
            id: hex_id(course.id),
            title: course.title,
            description: course.description,
            category: course.category,
            instructor,
            lessons: course.lessons,
            enrolled_count: course.enrolled_count,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        CourseSummary {
            id: hex_id(course.id),
            title: course.title.clone(),
            category: course.category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDeletedResponse {
    pub message: String,
    pub enrollments_removed: u64,
}

impl CourseDeletedResponse {
    pub fn new(enrollments_removed: u64) -> Self {
        CourseDeletedResponse {
            message: "Course deleted".to_string(),
            enrollments_removed,
        }
    }
}
