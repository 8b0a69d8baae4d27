use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const COURSE_COLLECTION_NAME: &str = "courses";

/// Embedded lesson; order within a course is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    /// Minutes
    pub duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Reference to a student document holding a teaching role
    pub instructor: Option<ObjectId>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    /// Denormalized enrollment count, maintained transactionally
    #[serde(default)]
    pub enrolled_count: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
