use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const ENROLLMENT_COLLECTION_NAME: &str = "enrollments";

/// Links one student to one course. Duplicates are allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student: ObjectId,
    pub course: ObjectId,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
