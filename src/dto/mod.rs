pub mod auth_dto;
pub mod course_dto;
pub mod enrollment_dto;
pub mod student_dto;

use bson::oid::ObjectId;

/// Hex form of an optional document id; empty for documents never stored.
pub(crate) fn hex_id(id: Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}
