pub mod auth_handler;
pub mod course_handler;
pub mod enrollment_handler;
pub mod health_handler;
pub mod student_handler;

use bson::oid::ObjectId;

use crate::util::error::HandlerError;

/// Path ids must be 24-character hex object ids; anything else is a 400.
pub(crate) fn parse_path_id(raw: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw).map_err(|_| HandlerError::bad_request(format!("Invalid id: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::HandlerErrorKind;

    #[test]
    fn test_parse_path_id() {
        let id = ObjectId::new();
        assert_eq!(parse_path_id(&id.to_hex()).unwrap(), id);
        assert_eq!(parse_path_id("abc").unwrap_err().error, HandlerErrorKind::BadRequest);
    }
}
