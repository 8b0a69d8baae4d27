use std::collections::HashMap;

use bson::oid::ObjectId;

use crate::dto::course_dto::CourseSummary;
use crate::dto::enrollment_dto::PopulatedEnrollmentResponse;
use crate::model::{Course, Enrollment, Student};
use crate::service::enrollment_service::populate;

/// A course with its (virtual) enrollments, each with the student resolved.
#[derive(Debug, Clone)]
pub struct CourseWithEnrollments {
    pub course: CourseSummary,
    pub enrollments: Vec<PopulatedEnrollmentResponse>,
}

/// Groups enrollments under their courses, preserving course order. Courses
/// without enrollments get an empty list.
pub fn group_by_course(
    courses: &[Course],
    enrollments: Vec<Enrollment>,
    students: &[Student],
) -> Vec<CourseWithEnrollments> {
    let mut by_course: HashMap<ObjectId, Vec<Enrollment>> = HashMap::new();
    for enrollment in enrollments {
        by_course.entry(enrollment.course).or_default().push(enrollment);
    }

    courses
        .iter()
        .map(|course| {
            let enrollments = course
                .id
                .and_then(|id| by_course.remove(&id))
                .unwrap_or_default();
            CourseWithEnrollments {
                course: CourseSummary::from(course),
                enrollments: populate(enrollments, students, std::slice::from_ref(course)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn course(title: &str) -> Course {
        Course {
            id: Some(ObjectId::new()),
            title: title.to_string(),
            description: None,
            category: Some("database".to_string()),
            instructor: None,
            lessons: Vec::new(),
            enrolled_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_group_by_course_resolves_students() {
        let (c1, c2) = (course("Course 1"), course("Course 2"));
        let student = Student {
            id: Some(ObjectId::new()),
            name: "User1".to_string(),
            email: "u1@mail.com".to_string(),
            password_hash: String::new(),
            role: Role::Student,
            created_at: None,
            updated_at: None,
        };
        let enrollment = Enrollment {
            id: Some(ObjectId::new()),
            student: student.id.unwrap(),
            course: c1.id.unwrap(),
            created_at: None,
            updated_at: None,
        };

        let grouped = group_by_course(&[c1, c2], vec![enrollment.clone(), enrollment], &[student]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].course.title, "Course 1");
        assert_eq!(grouped[0].enrollments.len(), 2);
        assert_eq!(
            grouped[0].enrollments[0].student.as_ref().map(|s| s.email.as_str()),
            Some("u1@mail.com")
        );
        assert!(grouped[1].enrollments.is_empty());
    }
}
