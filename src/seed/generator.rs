//! Deterministic-shape fixture data for the load test. Randomness only picks
//! references and lesson durations, so callers can pass a seeded RNG.

use std::collections::HashMap;

use bson::oid::ObjectId;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Course, Enrollment, Lesson, Role, Student};

/// Indexed by `i % 2`, so odd-numbered courses get `database`.
pub const CATEGORIES: [&str; 2] = ["programming", "database"];

/// `User{i}` / `u{i}@mail.com` for `i` in `1..=count`; every
/// `instructor_every`-th row is an instructor. All rows share one hash.
pub fn students(count: usize, instructor_every: usize, password_hash: &str) -> Vec<Student> {
    (1..=count)
        .map(|i| Student {
            id: None,
            name: format!("User{}", i),
            email: format!("u{}@mail.com", i),
            password_hash: password_hash.to_string(),
            role: if instructor_every > 0 && i % instructor_every == 0 {
                Role::Instructor
            } else {
                Role::Student
            },
            created_at: None,
            updated_at: None,
        })
        .collect()
}

/// `Course {i}` with alternating categories, a random instructor (if any)
/// and two lessons of 10-29 and 10-39 minutes.
pub fn courses<R: Rng + ?Sized>(count: usize, instructors: &[ObjectId], rng: &mut R) -> Vec<Course> {
    (1..=count)
        .map(|i| Course {
            id: None,
            title: format!("Course {}", i),
            description: Some(format!("Description {}", i)),
            category: Some(CATEGORIES[i % 2].to_string()),
            instructor: instructors.choose(rng).copied(),
            lessons: vec![
                Lesson { title: "L1".to_string(), duration: rng.gen_range(10..30) },
                Lesson { title: "L2".to_string(), duration: rng.gen_range(10..40) },
            ],
            enrolled_count: 0,
            created_at: None,
            updated_at: None,
        })
        .collect()
}

/// `per_course` enrollments per course, each with a random student.
/// Picks are independent, so a student can land in a course twice.
pub fn enrollments<R: Rng + ?Sized>(
    courses: &[ObjectId],
    students: &[ObjectId],
    per_course: usize,
    rng: &mut R,
) -> Vec<Enrollment> {
    if students.is_empty() {
        return Vec::new();
    }
    courses
        .iter()
        .flat_map(|course| std::iter::repeat(*course).take(per_course))
        .filter_map(|course| {
            students.choose(rng).map(|student| Enrollment {
                id: None,
                student: *student,
                course,
                created_at: None,
                updated_at: None,
            })
        })
        .collect()
}

/// Enrollments per course, for setting `enrolledCount` after a bulk insert.
pub fn enrollment_counts(enrollments: &[Enrollment]) -> HashMap<ObjectId, i64> {
    let mut counts = HashMap::new();
    for enrollment in enrollments {
        *counts.entry(enrollment.course).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_students_every_tenth_is_instructor() {
        let rows = students(1000, 10, "hash");
        assert_eq!(rows.len(), 1000);
        assert_eq!(rows[0].name, "User1");
        assert_eq!(rows[0].email, "u1@mail.com");
        assert_eq!(rows[9].role, Role::Instructor);
        assert_eq!(rows.iter().filter(|s| s.role == Role::Instructor).count(), 100);
        assert!(rows.iter().all(|s| s.password_hash == "hash"));
    }

    #[test]
    fn test_courses_have_alternating_categories_and_bounded_lessons() {
        let mut rng = StdRng::seed_from_u64(7);
        let instructors = vec![ObjectId::new(), ObjectId::new()];
        let rows = courses(50, &instructors, &mut rng);

        assert_eq!(rows.len(), 50);
        assert_eq!(rows[0].category.as_deref(), Some("database"));
        assert_eq!(rows[1].category.as_deref(), Some("programming"));
        for course in &rows {
            assert!(instructors.contains(&course.instructor.unwrap()));
            assert!((10..30).contains(&course.lessons[0].duration));
            assert!((10..40).contains(&course.lessons[1].duration));
        }
    }

    #[test]
    fn test_courses_without_instructors_leave_it_unset() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(courses(3, &[], &mut rng).iter().all(|c| c.instructor.is_none()));
    }

    #[test]
    fn test_enrollments_per_course_and_counts() {
        let mut rng = StdRng::seed_from_u64(42);
        let course_ids: Vec<ObjectId> = (0..5).map(|_| ObjectId::new()).collect();
        let student_ids: Vec<ObjectId> = (0..20).map(|_| ObjectId::new()).collect();

        let rows = enrollments(&course_ids, &student_ids, 4, &mut rng);
        assert_eq!(rows.len(), 20);

        let counts = enrollment_counts(&rows);
        assert_eq!(counts.len(), 5);
        assert!(counts.values().all(|&n| n == 4));
        assert!(enrollments(&course_ids, &[], 4, &mut rng).is_empty());
    }
}
