use std::future::Future;
use std::time::{Duration, Instant};

use bson::doc;
use futures::stream::TryStreamExt;
use mongodb::ClientSession;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::ConfigError;
use crate::model::{Enrollment, Role};
use crate::repository::course_repo::{CourseRepository, MongoCourseRepository};
use crate::repository::database::{Database, STUDENT_EMAIL_INDEX};
use crate::repository::enrollment_repo::{EnrollmentRepository, MongoEnrollmentRepository};
use crate::repository::repository_error::RepositoryError;
use crate::repository::student_repo::{MongoStudentRepository, StudentRepository};
use crate::seed::population::group_by_course;
use crate::service::enrollment_service::distinct_ids;
use crate::seed::{
    generator, COURSE_COUNT, ENROLLMENTS_PER_COURSE, FORCED_ROLLBACK_MESSAGE, INSTRUCTOR_EVERY, LOOKUP_EMAIL,
    SEED_PASSWORD, STUDENT_COUNT,
};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

#[derive(Debug, thiserror::Error)]
pub enum LoadTestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Database(#[from] RepositoryError),
    #[error("Password hash error: {0}")]
    Password(String),
    #[error("No {0} rows to reference")]
    MissingFixtures(&'static str),
    #[error("Rollback left {after} enrollments, expected {before}")]
    RollbackLeaked { before: u64, after: u64 },
    /// Raised on purpose inside the transaction test.
    #[error("{0}")]
    Forced(&'static str),
}

impl From<mongodb::error::Error> for LoadTestError {
    fn from(err: mongodb::error::Error) -> Self {
        LoadTestError::Database(RepositoryError::from(err))
    }
}

/// Timings collected by [`LoadTest::run`].
#[derive(Debug, Default, Clone)]
pub struct LoadTestReport {
    pub steps: Vec<(String, Duration)>,
    pub enrollment_count: u64,
}

impl LoadTestReport {
    fn record(&mut self, label: &str, elapsed: Duration) {
        info!(elapsed_ms = elapsed.as_secs_f64() * 1000.0, "{}", label);
        self.steps.push((label.to_string(), elapsed));
    }
}

async fn timed<T, F>(report: &mut LoadTestReport, label: &str, fut: F) -> Result<T, LoadTestError>
where
    F: Future<Output = Result<T, LoadTestError>>,
{
    let started = Instant::now();
    let value = fut.await?;
    report.record(label, started.elapsed());
    Ok(value)
}

pub struct LoadTest {
    database: Database,
    students: MongoStudentRepository,
    courses: MongoCourseRepository,
    enrollments: MongoEnrollmentRepository,
    rng: StdRng,
}

impl LoadTest {
    pub fn new(database: Database) -> Self {
        LoadTest {
            students: MongoStudentRepository::new(&database),
            courses: MongoCourseRepository::new(&database),
            enrollments: MongoEnrollmentRepository::new(&database),
            database,
            rng: StdRng::from_entropy(),
        }
    }

    pub async fn run(mut self) -> Result<LoadTestReport, LoadTestError> {
        let mut report = LoadTestReport::default();

        timed(&mut report, "Clean collections", self.clean()).await?;
        let label = format!("Insert students {}", STUDENT_COUNT);
        timed(&mut report, &label, self.insert_students()).await?;
        let label = format!("Insert courses {}", COURSE_COUNT);
        timed(&mut report, &label, self.insert_courses()).await?;
        timed(&mut report, "Enroll students", self.enroll_students()).await?;
        timed(&mut report, "Query courses with enrollments (populate)", self.query_populated()).await?;

        report.enrollment_count = self.enrollments.count().await?;
        info!("Enrollment count: {}", report.enrollment_count);

        self.transaction_test().await?;
        self.index_test(&mut report).await?;

        info!("Load test completed successfully");
        Ok(report)
    }

    async fn clean(&self) -> Result<(), LoadTestError> {
        let enrollments = self.enrollments.delete_all().await?;
        let courses = self.courses.delete_all().await?;
        let students = self.students.delete_all().await?;
        info!(students, courses, enrollments, "Collections cleaned");
        Ok(())
    }

    async fn insert_students(&self) -> Result<(), LoadTestError> {
        let hash = PasswordUtilsImpl::hash_password(SEED_PASSWORD)
            .map_err(|e| LoadTestError::Password(e.to_string()))?;
        let rows = generator::students(STUDENT_COUNT, INSTRUCTOR_EVERY, &hash);
        self.students.insert_many(rows).await?;
        Ok(())
    }

    async fn insert_courses(&mut self) -> Result<(), LoadTestError> {
        let instructors: Vec<_> = self
            .students
            .find_by_role(Role::Instructor)
            .await?
            .into_iter()
            .filter_map(|s| s.id)
            .collect();
        if instructors.is_empty() {
            return Err(LoadTestError::MissingFixtures("instructor"));
        }
        let rows = generator::courses(COURSE_COUNT, &instructors, &mut self.rng);
        self.courses.insert_many(rows).await?;
        Ok(())
    }

    async fn enroll_students(&mut self) -> Result<(), LoadTestError> {
        let course_ids: Vec<_> = self.courses.list(0).await?.into_iter().filter_map(|c| c.id).collect();
        let student_ids: Vec<_> = self
            .students
            .find_by_role(Role::Student)
            .await?
            .into_iter()
            .filter_map(|s| s.id)
            .collect();
        if student_ids.is_empty() {
            return Err(LoadTestError::MissingFixtures("student"));
        }

        let rows = generator::enrollments(&course_ids, &student_ids, ENROLLMENTS_PER_COURSE, &mut self.rng);
        let counts = generator::enrollment_counts(&rows);
        self.enrollments.insert_many(rows).await?;
        for (course, count) in counts {
            self.courses.set_enrolled_count(&course, count).await?;
        }
        Ok(())
    }

    async fn query_populated(&self) -> Result<(), LoadTestError> {
        let courses = self.courses.list(0).await?;
        let course_ids: Vec<_> = courses.iter().filter_map(|c| c.id).collect();
        let enrollments = self.enrollments.find_by_courses(&course_ids).await?;
        let student_ids = distinct_ids(enrollments.iter().map(|e| e.student));
        let students = self.students.find_by_ids(&student_ids).await?;

        let populated = group_by_course(&courses, enrollments, &students);
        if let Some(first) = populated.first() {
            let sample: Vec<_> = first.enrollments.iter().take(3).collect();
            info!(course = %first.course.title, "First course enrollments sample: {:?}", sample);
        }
        Ok(())
    }

    /// Inserts an enrollment inside a transaction, fails on purpose and
    /// checks that the abort discarded the insert.
    async fn transaction_test(&self) -> Result<(), LoadTestError> {
        info!("--- Transaction Test ---");
        let before = self.enrollments.count().await?;

        let mut session = self.database.client().start_session(None).await?;
        session.start_transaction(None).await?;
        match self.forced_failure(&mut session).await {
            Ok(()) => {
                session.commit_transaction().await?;
                info!("Transaction committed!");
            }
            Err(e) => {
                session.abort_transaction().await?;
                info!("Transaction rolled back: {}", e);
            }
        }

        let after = self.enrollments.count().await?;
        if after != before {
            return Err(LoadTestError::RollbackLeaked { before, after });
        }
        info!(enrollments = after, "Enrollment count unchanged after rollback");
        Ok(())
    }

    async fn forced_failure(&self, session: &mut ClientSession) -> Result<(), LoadTestError> {
        let student = self
            .database
            .students()
            .find_one_with_session(doc! { "role": Role::Student.as_str() }, None, session)
            .await?
            .and_then(|s| s.id)
            .ok_or(LoadTestError::MissingFixtures("student"))?;
        let course = self
            .database
            .courses()
            .find_one_with_session(doc! {}, None, session)
            .await?
            .and_then(|c| c.id)
            .ok_or(LoadTestError::MissingFixtures("course"))?;

        let enrollment = Enrollment { id: None, student, course, created_at: None, updated_at: None };
        self.database
            .enrollments()
            .insert_one_with_session(&enrollment, None, session)
            .await?;

        Err(LoadTestError::Forced(FORCED_ROLLBACK_MESSAGE))
    }

    async fn find_by_lookup_email(&self) -> Result<(), LoadTestError> {
        let found: Vec<_> = self
            .database
            .students()
            .find(doc! { "email": LOOKUP_EMAIL }, None)
            .await?
            .try_collect()
            .await?;
        if found.is_empty() {
            warn!(email = LOOKUP_EMAIL, "Lookup email not found");
        }
        Ok(())
    }

    async fn index_test(&self, report: &mut LoadTestReport) -> Result<(), LoadTestError> {
        info!("--- Performance Test (Index Impact) ---");
        timed(report, "Query by email with index", self.find_by_lookup_email()).await?;

        let students = self.database.students();
        if students.list_index_names().await?.iter().any(|n| n == STUDENT_EMAIL_INDEX) {
            students.drop_index(STUDENT_EMAIL_INDEX, None).await?;
            info!("Dropped index {}", STUDENT_EMAIL_INDEX);
        }
        timed(report, "Query by email without index", self.find_by_lookup_email()).await?;

        self.database.ensure_indexes().await?;
        timed(report, "Query by email after recreating index", self.find_by_lookup_email()).await?;
        Ok(())
    }
}
