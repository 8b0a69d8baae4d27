use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Client, ClientSession, Collection};
use tracing::{error, info, instrument, warn};

use crate::model::{timestamp_now, Course, Enrollment, Student};
use crate::repository::database::Database;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Inserts the enrollment and increments the course's `enrolledCount` as
    /// one unit. `NotFound` if the student or course does not exist, in which
    /// case nothing is written.
    async fn enroll(&self, enrollment: Enrollment) -> RepositoryResult<Enrollment>;
    /// Bulk insert without touching course counters.
    async fn insert_many(&self, enrollments: Vec<Enrollment>) -> RepositoryResult<Vec<Enrollment>>;
    /// At most `limit` enrollments in insertion order; 0 means no limit.
    async fn list(&self, limit: i64) -> RepositoryResult<Vec<Enrollment>>;
    async fn find_by_course(&self, course: &ObjectId) -> RepositoryResult<Vec<Enrollment>>;
    async fn find_by_courses(&self, courses: &[ObjectId]) -> RepositoryResult<Vec<Enrollment>>;
    async fn count(&self) -> RepositoryResult<u64>;
    async fn delete_all(&self) -> RepositoryResult<u64>;
}

pub struct MongoEnrollmentRepository {
    client: Client,
    enrollments: Collection<Enrollment>,
    courses: Collection<Course>,
    students: Collection<Student>,
}

impl MongoEnrollmentRepository {
    pub fn new(database: &Database) -> Self {
        MongoEnrollmentRepository {
            client: database.client().clone(),
            enrollments: database.enrollments(),
            courses: database.courses(),
            students: database.students(),
        }
    }

    async fn find_many(&self, filter: bson::Document, options: Option<FindOptions>) -> RepositoryResult<Vec<Enrollment>> {
        let cursor = self.enrollments.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn enroll_in(&self, session: &mut ClientSession, enrollment: &Enrollment) -> RepositoryResult<()> {
        let student = self
            .students
            .find_one_with_session(doc! { "_id": enrollment.student }, None, session)
            .await?;
        if student.is_none() {
            return Err(RepositoryError::not_found(format!(
                "Student not found for ID: {}",
                enrollment.student
            )));
        }

        // The update doubles as the course existence check and takes the
        // document's write lock for the rest of the transaction.
        let updated = self
            .courses
            .update_one_with_session(
                doc! { "_id": enrollment.course },
                doc! { "$inc": { "enrolledCount": 1_i64 } },
                None,
                session,
            )
            .await?;
        if updated.matched_count == 0 {
            return Err(RepositoryError::not_found(format!(
                "Course not found for ID: {}",
                enrollment.course
            )));
        }

        self.enrollments
            .insert_one_with_session(enrollment, None, session)
            .await?;
        Ok(())
    }
}

fn stamp_new(mut enrollment: Enrollment) -> Enrollment {
    let now = timestamp_now();
    enrollment.id = Some(ObjectId::new());
    enrollment.created_at = Some(now.clone());
    enrollment.updated_at = Some(now);
    enrollment
}

#[async_trait]
impl EnrollmentRepository for MongoEnrollmentRepository {
    #[instrument(skip(self, enrollment), fields(student = %enrollment.student, course = %enrollment.course))]
    async fn enroll(&self, enrollment: Enrollment) -> RepositoryResult<Enrollment> {
        let enrollment = stamp_new(enrollment);
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;

        match self.enroll_in(&mut session, &enrollment).await {
            Ok(()) => {
                session.commit_transaction().await?;
                info!("Enrollment created and course counter incremented");
                Ok(enrollment)
            }
            Err(e) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    warn!("Failed to abort enrollment transaction: {}", abort_err);
                }
                error!("Enrollment rolled back: {}", e);
                Err(e)
            }
        }
    }

    #[instrument(skip(self, enrollments), fields(count = enrollments.len()))]
    async fn insert_many(&self, enrollments: Vec<Enrollment>) -> RepositoryResult<Vec<Enrollment>> {
        if enrollments.is_empty() {
            return Ok(enrollments);
        }
        let enrollments: Vec<Enrollment> = enrollments.into_iter().map(stamp_new).collect();
        self.enrollments.insert_many(&enrollments, None).await?;
        info!("Inserted {} enrollments", enrollments.len());
        Ok(enrollments)
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64) -> RepositoryResult<Vec<Enrollment>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).limit(limit).build();
        self.find_many(doc! {}, Some(options)).await
    }

    async fn find_by_course(&self, course: &ObjectId) -> RepositoryResult<Vec<Enrollment>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        self.find_many(doc! { "course": *course }, Some(options)).await
    }

    async fn find_by_courses(&self, courses: &[ObjectId]) -> RepositoryResult<Vec<Enrollment>> {
        if courses.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "course": { "$in": courses.to_vec() } }, None).await
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.enrollments.count_documents(doc! {}, None).await?)
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        let result = self.enrollments.delete_many(doc! {}, None).await?;
        Ok(result.deleted_count)
    }
}
