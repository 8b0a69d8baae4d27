use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Client, ClientSession, Collection};
use tracing::{error, info, instrument, warn};

use crate::model::{timestamp_now, Course, Enrollment};
use crate::repository::database::Database;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn insert(&self, course: Course) -> RepositoryResult<Course>;
    async fn insert_many(&self, courses: Vec<Course>) -> RepositoryResult<Vec<Course>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Course>>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Course>>;
    /// At most `limit` courses in insertion order; 0 means no limit.
    async fn list(&self, limit: i64) -> RepositoryResult<Vec<Course>>;
    /// Deletes the course and every enrollment referencing it as one unit.
    /// Returns the number of enrollments removed; `NotFound` if the course
    /// does not exist.
    async fn delete_cascade(&self, id: &ObjectId) -> RepositoryResult<u64>;
    async fn set_enrolled_count(&self, id: &ObjectId, count: i64) -> RepositoryResult<()>;
    async fn delete_all(&self) -> RepositoryResult<u64>;
}

pub struct MongoCourseRepository {
    client: Client,
    courses: Collection<Course>,
    enrollments: Collection<Enrollment>,
}

impl MongoCourseRepository {
    pub fn new(database: &Database) -> Self {
        MongoCourseRepository {
            client: database.client().clone(),
            courses: database.courses(),
            enrollments: database.enrollments(),
        }
    }

    async fn find_many(&self, filter: bson::Document, options: Option<FindOptions>) -> RepositoryResult<Vec<Course>> {
        let cursor = self.courses.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn delete_cascade_in(&self, session: &mut ClientSession, id: &ObjectId) -> RepositoryResult<u64> {
        let removed = self
            .enrollments
            .delete_many_with_session(doc! { "course": *id }, None, session)
            .await?
            .deleted_count;

        let deleted = self
            .courses
            .delete_one_with_session(doc! { "_id": *id }, None, session)
            .await?;
        if deleted.deleted_count == 0 {
            return Err(RepositoryError::not_found(format!("Course not found for ID: {}", id)));
        }
        Ok(removed)
    }
}

fn stamp_new(mut course: Course) -> Course {
    let now = timestamp_now();
    course.id = Some(ObjectId::new());
    course.created_at = Some(now.clone());
    course.updated_at = Some(now);
    course
}

#[async_trait]
impl CourseRepository for MongoCourseRepository {
    #[instrument(skip(self, course), fields(title = %course.title))]
    async fn insert(&self, course: Course) -> RepositoryResult<Course> {
        let course = stamp_new(course);
        match self.courses.insert_one(&course, None).await {
            Ok(_) => {
                info!("Course created successfully");
                Ok(course)
            }
            Err(e) => {
                error!("Failed to create course: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[instrument(skip(self, courses), fields(count = courses.len()))]
    async fn insert_many(&self, courses: Vec<Course>) -> RepositoryResult<Vec<Course>> {
        if courses.is_empty() {
            return Ok(courses);
        }
        let courses: Vec<Course> = courses.into_iter().map(stamp_new).collect();
        self.courses.insert_many(&courses, None).await?;
        info!("Inserted {} courses", courses.len());
        Ok(courses)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Course>> {
        self.courses
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to fetch course by ID: {}", e)))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "_id": { "$in": ids.to_vec() } }, None).await
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64) -> RepositoryResult<Vec<Course>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).limit(limit).build();
        let courses = self.find_many(doc! {}, Some(options)).await?;
        info!("Fetched {} courses", courses.len());
        Ok(courses)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_cascade(&self, id: &ObjectId) -> RepositoryResult<u64> {
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;

        match self.delete_cascade_in(&mut session, id).await {
            Ok(removed) => {
                session.commit_transaction().await?;
                info!(enrollments_removed = removed, "Course deleted with its enrollments");
                Ok(removed)
            }
            Err(e) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    warn!("Failed to abort course delete transaction: {}", abort_err);
                }
                error!("Course delete rolled back: {}", e);
                Err(e)
            }
        }
    }

    async fn set_enrolled_count(&self, id: &ObjectId, count: i64) -> RepositoryResult<()> {
        let result = self
            .courses
            .update_one(doc! { "_id": *id }, doc! { "$set": { "enrolledCount": count } }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::not_found(format!("Course not found for ID: {}", id)));
        }
        Ok(())
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        let result = self.courses.delete_many(doc! {}, None).await?;
        Ok(result.deleted_count)
    }
}
