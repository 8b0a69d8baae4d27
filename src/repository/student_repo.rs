use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::{error, info, instrument};

use crate::model::{timestamp_now, Role, Student};
use crate::repository::database::Database;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn insert(&self, student: Student) -> RepositoryResult<Student>;
    async fn insert_many(&self, students: Vec<Student>) -> RepositoryResult<Vec<Student>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Student>>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Student>>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Student>>;
    async fn find_by_role(&self, role: Role) -> RepositoryResult<Vec<Student>>;
    /// At most `limit` students in insertion order; 0 means no limit.
    async fn list(&self, limit: i64) -> RepositoryResult<Vec<Student>>;
    async fn delete_all(&self) -> RepositoryResult<u64>;
}

pub struct MongoStudentRepository {
    collection: Collection<Student>,
}

impl MongoStudentRepository {
    pub fn new(database: &Database) -> Self {
        MongoStudentRepository { collection: database.students() }
    }

    async fn find_many(&self, filter: bson::Document, options: Option<FindOptions>) -> RepositoryResult<Vec<Student>> {
        let cursor = self.collection.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }
}

/// Assigns an id and timestamps to a student that has not been stored yet.
pub(crate) fn stamp_new(mut student: Student) -> Student {
    let now = timestamp_now();
    student.id = Some(ObjectId::new());
    student.created_at = Some(now.clone());
    student.updated_at = Some(now);
    student
}

#[async_trait]
impl StudentRepository for MongoStudentRepository {
    #[instrument(skip(self, student), fields(email = %student.email))]
    async fn insert(&self, student: Student) -> RepositoryResult<Student> {
        let student = stamp_new(student);
        match self.collection.insert_one(&student, None).await {
            Ok(_) => {
                info!("Student inserted");
                Ok(student)
            }
            Err(e) => {
                let err = RepositoryError::from(e);
                error!("Failed to insert student: {}", err);
                Err(err)
            }
        }
    }

    #[instrument(skip(self, students), fields(count = students.len()))]
    async fn insert_many(&self, students: Vec<Student>) -> RepositoryResult<Vec<Student>> {
        if students.is_empty() {
            return Ok(students);
        }
        let students: Vec<Student> = students.into_iter().map(stamp_new).collect();
        self.collection.insert_many(&students, None).await?;
        info!("Inserted {} students", students.len());
        Ok(students)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Student>> {
        let student = self
            .collection
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find student by id: {}", e)))?;
        Ok(student)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Student>> {
        let student = self
            .collection
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find student by email: {}", e)))?;
        Ok(student)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<Student>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "_id": { "$in": ids.to_vec() } }, None).await
    }

    async fn find_by_role(&self, role: Role) -> RepositoryResult<Vec<Student>> {
        self.find_many(doc! { "role": role.as_str() }, None).await
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64) -> RepositoryResult<Vec<Student>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).limit(limit).build();
        let students = self.find_many(doc! {}, Some(options)).await?;
        info!("Fetched {} students", students.len());
        Ok(students)
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        let result = self.collection.delete_many(doc! {}, None).await?;
        Ok(result.deleted_count)
    }
}
