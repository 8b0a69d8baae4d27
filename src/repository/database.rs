use std::time::Duration;

use bson::doc;
use mongodb::{
    options::{ClientOptions, IndexOptions, ResolverConfig},
    Client, Collection, IndexModel,
};
use tracing::{debug, error, info, instrument};

use crate::config::MongoConfig;
use crate::model::{
    course::COURSE_COLLECTION_NAME, enrollment::ENROLLMENT_COLLECTION_NAME,
    student::STUDENT_COLLECTION_NAME, Course, Enrollment, Student,
};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

pub const STUDENT_EMAIL_INDEX: &str = "email_1";
pub const ENROLLMENT_COURSE_INDEX: &str = "course_1";

/// Process-wide MongoDB handle.
///
/// Created once at startup and cloned into every repository; clones share the
/// driver's connection pool. Call [`Database::shutdown`] after the server has
/// stopped.
#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    db: mongodb::Database,
}

impl Database {
    /// Builds the client from `config` and pings the server, so an unreachable
    /// database fails here instead of on the first request.
    #[instrument(skip(config), fields(uri = %config.redacted_uri(), database = %config.database))]
    pub async fn connect(config: &MongoConfig) -> RepositoryResult<Self> {
        info!("Connecting to MongoDB");

        let mut client_options =
            ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare())
                .await
                .map_err(|e| RepositoryError::connection(format!("Invalid MongoDB URI: {}", e)))?;
        client_options.app_name = Some("EnrollmentBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout = Some(Duration::from_secs(config.connection_timeout_secs));
        client_options.server_selection_timeout =
            Some(Duration::from_secs(config.connection_timeout_secs));

        let client = Client::with_options(client_options)?;
        let database = Database {
            db: client.database(&config.database),
            client,
        };
        database.ping().await?;

        info!("Connected to MongoDB");
        Ok(database)
    }

    pub async fn ping(&self) -> RepositoryResult<()> {
        debug!("Pinging MongoDB");
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                error!("MongoDB ping failed: {}", e);
                RepositoryError::connection(format!("MongoDB ping failed: {}", e))
            })?;
        Ok(())
    }

    /// Creates the unique email index and the enrollment `course` index.
    /// Idempotent: existing indexes with the same keys and options are left alone.
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name(STUDENT_EMAIL_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.students().create_index(email_index, None).await?;

        let course_index = IndexModel::builder()
            .keys(doc! { "course": 1 })
            .options(IndexOptions::builder().name(ENROLLMENT_COURSE_INDEX.to_string()).build())
            .build();
        self.enrollments().create_index(course_index, None).await?;

        info!("MongoDB indexes ensured");
        Ok(())
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn name(&self) -> &str {
        self.db.name()
    }

    pub fn students(&self) -> Collection<Student> {
        self.db.collection::<Student>(STUDENT_COLLECTION_NAME)
    }

    pub fn courses(&self) -> Collection<Course> {
        self.db.collection::<Course>(COURSE_COLLECTION_NAME)
    }

    pub fn enrollments(&self) -> Collection<Enrollment> {
        self.db.collection::<Enrollment>(ENROLLMENT_COLLECTION_NAME)
    }

    /// Closes pooled connections. Outstanding clones become unusable.
    pub async fn shutdown(self) {
        info!("Shutting down MongoDB client");
        self.client.shutdown().await;
    }
}
