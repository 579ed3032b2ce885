use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Local;
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, Credential, IndexOptions, ResolverConfig},
    Client, Collection, Database, IndexModel,
};
use tracing::{debug, info, instrument};

use crate::config::MongoConfig;
use crate::model::AccountRecord;
use crate::repository::account_repo::{order_by_ids, AccountRepository};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Opens a pooled client and returns the configured database handle.
#[instrument(skip(config), fields(database = %config.database))]
pub async fn connect(config: &MongoConfig) -> RepositoryResult<Database> {
    let mut client_options = ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare())
        .await
        .map_err(|e| RepositoryError::connection(format!("Invalid MongoDB URI: {}", e)))?;
    client_options.app_name = Some("EduSoftBackend".to_string());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));
    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        client_options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build(),
        );
    }
    let client = Client::with_options(client_options)?;
    let db = client.database(&config.database);
    db.run_command(doc! { "ping": 1 }, None).await?;
    info!("Connected to MongoDB");
    Ok(db)
}

pub struct MongoAccountRepository<A: AccountRecord> {
    collection: Collection<A>,
}

impl<A: AccountRecord> MongoAccountRepository<A> {
    /// Binds to `collection_name` and makes sure the email index is unique.
    pub async fn new(db: &Database, collection_name: &str) -> RepositoryResult<Self> {
        let collection = db.collection::<A>(collection_name);
        let email_field = A::EMAIL_FIELD;
        let index = IndexModel::builder()
            .keys(doc! { email_field: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(index, None).await?;
        debug!("Unique index on {}.{} ensured", collection_name, A::EMAIL_FIELD);
        Ok(MongoAccountRepository { collection })
    }

    async fn find_one_by(&self, field: &str, value: &str) -> RepositoryResult<Option<A>> {
        let filter = doc! { field: value };
        Ok(self.collection.find_one(filter, None).await?)
    }
}

#[async_trait]
impl<A: AccountRecord> AccountRepository<A> for MongoAccountRepository<A> {
    async fn insert(&self, mut account: A) -> RepositoryResult<A> {
        account.set_id(ObjectId::new());
        let now = Local::now().to_rfc3339();
        account.set_timestamps(Some(now.clone()), now);
        match self.collection.insert_one(&account, None).await {
            Ok(_) => Ok(account),
            Err(e) => match RepositoryError::from(e) {
                RepositoryError::AlreadyExists(_) => Err(RepositoryError::already_exists(format!(
                    "{} with email {} already exists",
                    A::KIND,
                    account.email()
                ))),
                other => Err(other),
            },
        }
    }

    async fn update(&self, mut account: A) -> RepositoryResult<A> {
        let id = account
            .id()
            .ok_or_else(|| RepositoryError::validation("Cannot update an account without an id"))?;
        account.set_timestamps(None, Local::now().to_rfc3339());
        let result = self.collection.replace_one(doc! { "_id": id }, &account, None).await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::not_found(format!("No {} found to update for ID: {}", A::KIND, id)));
        }
        Ok(account)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<A>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<A>> {
        self.find_one_by(A::EMAIL_FIELD, email).await
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<A>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.collection.find(doc! { "_id": { "$in": ids.to_vec() } }, None).await?;
        let found: Vec<A> = cursor.try_collect().await?;
        Ok(order_by_ids(ids, found))
    }

    async fn find_by_verification_token(&self, token: &str) -> RepositoryResult<Option<A>> {
        self.find_one_by("emailVerificationToken", token).await
    }

    async fn find_by_reset_token(&self, token: &str) -> RepositoryResult<Option<A>> {
        self.find_one_by("resetToken", token).await
    }
}
