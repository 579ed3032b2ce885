pub mod account_repo;
pub mod memory_account_repo;
pub mod mongo_account_repo;
pub mod repository_error;
pub mod seed;

use std::sync::Arc;

use crate::config::MongoConfig;
use crate::model::{Admin, Supervisor, User};

pub use account_repo::AccountRepository;
pub use memory_account_repo::MemoryAccountRepository;
pub use mongo_account_repo::MongoAccountRepository;
pub use repository_error::{RepositoryError, RepositoryResult};

/// One repository per account collection, shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn AccountRepository<User>>,
    pub supervisors: Arc<dyn AccountRepository<Supervisor>>,
    pub admins: Arc<dyn AccountRepository<Admin>>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Repositories {
            users: Arc::new(MemoryAccountRepository::<User>::new()),
            supervisors: Arc::new(MemoryAccountRepository::<Supervisor>::new()),
            admins: Arc::new(MemoryAccountRepository::<Admin>::new()),
        }
    }

    pub async fn mongo(config: &MongoConfig) -> RepositoryResult<Self> {
        let db = mongo_account_repo::connect(config).await?;
        Ok(Repositories {
            users: Arc::new(MongoAccountRepository::<User>::new(&db, &config.users_collection).await?),
            supervisors: Arc::new(MongoAccountRepository::<Supervisor>::new(&db, &config.supervisors_collection).await?),
            admins: Arc::new(MongoAccountRepository::<Admin>::new(&db, &config.admins_collection).await?),
        })
    }
}
