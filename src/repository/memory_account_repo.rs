use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Local;

use crate::model::AccountRecord;
use crate::repository::account_repo::AccountRepository;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Process-local account store used for demos and tests. Guards are never
/// held across an await point.
pub struct MemoryAccountRepository<A: AccountRecord> {
    accounts: RwLock<HashMap<ObjectId, A>>,
}

impl<A: AccountRecord> Default for MemoryAccountRepository<A> {
    fn default() -> Self {
        MemoryAccountRepository {
            accounts: RwLock::new(HashMap::new()),
        }
    }
}

impl<A: AccountRecord> MemoryAccountRepository<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().map(|accounts| accounts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, HashMap<ObjectId, A>>> {
        self.accounts
            .read()
            .map_err(|_| RepositoryError::database(format!("{} store lock poisoned", A::KIND)))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, HashMap<ObjectId, A>>> {
        self.accounts
            .write()
            .map_err(|_| RepositoryError::database(format!("{} store lock poisoned", A::KIND)))
    }

    fn find_where(&self, pred: impl Fn(&A) -> bool) -> RepositoryResult<Option<A>> {
        Ok(self.read()?.values().find(|a| pred(a)).cloned())
    }
}

#[async_trait]
impl<A: AccountRecord> AccountRepository<A> for MemoryAccountRepository<A> {
    async fn insert(&self, mut account: A) -> RepositoryResult<A> {
        let mut accounts = self.write()?;
        if accounts.values().any(|a| a.email() == account.email()) {
            return Err(RepositoryError::already_exists(format!(
                "{} with email {} already exists",
                A::KIND,
                account.email()
            )));
        }
        let id = ObjectId::new();
        account.set_id(id);
        let now = Local::now().to_rfc3339();
        account.set_timestamps(Some(now.clone()), now);
        accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn update(&self, mut account: A) -> RepositoryResult<A> {
        let id = account
            .id()
            .ok_or_else(|| RepositoryError::validation("Cannot update an account without an id"))?;
        let mut accounts = self.write()?;
        if accounts.values().any(|a| a.id() != Some(id) && a.email() == account.email()) {
            return Err(RepositoryError::already_exists(format!(
                "{} with email {} already exists",
                A::KIND,
                account.email()
            )));
        }
        match accounts.get_mut(&id) {
            Some(stored) => {
                account.set_timestamps(None, Local::now().to_rfc3339());
                *stored = account.clone();
                Ok(account)
            }
            None => Err(RepositoryError::not_found(format!("No {} found to update for ID: {}", A::KIND, id))),
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<A>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<A>> {
        self.find_where(|a| a.email() == email)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<A>> {
        let accounts = self.read()?;
        Ok(ids.iter().filter_map(|id| accounts.get(id).cloned()).collect())
    }

    async fn find_by_verification_token(&self, token: &str) -> RepositoryResult<Option<A>> {
        self.find_where(|a| a.verification_token().map_or(false, |t| t.matches(token)))
    }

    async fn find_by_reset_token(&self, token: &str) -> RepositoryResult<Option<A>> {
        self.find_where(|a| a.reset_token().map_or(false, |t| t.matches(token)))
    }
}
