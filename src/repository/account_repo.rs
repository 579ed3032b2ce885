use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::model::AccountRecord;
use crate::repository::repository_error::RepositoryResult;

/// Storage for one account collection. Emails are stored normalized and are
/// unique per collection; lookups expect an already normalized address.
#[async_trait]
pub trait AccountRepository<A: AccountRecord>: Send + Sync {
    /// Assigns a fresh id and timestamps. Fails with `AlreadyExists` when the
    /// email is taken.
    async fn insert(&self, account: A) -> RepositoryResult<A>;

    /// Replaces the stored document with the same id.
    async fn update(&self, account: A) -> RepositoryResult<A>;

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<A>>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<A>>;

    /// Accounts for the given ids in the given order. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<A>>;

    /// Matches the stored verification token regardless of its expiry.
    async fn find_by_verification_token(&self, token: &str) -> RepositoryResult<Option<A>>;

    /// Matches the stored reset token regardless of its expiry.
    async fn find_by_reset_token(&self, token: &str) -> RepositoryResult<Option<A>>;
}

/// Orders `found` by the position of each id in `ids`, dropping ids that
/// have no account.
pub(crate) fn order_by_ids<A: AccountRecord>(ids: &[ObjectId], found: Vec<A>) -> Vec<A> {
    let mut remaining = found;
    let mut ordered = Vec::with_capacity(remaining.len());
    for id in ids {
        if let Some(pos) = remaining.iter().position(|a| a.id().as_ref() == Some(id)) {
            ordered.push(remaining.swap_remove(pos));
        }
    }
    ordered
}
