//! User repository interface

use async_trait::async_trait;

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: User) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    /// Newest accounts first
    async fn find_all(&self) -> DomainResult<Vec<User>>;
    async fn update(&self, user: User) -> DomainResult<()>;
    async fn count(&self) -> DomainResult<u64>;
}
