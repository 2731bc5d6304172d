//! Driving port for catch reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::{Catch, CatchFilter, Error, UserId};

/// Catch read operations, scoped to the owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatchQuery: Send + Sync {
    /// Page through catches matching `filter`, newest first.
    async fn list_catches(
        &self,
        owner: &UserId,
        filter: &CatchFilter,
        page: PageRequest,
    ) -> Result<Page<Catch>, Error>;

    /// One catch, or a not-found error.
    async fn get_catch(&self, owner: &UserId, id: Uuid) -> Result<Catch, Error>;
}
