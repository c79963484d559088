//! Persistence seam used by the auth core and the influencer handlers.
//!
//! Production runs on [`postgres::PgStore`]; tests swap in the in-memory
//! store so router-level scenarios run without a database.

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    auth::repo_types::User,
    error::AppError,
    influencers::repo_types::{Influencer, InfluencerFilter, NewInfluencer},
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint (email, username, one profile per user) was hit.
    #[error("record already exists")]
    Conflict,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Backend(e.into()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => AppError::Forbidden("Resource already exists".into()),
            StoreError::Backend(e) => AppError::Internal(e),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User>;

    async fn find_influencer_by_username(&self, username: &str)
        -> StoreResult<Option<Influencer>>;

    async fn find_influencer_by_user_id(&self, user_id: i64) -> StoreResult<Option<Influencer>>;

    async fn create_influencer(&self, new: NewInfluencer) -> StoreResult<Influencer>;

    async fn list_influencers(&self, filter: &InfluencerFilter) -> StoreResult<Vec<Influencer>>;
}
