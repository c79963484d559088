use async_trait::async_trait;
use sqlx::PgPool;

use super::{StoreResult, UserStore};
use crate::{
    auth::repo_types::User,
    influencers::repo_types::{Influencer, InfluencerFilter, NewInfluencer},
};

/// [`UserStore`] backed by the shared Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        User::find_by_email(&self.db, email).await
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        User::find_by_id(&self.db, id).await
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        User::create(&self.db, email, password_hash).await
    }

    async fn find_influencer_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<Influencer>> {
        Influencer::find_by_username(&self.db, username).await
    }

    async fn find_influencer_by_user_id(&self, user_id: i64) -> StoreResult<Option<Influencer>> {
        Influencer::find_by_user_id(&self.db, user_id).await
    }

    async fn create_influencer(&self, new: NewInfluencer) -> StoreResult<Influencer> {
        Influencer::create(&self.db, &new).await
    }

    async fn list_influencers(&self, filter: &InfluencerFilter) -> StoreResult<Vec<Influencer>> {
        Influencer::search(&self.db, filter).await
    }
}
