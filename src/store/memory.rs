use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{StoreError, StoreResult, UserStore};
use crate::{
    auth::repo_types::User,
    influencers::repo_types::{Influencer, InfluencerFilter, NewInfluencer},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    influencers: Vec<Influencer>,
    next_user_id: i64,
    next_influencer_id: i64,
}

/// In-process store with the same uniqueness rules as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Deletes a user and, like `ON DELETE CASCADE`, their profile.
    pub fn remove_user(&self, id: i64) {
        let mut t = self.tables.lock().unwrap();
        t.users.retain(|u| u.id != id);
        t.influencers.retain(|i| i.user_id != id);
    }

    /// Makes every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn tables(&self) -> StoreResult<std::sync::MutexGuard<'_, Tables>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(anyhow::anyhow!("store unavailable")));
        }
        Ok(self.tables.lock().unwrap())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.tables()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let mut t = self.tables()?;
        if t.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict);
        }
        t.next_user_id += 1;
        let user = User {
            id: t.next_user_id,
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_influencer_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<Influencer>> {
        Ok(self
            .tables()?
            .influencers
            .iter()
            .find(|i| i.username == username)
            .cloned())
    }

    async fn find_influencer_by_user_id(&self, user_id: i64) -> StoreResult<Option<Influencer>> {
        Ok(self
            .tables()?
            .influencers
            .iter()
            .find(|i| i.user_id == user_id)
            .cloned())
    }

    async fn create_influencer(&self, new: NewInfluencer) -> StoreResult<Influencer> {
        let mut t = self.tables()?;
        if t
            .influencers
            .iter()
            .any(|i| i.username == new.username || i.user_id == new.user_id)
        {
            return Err(StoreError::Conflict);
        }
        if !t.users.iter().any(|u| u.id == new.user_id) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "foreign key violation: user {} does not exist",
                new.user_id
            )));
        }
        t.next_influencer_id += 1;
        let influencer = Influencer {
            id: t.next_influencer_id,
            user_id: new.user_id,
            username: new.username,
            follower_count: new.follower_count,
            bio: new.bio,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        t.influencers.push(influencer.clone());
        Ok(influencer)
    }

    async fn list_influencers(&self, filter: &InfluencerFilter) -> StoreResult<Vec<Influencer>> {
        let mut rows: Vec<Influencer> = self
            .tables()?
            .influencers
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.follower_count
                .cmp(&a.follower_count)
                .then(a.id.cmp(&b.id))
        });
        Ok(rows)
    }
}
