use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Influencer profile attached to exactly one user.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Influencer {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub follower_count: i64,
    pub bio: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Validated input for a new profile.
#[derive(Debug, Clone)]
pub struct NewInfluencer {
    pub user_id: i64,
    pub username: String,
    pub follower_count: i64,
    pub bio: Option<String>,
}

/// Search criteria; every field is optional and bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct InfluencerFilter {
    pub keyword: Option<String>,
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
}

impl InfluencerFilter {
    /// Case-insensitive substring match on username or bio plus the
    /// follower range. Mirrors the SQL in `Influencer::search`.
    pub fn matches(&self, influencer: &Influencer) -> bool {
        let keyword_ok = match &self.keyword {
            None => true,
            Some(k) => {
                let k = k.to_lowercase();
                influencer.username.to_lowercase().contains(&k)
                    || influencer
                        .bio
                        .as_deref()
                        .is_some_and(|b| b.to_lowercase().contains(&k))
            }
        };
        keyword_ok
            && self.min_followers.map_or(true, |m| influencer.follower_count >= m)
            && self.max_followers.map_or(true, |m| influencer.follower_count <= m)
    }
}
