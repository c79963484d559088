use sqlx::PgPool;

use super::repo_types::{Influencer, InfluencerFilter, NewInfluencer};
use crate::store::StoreResult;

const COLUMNS: &str = "id, user_id, username, follower_count, bio, created_at, updated_at";

/// Escapes LIKE metacharacters so the keyword is matched literally.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl Influencer {
    pub async fn find_by_username(db: &PgPool, username: &str) -> StoreResult<Option<Influencer>> {
        let row = sqlx::query_as::<_, Influencer>(&format!(
            "SELECT {COLUMNS} FROM influencers WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_user_id(db: &PgPool, user_id: i64) -> StoreResult<Option<Influencer>> {
        let row = sqlx::query_as::<_, Influencer>(&format!(
            "SELECT {COLUMNS} FROM influencers WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, new: &NewInfluencer) -> StoreResult<Influencer> {
        let row = sqlx::query_as::<_, Influencer>(&format!(
            r#"
            INSERT INTO influencers (user_id, username, follower_count, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(&new.username)
        .bind(new.follower_count)
        .bind(&new.bio)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn search(db: &PgPool, filter: &InfluencerFilter) -> StoreResult<Vec<Influencer>> {
        let rows = sqlx::query_as::<_, Influencer>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM influencers
            WHERE ($1::text IS NULL OR username ILIKE $1 OR bio ILIKE $1)
              AND ($2::bigint IS NULL OR follower_count >= $2)
              AND ($3::bigint IS NULL OR follower_count <= $3)
            ORDER BY follower_count DESC, id ASC
            "#
        ))
        .bind(filter.keyword.as_deref().map(like_pattern))
        .bind(filter.min_followers)
        .bind(filter.max_followers)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
