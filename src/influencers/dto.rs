use serde::{Deserialize, Serialize};

use super::repo_types::Influencer;

/// Request body for attaching an influencer profile.
#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    pub username: String,
    pub follower_count: i64,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Query string for `/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct InfluencerResponse {
    pub status: &'static str,
    pub data: Influencer,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub status: &'static str,
    pub count: usize,
    pub data: Vec<Influencer>,
}
