use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::{
    dto::{InfluencerResponse, OnboardingRequest, SearchQuery, SearchResponse},
    repo_types::{InfluencerFilter, NewInfluencer},
};
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    extract::{JsonBody, QueryParams},
    state::AppState,
    store::StoreError,
};

pub const MAX_BIO_CHARS: usize = 100;
pub const MAX_USERNAME_CHARS: usize = 50;

pub fn influencer_routes() -> Router<AppState> {
    Router::new()
        .route("/onboarding", post(onboarding))
        .route("/search", get(search))
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.]{1,50}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

fn validate(payload: &OnboardingRequest) -> Result<(), AppError> {
    if !is_valid_username(&payload.username) {
        return Err(AppError::Validation(format!(
            "Username must be 1-{MAX_USERNAME_CHARS} letters, digits, '_' or '.'"
        )));
    }
    if payload.follower_count < 0 {
        return Err(AppError::Validation(
            "Follower count must not be negative".into(),
        ));
    }
    if payload
        .bio
        .as_deref()
        .is_some_and(|b| b.chars().count() > MAX_BIO_CHARS)
    {
        return Err(AppError::Validation(format!(
            "Bio must be at most {MAX_BIO_CHARS} characters"
        )));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn onboarding(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(mut payload): JsonBody<OnboardingRequest>,
) -> Result<(StatusCode, Json<InfluencerResponse>), AppError> {
    payload.username = payload.username.trim().to_string();
    validate(&payload)?;

    if state
        .store
        .find_influencer_by_username(&payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(AppError::Forbidden("Username already taken".into()));
    }
    if state.store.find_influencer_by_user_id(user_id).await?.is_some() {
        warn!(user_id, "user already has an influencer profile");
        return Err(AppError::Forbidden(
            "User already has an influencer profile".into(),
        ));
    }

    let new = NewInfluencer {
        user_id,
        username: payload.username,
        follower_count: payload.follower_count,
        bio: payload.bio,
    };
    let influencer = match state.store.create_influencer(new).await {
        Ok(i) => i,
        Err(StoreError::Conflict) => {
            return Err(AppError::Forbidden(
                "Influencer profile already exists".into(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id, influencer_id = influencer.id, "influencer onboarded");
    Ok((
        StatusCode::CREATED,
        Json(InfluencerResponse {
            status: "success",
            data: influencer,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    if let (Some(min), Some(max)) = (q.min_followers, q.max_followers) {
        if min > max {
            return Err(AppError::Validation(
                "min_followers must not exceed max_followers".into(),
            ));
        }
    }

    let filter = InfluencerFilter {
        keyword: q
            .keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty()),
        min_followers: q.min_followers,
        max_followers: q.max_followers,
    };
    let data = state.store.list_influencers(&filter).await?;

    Ok(Json(SearchResponse {
        status: "success",
        count: data.len(),
        data,
    }))
}
