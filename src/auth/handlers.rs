use axum::{
    extract::State,
    http::{header, StatusCode},
    response::AppendHeaders,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, RegisterResponse, StatusResponse},
        extractors::RefreshToken,
        password::hash_password,
        session::normalize_email,
    },
    error::AppError,
    extract::JsonBody,
    state::AppState,
    store::StoreError,
};

pub const MIN_PASSWORD_LEN: usize = 8;

type SetCookies = AppendHeaders<Vec<(header::HeaderName, String)>>;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", get(refresh))
        .route("/logout", get(logout))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn set_cookies(values: Vec<String>) -> SetCookies {
    AppendHeaders(
        values
            .into_iter()
            .map(|v| (header::SET_COOKIE, v))
            .collect(),
    )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(mut payload): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if state.store.find_user_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Forbidden("Email already registered".into()));
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::Internal(e)
    })?;

    let user = match state.store.create_user(&payload.email, &hash).await {
        Ok(u) => u,
        Err(StoreError::Conflict) => {
            warn!(email = %payload.email, "email registered concurrently");
            return Err(AppError::Forbidden("Email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "success",
            data: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<(SetCookies, Json<LoginResponse>), AppError> {
    let session = state.sessions.login(&payload.email, &payload.password).await?;
    let cookies = state
        .sessions
        .login_cookies(&session)
        .render(&state.cookie_policy);

    Ok((
        set_cookies(cookies),
        Json(LoginResponse {
            status: "success",
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            data: session.user,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    RefreshToken(token): RefreshToken,
) -> Result<(SetCookies, Json<RefreshResponse>), AppError> {
    let token = token.ok_or_else(|| AppError::RefreshFailed(anyhow::anyhow!("no refresh token")))?;
    let access_token = state.sessions.refresh(&token).await?;
    let cookies = state
        .sessions
        .refresh_cookies(&access_token)
        .render(&state.cookie_policy);

    Ok((set_cookies(cookies), Json(RefreshResponse { access_token })))
}

#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> (SetCookies, Json<StatusResponse>) {
    let cookies = state.sessions.logout().render(&state.cookie_policy);
    (set_cookies(cookies), Json(StatusResponse { status: "success" }))
}
