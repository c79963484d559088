use serde::{Deserialize, Serialize};

use super::repo_types::PublicUser;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: &'static str,
    pub data: PublicUser,
}

/// Response returned after login; the tokens are also set as cookies.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub access_token: String,
    pub refresh_token: String,
    pub data: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}
