use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    accounts::{
        dto::{
            AuthResponse, Gender, Language, LoginRequest, MessageResponse, ProfileResponse,
            PublicUser, RegisterRequest, ResetPasswordRequest, UpdateProfileRequest, DEFAULT_AGE,
        },
        extractors::AuthUser,
        jwt::TokenKeys,
        services,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/reset-password", post(reset_password))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/account", delete(delete_account))
}

fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.-]{1,32}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, String)> {
    payload.username = payload.username.trim().to_string();

    if !is_valid_username(&payload.username) {
        warn!(username = %payload.username, "invalid username");
        return Err((StatusCode::BAD_REQUEST, "Invalid username".into()));
    }

    if payload.password.is_empty() {
        warn!("empty password");
        return Err((StatusCode::BAD_REQUEST, "Password must not be empty".into()));
    }

    let created = match services::register(&state.db, &payload.username, &payload.password).await {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "register failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    if !created {
        warn!(username = %payload.username, "username already registered");
        return Err((StatusCode::CONFLICT, "Username already exists".into()));
    }

    info!(username = %payload.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registration successful, please log in".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let user = match services::login(&state.db, &payload.username, &payload.password).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            // One outcome for unknown user and wrong password alike.
            warn!(username = %payload.username, "login rejected");
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".into(),
            ));
        }
        Err(e) => {
            error!(error = %e, "login failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let keys = TokenKeys::from_ref(&state);
    let token = match keys.mint(&user.username, Some(keys.session_ttl)) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "token mint failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser {
            id: user.id,
            username: user.username,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    if payload.new_password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Password must not be empty".into()));
    }

    // Succeeds whether or not the username exists; the update matches zero
    // rows for unknown names.
    services::reset_password(&state.db, &payload.username, &payload.new_password)
        .await
        .map_err(|e| {
            error!(error = %e, "password reset failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!(username = %payload.username, "password reset");
    Ok(Json(MessageResponse {
        message: "Password reset successful, please log in".into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let profile = services::fetch_profile(&state.db, &username)
        .await
        .map_err(|e| {
            error!(error = %e, "fetch profile failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or_else(|| {
            warn!(username = %username, "profile requested for missing user");
            (StatusCode::NOT_FOUND, "User not found".to_string())
        })?;

    Ok(Json(ProfileResponse {
        username,
        age: profile.age.unwrap_or(DEFAULT_AGE),
        gender: profile
            .gender
            .as_deref()
            .and_then(Gender::parse)
            .unwrap_or_default(),
        language: profile
            .language
            .as_deref()
            .and_then(Language::parse)
            .unwrap_or_default(),
        account_created: profile.account_created,
        last_login: profile.last_login,
        last_profile_update: profile.last_profile_update,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    if !(1..=120).contains(&payload.age) {
        warn!(age = payload.age, "age out of range");
        return Err((
            StatusCode::BAD_REQUEST,
            "Age must be between 1 and 120".into(),
        ));
    }

    services::update_profile(
        &state.db,
        &username,
        payload.age,
        payload.gender.as_str(),
        payload.language.as_str(),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "profile update failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(username = %username, "profile updated");
    Ok(Json(MessageResponse {
        message: "Profile updated".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    services::delete_account(&state.db, &username)
        .await
        .map_err(|e| {
            error!(error = %e, "account deletion failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!(username = %username, "account deleted");
    Ok(Json(MessageResponse {
        message: "Account deleted".into(),
    }))
}
