//! Authentication flow and authorization gate
//!
//! The gate is a pair of composable extractors: `RequireAuth` verifies
//! the bearer token and attaches the authenticated context, and
//! `RequireAdmin` layers a role check on top of it. Role checks never
//! run against an unauthenticated request since `RequireAdmin` can only
//! succeed through `RequireAuth`.

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    routing::post,
};
use pictor_auth::{AuthError, AuthUser, extract_bearer_token, hash_password, verify_password};
use pictor_db::{NewUser, UserRole};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UserResponse,
};

// ==================== Gate Extractors ====================

/// Extractor for authenticated requests
pub struct RequireAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Auth(AuthError::MissingAuthHeader))?;

        let token = extract_bearer_token(auth_header).map_err(ApiError::Auth)?;
        let claims = app_state.jwt.validate_token(token).map_err(ApiError::Auth)?;
        let user = AuthUser::from_claims(&claims);

        debug!(
            "Authenticated user: {} ({})",
            user.username,
            user.role.as_str()
        );
        Ok(RequireAuth(user))
    }
}

/// Extractor for admin-only requests
pub struct RequireAdmin(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(ApiError::Forbidden);
        }

        Ok(RequireAdmin(user))
    }
}

// ==================== Input Validation ====================

/// Maximum allowed username length
const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed email length
const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;
/// Minimum allowed password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate username format and length
fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username cannot be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    // Only allow alphanumeric characters, underscores, and hyphens
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::BadRequest(
            "Username can only contain alphanumeric characters, underscores, and hyphens"
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate email shape and length
fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::BadRequest("Email cannot be empty".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Email exceeds maximum length of {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    if !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    Ok(())
}

/// Validate password length
fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

// ==================== Auth Routes ====================

/// POST /api/auth/register
///
/// Creates a new identity. No token is issued; the user logs in
/// afterwards. The response is a public projection without the hash.
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_username(&request.username)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    let role = match &request.role {
        Some(role_str) => UserRole::from_str(role_str)
            .map_err(|_| ApiError::BadRequest(format!("Invalid role: {}", role_str)))?,
        None => UserRole::default(),
    };

    debug!("Registering user: {}", request.username);

    let password_hash = hash_password(&request.password)?;

    let user = state
        .db
        .insert_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            role,
        })
        .await?;

    info!("Registered user: {}", user.username);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/auth/login
///
/// An unknown username and a wrong password are reported as distinct
/// outcomes, matching the registration-era behavior callers rely on.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Length caps only. Shape rules are a registration concern, and
    // enforcing them here would turn an unknown username into a 400
    // instead of the not-found outcome callers rely on.
    if request.username.len() > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    if request.password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }

    debug!("Login attempt for user: {}", request.username);

    let user = state
        .db
        .get_user_by_username(&request.username)
        .await?
        .ok_or(ApiError::Auth(AuthError::UserNotFound))?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(ApiError::Auth(AuthError::InvalidCredentials));
    }

    let token = state
        .jwt
        .generate_token(user.id, &user.username, user.role.as_str())?;

    info!("User {} logged in successfully", user.username);

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt.expires_in_secs(),
    }))
}

/// POST /api/auth/change-password (authenticated)
///
/// Outstanding tokens are not revoked; they stay valid until their
/// natural expiry.
async fn change_password(
    RequireAuth(auth_user): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    validate_password(&request.new_password)?;

    // A valid token should always resolve to a user, but the account
    // could have been removed out of band.
    let user = state
        .db
        .get_user_by_id(auth_user.id)
        .await?
        .ok_or(ApiError::Auth(AuthError::UserNotFound))?;

    if !verify_password(&request.old_password, &user.password_hash)? {
        return Err(ApiError::Auth(AuthError::InvalidCredentials));
    }

    let password_hash = hash_password(&request.new_password)?;
    state.db.update_user_password(user.id, &password_hash).await?;

    info!("User {} changed password", user.username);

    Ok(StatusCode::OK)
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/change-password", post(change_password))
}
