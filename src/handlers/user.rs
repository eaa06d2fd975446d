use bcrypt::{hash, verify, DEFAULT_COST};
use crate::config::AdminSeed;
use crate::dtos::user::{CreateUserRequest, UserResponse, LoginRequest, LoginResponse};
use crate::auth::jwt::sign_token;
use crate::error::{map_unique_violation, AppError};
use crate::extractors::AppJson;
use axum::{extract::State, http::StatusCode, Json};
use crate::models::user::{Role, User};
use crate::state::AppState;
use crate::middleware::auth::{ensure_active, AuthContext};
use axum::extract::Extension;
use sqlx::PgPool;
use tokio::task;
use tracing::{info, instrument, warn};

pub const MIN_PASSWORD_LEN: usize = 8;

fn to_response(user: User) -> Result<UserResponse, AppError> {
    Ok(UserResponse {
        role: user.role()?,
        id: user.id,
        username: user.username,
        is_active: user.is_active,
        created_at: user.created_at,
    })
}

// bcrypt is CPU-bound; keep it off the async workers
async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Hash task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let (password, password_hash) = (password.to_owned(), password_hash.to_owned());
    task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AppError::internal(format!("Verify task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))
}

// POST /admin/users - Admins create admin or contributor accounts
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation("Password too short"));
    }

    let password_hash = hash_password(&payload.password).await?;
    let user = User::insert(&state.db_pool, username, &password_hash, payload.role)
        .await
        .map_err(|e| map_unique_violation(e, "Username already exists"))?;

    info!(id = user.id, role = %payload.role, "User created");
    Ok((StatusCode::CREATED, Json(to_response(user)?)))
}

// POST /auth/login
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    // Unknown user and wrong password look the same to the caller
    let user = User::find_by_username(&state.db_pool, payload.username.trim())
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let ok = verify_password(&payload.password, &user.password_hash).await?;
    if !ok {
        warn!("Failed login attempt");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    if !user.is_active {
        return Err(AppError::forbidden("User inactive"));
    }

    let role = user.role()?;
    let config = &state.config;
    let token = sign_token(user.id, role, &user.username, &config.jwt_secret, config.jwt_ttl_hours)?;

    info!(id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in_seconds: config.jwt_ttl_hours * 60 * 60,
        role,
    }))
}

// GET /auth/me - Full profile for the id in AuthContext
pub async fn get_me(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>
) -> Result<Json<UserResponse>, AppError> {
    let user = ensure_active(User::find_by_id(&db_pool, auth.user_id).await?)?;

    Ok(Json(to_response(user)?))
}

// POST /auth/logout - Tokens are stateless; the client discards its copy
pub async fn logout_user(Extension(auth): Extension<AuthContext>) -> StatusCode {
    info!(user = %auth.username, "User logged out");
    StatusCode::NO_CONTENT
}

/// Creates the configured admin account on first start.
pub async fn bootstrap_admin(db_pool: &PgPool, seed: &AdminSeed) -> Result<(), AppError> {
    if User::find_by_username(db_pool, &seed.username).await?.is_some() {
        return Ok(());
    }
    if seed.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::internal("ADMIN_PASSWORD is too short"));
    }

    let password_hash = hash_password(&seed.password).await?;
    let user = User::insert(db_pool, &seed.username, &password_hash, Role::Admin).await?;
    info!(id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("correct horse").await.unwrap();
        assert!(verify_password("correct horse", &hashed).await.unwrap());
        assert!(!verify_password("wrong horse", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn short_password_is_rejected_before_hashing() {
        let payload = CreateUserRequest {
            username: "alice".into(),
            password: "short".into(),
            role: Role::Contributor,
        };
        let err = create_user(State(AppState::lazy_for_tests()), AppJson(payload))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
