use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::models::user::{Role, User};
use crate::state::AppState;

#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: Role,
    pub username: String,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let auth_header = match req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok()) {
        Some(h) => h,
        None => return AppError::unauthorized("Missing Authorization header").into_response(),
    };

    // Expect "Bearer <token>"
    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return AppError::unauthorized("Invalid Authorization format").into_response(),
    };

    let claims = match verify_token(token, &state.config.jwt_secret) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        role: claims.role,
        username: claims.username,
    });

    next.run(req).await
}

/// Tokens outlive the account state they were signed with; this is checked against the row.
pub fn ensure_active(user: Option<User>) -> Result<User, AppError> {
    match user {
        Some(user) if user.is_active => Ok(user),
        Some(_) => Err(AppError::forbidden("User inactive")),
        None => Err(AppError::unauthorized("User no longer exists")),
    }
}

/// Layered inside `require_auth`; expects the `AuthContext` extension.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let user_id = match req.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.is_admin() => ctx.user_id,
        Some(ctx) => {
            tracing::warn!(user = %ctx.username, "Non-admin attempted admin route");
            return AppError::forbidden("Access denied. You do not have admin privileges.").into_response();
        }
        None => return AppError::unauthorized("Missing authentication").into_response(),
    };

    let user = match User::find_by_id(&state.db_pool, user_id).await {
        Ok(user) => user,
        Err(e) => return AppError::from(e).into_response(),
    };
    if let Err(e) = ensure_active(user) {
        tracing::warn!(user_id, "Inactive account attempted admin route");
        return e.into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;

    fn user(is_active: bool) -> User {
        User {
            id: 3,
            username: "meera".into(),
            password_hash: String::new(),
            role: "admin".into(),
            is_active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn active_users_pass() {
        assert_eq!(ensure_active(Some(user(true))).unwrap().id, 3);
    }

    #[test]
    fn deactivated_users_are_forbidden() {
        let err = ensure_active(Some(user(false))).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn deleted_users_are_unauthorized() {
        let err = ensure_active(None).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
