use chrono::{Utc, Duration};
use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Serialize, Deserialize};
use crate::error::AppError;
use crate::models::user::Role;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
    pub username: String,
}

pub fn sign_token(
    user_id: i64,
    role: Role,
    username: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = now + Duration::hours(ttl_hours);
    let claims = Claims {
        sub: user_id,
        role,
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
        username: username.to_string(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::internal(format!("Token signing failed: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256)
    )
    .map(|d| d.claims)
    .map_err(|e| AppError::unauthorized(format!("Invalid or expired token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips() {
        let token = sign_token(7, Role::Admin, "root", "s3cret", 8).unwrap();
        let claims = verify_token(&token, "s3cret").unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.username, "root");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_token(1, Role::Contributor, "alice", "right", 8).unwrap();
        let err = verify_token(&token, "wrong").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Past the default 60s leeway
        let token = sign_token(1, Role::Admin, "root", "s3cret", -1).unwrap();
        assert!(verify_token(&token, "s3cret").is_err());
    }
}
