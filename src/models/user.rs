use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Contributor,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Contributor => "contributor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "contributor" => Ok(Role::Contributor),
            other => Err(format!("Invalid role: {other}")),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Rows are constrained by a CHECK, so an unknown role means the schema drifted.
    pub fn role(&self) -> Result<Role, sqlx::Error> {
        self.role.parse().map_err(|e: String| sqlx::Error::Decode(e.into()))
    }

    pub async fn find_by_username<'e, E: PgExecutor<'e>>(
        executor: E,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, is_active, created_at
             FROM users WHERE username = $1"
        )
        .bind(username)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, is_active, created_at
             FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING id, username, password_hash, role, is_active, created_at"
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(executor)
        .await
    }
}
