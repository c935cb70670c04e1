use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{TokenId, UserId};
use crate::domain::users::User;

/// A bearer token. Only the SHA-256 hash of the secret is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub user_id: UserId,
    pub name: String,
    #[serde(skip)]
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Token {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewToken {
    pub user_id: UserId,
    pub token_hash: String,
    pub name: String,
}

impl NewToken {
    pub fn new(user_id: UserId, token_hash: String, name: String) -> Self {
        Self {
            user_id,
            token_hash,
            name,
        }
    }
}

/// Returned once when a token is created; `secret` is never shown again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: Token,
    pub secret: String,
}

/// Returned by the admin endpoint that provisions a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedUser {
    pub user: User,
    pub token: IssuedToken,
}
