use std::sync::Arc;

use tracing::info;

use crate::domain::RepositoryError;
use crate::domain::ids::UserId;
use crate::domain::repositories::{TokenRepository, UserRepository};
use crate::domain::tokens::{IssuedToken, NewToken, ProvisionedUser};
use crate::domain::users::NewUser;
use crate::infrastructure::auth::{generate_token, hash_token};

#[derive(Clone)]
pub struct TokenService {
    tokens: Arc<dyn TokenRepository>,
    users: Arc<dyn UserRepository>,
}

impl TokenService {
    pub fn new(tokens: Arc<dyn TokenRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// Creates a token; the returned secret is not retrievable later.
    pub async fn issue(&self, user_id: UserId, name: &str) -> Result<IssuedToken, RepositoryError> {
        let secret = generate_token();
        let token = self
            .tokens
            .insert(NewToken::new(user_id, hash_token(&secret), name.to_string()))
            .await?;
        info!(token_id = %token.id, %user_id, "api token issued");
        Ok(IssuedToken { token, secret })
    }

    /// Creates a user together with its first token.
    pub async fn provision(&self, new_user: NewUser) -> Result<ProvisionedUser, RepositoryError> {
        let user = self.users.insert(new_user).await?;
        let token = self.issue(user.id, "initial").await?;
        Ok(ProvisionedUser { user, token })
    }

    /// Creates an `admin` user with a token when the database has no users.
    pub async fn bootstrap_admin(&self) -> Result<Option<IssuedToken>, RepositoryError> {
        if self.users.exists().await? {
            return Ok(None);
        }
        let provisioned = self.provision(NewUser::admin("admin")).await?;
        Ok(Some(provisioned.token))
    }
}
