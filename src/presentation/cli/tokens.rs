use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use crate::domain::ids::TokenId;
use crate::domain::users::NewUser;
use crate::infrastructure::client::ReadlogClient;

#[derive(Debug, Subcommand)]
pub enum TokenCommands {
    /// Create a new API token
    Create(CreateTokenCommand),
    /// List your API tokens
    List,
    /// Revoke an API token
    Revoke(RevokeTokenCommand),
}

pub async fn run(client: &ReadlogClient, cmd: TokenCommands) -> Result<()> {
    match cmd {
        TokenCommands::Create(c) => {
            let issued = client.tokens().create(&c.name).await?;
            eprintln!("Store this token now; it will not be shown again.");
            print_json(&issued)
        }
        TokenCommands::List => print_json(&client.tokens().list().await?),
        TokenCommands::Revoke(c) => {
            client.tokens().revoke(TokenId::new(c.id)).await?;
            eprintln!("Revoked token {}.", c.id);
            Ok(())
        }
    }
}

#[derive(Debug, Args)]
pub struct CreateTokenCommand {
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct RevokeTokenCommand {
    #[arg(long)]
    pub id: i64,
}

#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// Create a user and print its first API token
    Create(CreateUserCommand),
}

#[derive(Debug, Args)]
pub struct CreateUserCommand {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub admin: bool,
}

pub async fn run_users(client: &ReadlogClient, cmd: UserCommands) -> Result<()> {
    match cmd {
        UserCommands::Create(c) => {
            let new_user = if c.admin {
                NewUser::admin(c.username)
            } else {
                NewUser::new(c.username)
            };
            print_json(&client.tokens().create_user(&new_user).await?)
        }
    }
}
