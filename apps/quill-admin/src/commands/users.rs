//! Account management.

use anyhow::{Context, Result, bail};
use clap::Args;

use quill_core::domain::User;
use quill_core::ports::{BaseRepository, PasswordService, UserRepository};
use quill_infra::MIN_PASSWORD_LEN;

#[derive(Debug, Args)]
pub struct CreateUserArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Grant the staff role
    #[arg(long)]
    pub staff: bool,
}

pub async fn create_user(
    users: &dyn UserRepository,
    passwords: &dyn PasswordService,
    args: CreateUserArgs,
) -> Result<User> {
    User::validate_username(&args.username)?;
    if args.password.chars().count() < MIN_PASSWORD_LEN {
        bail!("Password must be at least {MIN_PASSWORD_LEN} characters");
    }
    if users.find_by_username(&args.username).await?.is_some() {
        bail!("User '{}' already exists", args.username);
    }

    let hash = passwords.hash(&args.password)?;
    let mut user = User::new(args.username, args.email, hash);
    user.is_staff = args.staff;

    let user = users.insert(user).await.context("Failed to create user")?;
    tracing::info!(user_id = %user.id, staff = user.is_staff, "User created");
    Ok(user)
}

pub async fn set_staff(users: &dyn UserRepository, username: &str, staff: bool) -> Result<User> {
    let Some(mut user) = users.find_by_username(username).await? else {
        bail!("No user named '{username}'");
    };

    user.is_staff = staff;
    let user = users
        .update(user)
        .await
        .with_context(|| format!("Failed to update user '{username}'"))?;
    tracing::info!(user_id = %user.id, staff, "Staff role changed");
    Ok(user)
}
