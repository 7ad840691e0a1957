//! First-run provisioning of the back-office account.

use showroom_db::models::user::CreateUser;
use showroom_db::repositories::UserRepo;
use showroom_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};

/// Create the admin named by `ADMIN_USERNAME` / `ADMIN_PASSWORD` if missing.
///
/// Does nothing when either variable is unset or the user already exists;
/// an existing account's password is never overwritten.
pub async fn ensure_admin(pool: &DbPool) -> AppResult<()> {
    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        tracing::debug!("ADMIN_USERNAME/ADMIN_PASSWORD not set; skipping admin provisioning");
        return Ok(());
    };
    provision_admin(pool, &username, &password).await
}

/// Create `username` with `password` unless the account exists.
pub async fn provision_admin(pool: &DbPool, username: &str, password: &str) -> AppResult<()> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Admin username must not be empty".into()));
    }
    if UserRepo::find_by_username(pool, username).await?.is_some() {
        tracing::debug!(username, "Admin account already present");
        return Ok(());
    }

    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(AppError::BadRequest)?;
    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, username, "Provisioned admin account");
    Ok(())
}
