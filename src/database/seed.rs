use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::user::{NewUser, Role, User};
use crate::repository::UserRepository;
use crate::utils::crypto::hash_password;

/// Creates the bootstrap admin account unless a user with the configured
/// email already exists. An existing account is left untouched.
pub async fn seed_default_admin(
    users: &dyn UserRepository,
    config: &Config,
) -> Result<Option<User>> {
    if users.find_by_email(&config.admin_email).await?.is_some() {
        tracing::debug!(email = %config.admin_email, "admin account already present");
        return Ok(None);
    }

    let password_hash = hash_password(&config.admin_password)
        .map_err(|e| Error::Internal(format!("Failed to hash admin password: {}", e)))?;

    let created = users
        .create(NewUser {
            email: config.admin_email.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await;

    match created {
        Ok(user) => {
            tracing::info!(email = %user.email, "default admin account created");
            Ok(Some(user))
        }
        // another instance won the race
        Err(Error::Conflict(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
