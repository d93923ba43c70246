use std::sync::Arc;

use validator::Validate;

use crate::dto::auth_dto::{AuthSession, LoginPayload, RegisterPayload};
use crate::error::{Error, Result};
use crate::models::user::{NewUser, Role, User, UserResponse};
use crate::repository::UserRepository;
use crate::utils::{
    crypto::{hash_password, verify_password},
    token::issue_session_token,
    validation::non_blank,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
    session_ttl_hours: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_secret: String, session_ttl_hours: i64) -> Self {
        Self {
            users,
            jwt_secret,
            session_ttl_hours,
        }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthSession> {
        let (Some(email), Some(password)) = (
            non_blank(payload.email.as_deref()),
            payload.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(Error::BadRequest("Email and password are required".to_string()));
        };
        payload.validate()?;

        // self-registration never grants admin; anything else falls back too
        let role = match non_blank(payload.role.as_deref()).and_then(Role::parse) {
            Some(role @ (Role::Applicant | Role::Recruiter)) => role,
            _ => Role::Applicant,
        };

        if self.users.find_by_email(email).await?.is_some() {
            return Err(Error::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;
        // the unique index still guards a concurrent registration
        let user = self
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = role.as_str(), "user registered");
        self.session_for(user)
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<AuthSession> {
        let (Some(email), Some(password)) = (
            non_blank(payload.email.as_deref()),
            payload.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(Error::BadRequest("Email and password are required".to_string()));
        };

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| Error::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        // a banned account is refused whatever the password
        if user.banned {
            tracing::info!(user_id = %user.id, "login refused for banned account");
            return Err(Error::Forbidden(format!(
                "Your account has been banned. Reason: {}",
                user.ban_reason.as_deref().unwrap_or("No reason provided")
            )));
        }

        let valid = verify_password(password, &user.password_hash).map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "stored password hash is unreadable");
            Error::Internal("Failed to verify password".to_string())
        })?;
        if !valid {
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.session_for(user)
    }

    fn session_for(&self, user: User) -> Result<AuthSession> {
        let token = issue_session_token(&user, &self.jwt_secret, self.session_ttl_hours)?;
        Ok(AuthSession {
            user: UserResponse::from(user),
            token,
        })
    }
}
