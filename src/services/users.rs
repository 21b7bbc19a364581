//! Authentication, registration and member management

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::{AdminConfig, AuthConfig},
    error::{AppError, AppResult},
    models::user::{ChangePassword, RegisterRequest, UpdateEmail, User, UserClaims},
    repository::{
        invite_codes::InviteCodesRepository,
        users::{UserCleanupStep, UsersRepository},
        Repository,
    },
};

/// Invite code issued together with the bootstrap administrator
pub const BOOTSTRAP_INVITE_CODE: &str = "WELCOME1";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email (when the login contains `@`) or by exact name
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let login = login.trim();
        let user = if login.contains('@') {
            self.repository.users.find_by_email(&normalize_email(login)).await?
        } else {
            self.repository.users.find_by_name(login).await?
        }
        .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid login or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((token, user))
    }

    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    pub fn token_lifetime_secs(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    /// Create an account and redeem the invite code in one transaction
    pub async fn register(&self, mut request: RegisterRequest) -> AppResult<User> {
        request.email = normalize_email(&request.email);
        request.validate()?;
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        let email = &request.email;
        let code = request.invite_code.trim().to_uppercase();
        let password_hash = self.hash_password(&request.password)?;

        let mut tx = self.repository.pool.begin().await?;

        let invite = InviteCodesRepository::find_by_code_tx(&mut tx, &code)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid invite code".to_string()))?;
        if invite.is_used() {
            return Err(AppError::Conflict("Invite code has already been used".to_string()));
        }

        let now = Utc::now();
        let user = UsersRepository::insert_tx(&mut tx, name, email, &password_hash, false, now).await?;

        if !InviteCodesRepository::redeem_tx(&mut tx, invite.id, user.id, now).await? {
            return Err(AppError::Conflict("Invite code has already been used".to_string()));
        }

        tx.commit().await?;

        tracing::info!(user_id = user.id, invite_code = %code, "Member registered");
        Ok(user)
    }

    /// Create the first administrator and its welcome code when no admin exists
    pub async fn ensure_admin(&self, admin: &AdminConfig) -> AppResult<Option<User>> {
        if self.repository.users.admin_exists().await? {
            return Ok(None);
        }

        let password_hash = self.hash_password(&admin.password)?;
        let user = self
            .repository
            .users
            .create(admin.name.trim(), &normalize_email(&admin.email), &password_hash, true)
            .await?;

        self.repository
            .invite_codes
            .create_if_absent(BOOTSTRAP_INVITE_CODE, user.id)
            .await?;

        tracing::info!(user_id = user.id, email = %user.email, "Bootstrap administrator created");
        Ok(Some(user))
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Remove a member, reassigning or detaching everything that references them
    pub async fn delete_user(&self, target_id: i64, admin_id: i64) -> AppResult<()> {
        if target_id == admin_id {
            return Err(AppError::SelfDeletion);
        }

        let mut tx = self.repository.pool.begin().await?;

        if !UsersRepository::exists_tx(&mut tx, target_id).await? {
            return Err(AppError::NotFound(format!("User with id {} not found", target_id)));
        }

        for step in UserCleanupStep::ORDERED {
            let affected = step.apply(&mut tx, target_id, admin_id).await.map_err(|e| {
                AppError::Integrity(format!(
                    "Removing user {} failed at {:?}: {}",
                    target_id, step, e
                ))
            })?;
            tracing::debug!(user_id = target_id, ?step, affected, "Cleanup step applied");
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Integrity(format!("Removing user {} failed: {}", target_id, e)))?;

        tracing::info!(user_id = target_id, admin_id, "User deleted");
        Ok(())
    }

    /// Admin password reset
    pub async fn reset_password(&self, user_id: i64, password: &str) -> AppResult<()> {
        let hash = self.hash_password(password)?;
        self.repository.users.update_password(user_id, &hash).await?;
        tracing::info!(user_id, "Password reset by administrator");
        Ok(())
    }

    pub async fn update_email(&self, user_id: i64, mut request: UpdateEmail) -> AppResult<User> {
        request.email = normalize_email(&request.email);
        request.validate()?;
        if self.repository.users.email_exists(&request.email, Some(user_id)).await? {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }
        self.repository.users.update_email(user_id, &request.email).await
    }

    pub async fn change_password(&self, user_id: i64, request: &ChangePassword) -> AppResult<()> {
        request.validate()?;
        let user = self.repository.users.get_by_id(user_id).await?;
        if !self.verify_password(&user, &request.current_password)? {
            return Err(AppError::Authorization("Current password is incorrect".to_string()));
        }

        let hash = self.hash_password(&request.new_password)?;
        self.repository.users.update_password(user_id, &hash).await?;
        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
