//! User use-case service.
//!
//! # Responsibility
//! - Provide CRUD entry points over `UserRepository`.
//! - Hash credentials before they reach storage.
//!
//! # Invariants
//! - Username is checked for duplicates before email.
//! - Storage never receives a clear-text password from this service.
//! - `update_user` keeps a password equal to the stored hash, rejects any
//!   other hash-shaped value as stale, and hashes everything else, so neither
//!   clear text nor a hash-of-a-hash can be persisted.
//! - `get_all_users` fails with `NotFound` on an empty store, unlike
//!   `TaskService::get_all_tasks`.

use super::error::{EntityKind, ServiceError, ServiceResult};
use crate::model::user::{validate_email, User, UserId};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::security::password::{Argon2PasswordEncoder, PasswordEncoder};
use log::{info, warn};

/// Use-case service for user records.
pub struct UserService<R: UserRepository, E: PasswordEncoder = Argon2PasswordEncoder> {
    repo: R,
    encoder: E,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service with the default Argon2 encoder.
    pub fn new(repo: R) -> Self {
        Self::with_encoder(repo, Argon2PasswordEncoder::default())
    }
}

impl<R: UserRepository, E: PasswordEncoder> UserService<R, E> {
    /// Creates a service with a caller-provided hashing collaborator.
    pub fn with_encoder(repo: R, encoder: E) -> Self {
        Self { repo, encoder }
    }

    /// Hashes the password and persists a new user.
    ///
    /// # Errors
    /// - `Validation` for blank fields or a malformed email.
    /// - `Duplicate` when the username, then the email, is taken.
    pub fn add_user(&self, user: &User) -> ServiceResult<User> {
        user.validate()?;

        if self
            .repo
            .find_by_username(&user.username)
            .map_err(repo_err)?
            .is_some()
        {
            warn!("event=user_add module=service status=error error_code=duplicate_username");
            return Err(ServiceError::duplicate(EntityKind::User, "username"));
        }
        if self.repo.find_by_email(&user.email).map_err(repo_err)?.is_some() {
            warn!("event=user_add module=service status=error error_code=duplicate_email");
            return Err(ServiceError::duplicate(EntityKind::User, "email"));
        }

        let hashed = User {
            password: self.encoder.hash(&user.password)?,
            ..user.clone()
        };
        let created = self.repo.save(&hashed).map_err(repo_err)?;
        info!(
            "event=user_add module=service status=ok user_id={}",
            created.id.unwrap_or_default()
        );
        Ok(created)
    }

    pub fn get_user_by_username(&self, username: &str) -> ServiceResult<User> {
        if username.trim().is_empty() {
            return Err(ServiceError::Validation(
                "username must not be blank".to_string(),
            ));
        }

        self.repo
            .find_by_username(username)
            .map_err(repo_err)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::User, username))
    }

    pub fn get_user_by_email(&self, email: &str) -> ServiceResult<User> {
        validate_email(email)?;

        self.repo
            .find_by_email(email)
            .map_err(repo_err)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::User, email))
    }

    pub fn get_user_by_id(&self, id: UserId) -> ServiceResult<User> {
        self.repo
            .find_by_id(id)
            .map_err(repo_err)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::User, id))
    }

    /// Overwrites the stored user sharing `user.username`.
    ///
    /// The stored id is kept. A password equal to the stored hash passes
    /// through unchanged; any other hash is rejected as stale; anything else
    /// is treated as clear text and hashed.
    pub fn update_user(&self, user: &User) -> ServiceResult<User> {
        user.validate()?;

        let Some(existing) = self
            .repo
            .find_by_username(&user.username)
            .map_err(repo_err)?
        else {
            warn!("event=user_update module=service status=error error_code=not_found");
            return Err(ServiceError::not_found(EntityKind::User, &user.username));
        };

        let password = if user.password == existing.password {
            existing.password
        } else if self.encoder.is_hash(&user.password) {
            warn!("event=user_update module=service status=error error_code=stale_password_hash");
            return Err(ServiceError::Validation("stale password hash".to_string()));
        } else {
            self.encoder.hash(&user.password)?
        };

        let replacement = User {
            id: existing.id,
            username: user.username.clone(),
            email: user.email.clone(),
            password,
        };
        self.repo.save(&replacement).map_err(repo_err)
    }

    /// Removes the stored user sharing `user.username`.
    pub fn delete_user(&self, user: &User) -> ServiceResult<()> {
        if user.username.trim().is_empty() {
            return Err(ServiceError::Validation(
                "username must not be blank".to_string(),
            ));
        }

        let Some(existing) = self
            .repo
            .find_by_username(&user.username)
            .map_err(repo_err)?
        else {
            warn!("event=user_delete module=service status=error error_code=not_found");
            return Err(ServiceError::not_found(EntityKind::User, &user.username));
        };

        self.repo.delete(&existing).map_err(repo_err)?;
        info!(
            "event=user_delete module=service status=ok user_id={}",
            existing.id.unwrap_or_default()
        );
        Ok(())
    }

    /// Returns every user; an empty store is reported as `NotFound`.
    pub fn get_all_users(&self) -> ServiceResult<Vec<User>> {
        let users = self.repo.find_all().map_err(repo_err)?;
        if users.is_empty() {
            return Err(ServiceError::not_found(EntityKind::User, "no users stored"));
        }
        Ok(users)
    }

    /// Checks `clear` against the stored hash for `username`.
    pub fn verify_credentials(&self, username: &str, clear: &str) -> ServiceResult<bool> {
        let user = self.get_user_by_username(username)?;
        Ok(self.encoder.verify(clear, &user.password)?)
    }
}

fn repo_err(err: RepoError) -> ServiceError {
    ServiceError::from_repo(EntityKind::User, err)
}
