//! User accounts: signup validation and credential derivation.
//!
//! The pipeline mirrors the account model's write path: normalize the
//! incoming form, run every field validator collecting all failures, then
//! derive the salted credential hash. Uniqueness lives behind
//! [`UserDirectory`] so the storage layer stays out of this crate.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

use tacks_core::model::UserId;

use crate::policy::ValidationPolicy;
use crate::validate::ValidationErrors;

/// The incoming signup form. Password material never outlives the call.
#[derive(Clone, Deserialize)]
pub struct Signup {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl fmt::Debug for Signup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signup")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A stored account record. The password itself is never stored; only the
/// salted digest derived at registration time.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Credentials stay out of logs.
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// What other users see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
        }
    }
}

/// What the account owner sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Uniqueness lookups. The persistence layer implements this; validation
/// only asks yes/no questions.
pub trait UserDirectory {
    fn username_taken(&self, username: &str) -> bool;
    fn email_taken(&self, email: &str) -> bool;
}

/// In-memory directory, for tests and single-process use.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    users: Vec<User>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user: User) {
        self.users.push(user);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserDirectory for MemoryDirectory {
    fn username_taken(&self, username: &str) -> bool {
        self.users.iter().any(|user| user.username == username)
    }

    fn email_taken(&self, email: &str) -> bool {
        self.users.iter().any(|user| user.email == email)
    }
}

/// Validate a signup and mint the account record.
///
/// Usernames and emails are lowercased before validation, so uniqueness
/// and lookups are case-insensitive by construction. Every failing check
/// is reported; the caller renders them per field.
#[tracing::instrument(skip_all)]
pub fn register(
    signup: Signup,
    directory: &impl UserDirectory,
    policy: &ValidationPolicy,
) -> Result<User, ValidationErrors> {
    let username = signup.username.trim().to_lowercase();
    let email = signup.email.trim().to_lowercase();

    let mut errors = ValidationErrors::new();

    if username.is_empty() {
        errors.push("username", "Username is required");
    } else {
        let length = username.chars().count();
        if length < policy.username_min || length > policy.username_max {
            errors.push(
                "username",
                format!(
                    "Username must be between {} and {} characters",
                    policy.username_min, policy.username_max
                ),
            );
        }
        if username.chars().any(char::is_whitespace) {
            errors.push("username", "Username must not contain spaces");
        }
        if directory.username_taken(&username) {
            errors.push("username", "Username is already in use");
        }
    }

    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !plausible_email(&email) {
        errors.push("email", "Email is not valid");
    } else if directory.email_taken(&email) {
        errors.push("email", "Email is already in use");
    }

    if signup.password.is_empty() {
        errors.push("password", "Password is required");
    } else if signup.password.chars().count() < policy.password_min {
        errors.push(
            "password",
            format!(
                "Password must be at least {} characters",
                policy.password_min
            ),
        );
    }

    if signup.confirmation.is_empty() {
        errors.push("confirmation", "Password confirmation is required");
    } else if signup.confirmation != signup.password {
        errors.push("confirmation", "Passwords do not match");
    }

    if !errors.is_empty() {
        debug!(failed = errors.len(), "signup rejected");
        return Err(errors);
    }

    let salt = generate_salt();
    let hash = derive_hash(&signup.password, &salt);
    let user = User {
        id: UserId::new(Uuid::new_v4().simple().to_string()),
        username,
        email,
        hash,
        salt,
        created_at: Utc::now(),
    };
    debug!(user = %user.username, "registered account");
    Ok(user)
}

/// Recompute the salted digest for a login attempt and compare.
#[must_use]
pub fn verify_password(user: &User, candidate: &str) -> bool {
    derive_hash(candidate, &user.salt) == user.hash
}

// Shape check only: one '@', non-empty local part, dotted domain. Real
// deliverability is the mail system's problem.
fn plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

fn derive_hash(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
