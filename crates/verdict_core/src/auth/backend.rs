//! Authentication backend contract and local SQLite accounts.
//!
//! # Responsibility
//! - Register and verify email/password accounts.
//! - Report failures as typed `AuthError`s.
//!
//! # Invariants
//! - Emails are stored trimmed and lowercased; one account per email.
//! - Passwords are never stored or logged; only salted SHA-256 digests.
//! - Unknown email and wrong password are the same error.

use crate::db::DbError;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug)]
pub enum AuthError {
    InvalidEmail(String),
    WeakPassword,
    EmailInUse(String),
    InvalidCredentials,
    NotSignedIn,
    Db(DbError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(email) => write!(f, "invalid email address: `{email}`"),
            Self::WeakPassword => write!(
                f,
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            ),
            Self::EmailInUse(email) => write!(f, "email already in use: {email}"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::NotSignedIn => write!(f, "no user is signed in"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for AuthError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Email/password authentication service.
pub trait AuthBackend {
    fn sign_up(&self, email: &str, password: &str) -> AuthResult<AuthUser>;
    fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthUser>;
    fn sign_out(&self, user: &AuthUser) -> AuthResult<()>;
}

/// Account backend over the `accounts` table.
pub struct SqliteAuthBackend<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthBackend<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AuthBackend for SqliteAuthBackend<'_> {
    fn sign_up(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::WeakPassword);
        }

        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = ?1);",
            [email.as_str()],
            |row| row.get(0),
        )?;
        if exists {
            warn!("event=auth_sign_up module=auth status=rejected reason=email_in_use");
            return Err(AuthError::EmailInUse(email));
        }

        let uid = Uuid::new_v4().to_string();
        let salt = Uuid::new_v4().simple().to_string();
        self.conn
            .execute(
                "INSERT INTO accounts (uid, email, password_salt, password_hash)
                 VALUES (?1, ?2, ?3, ?4);",
                params![uid, email, salt, hash_password(&salt, password)],
            )
            .map_err(|err| account_insert_error(err, &email))?;

        info!("event=auth_sign_up module=auth status=ok uid={uid}");
        Ok(AuthUser { uid, email })
    }

    fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let account = self
            .conn
            .query_row(
                "SELECT uid, password_salt, password_hash FROM accounts WHERE email = ?1;",
                [email.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match account {
            Some((uid, salt, stored_hash)) if hash_password(&salt, password) == stored_hash => {
                info!("event=auth_sign_in module=auth status=ok uid={uid}");
                Ok(AuthUser { uid, email })
            }
            _ => {
                warn!("event=auth_sign_in module=auth status=rejected reason=invalid_credentials");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    fn sign_out(&self, user: &AuthUser) -> AuthResult<()> {
        // Local accounts hold no server-side session to revoke.
        info!("event=auth_sign_out module=auth status=ok uid={}", user.uid);
        Ok(())
    }
}

/// A concurrent sign-up can pass the existence check and still lose the
/// UNIQUE race on insert; report that the same way as a visible duplicate.
fn account_insert_error(err: rusqlite::Error, email: &str) -> AuthError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => {
            warn!("event=auth_sign_up module=auth status=rejected reason=email_in_use");
            AuthError::EmailInUse(email.to_string())
        }
        _ => err.into(),
    }
}

fn normalize_email(email: &str) -> AuthResult<String> {
    let normalized = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&normalized) {
        return Err(AuthError::InvalidEmail(email.trim().to_string()));
    }
    Ok(normalized)
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
