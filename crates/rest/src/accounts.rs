//! Registration and login.
//!
//! Passwords are hashed with bcrypt on the blocking pool. Expected failures
//! (taken email, unknown email, wrong password, missing fields) are outcomes
//! shown inline on the form; only store and hashing failures are errors.

use serde::Deserialize;
use tracing::{debug, info};

use medisae_persistence::error::{AccountError, StorageError};
use medisae_persistence::types::{NewUser, UserRecord};
use medisae_persistence::UserStore;

use crate::error::{RestError, RestResult};

/// Shown when the email already belongs to an account.
pub const EMAIL_TAKEN_MESSAGE: &str = "Email is already registered. Try logging in.";
/// Shown after a successful registration.
pub const REGISTERED_MESSAGE: &str = "Registration successful! You can now log in.";
/// Shown when the password does not match.
pub const WRONG_PASSWORD_MESSAGE: &str = "The password you entered is incorrect.";
/// Shown when no account has the email.
pub const UNKNOWN_EMAIL_MESSAGE: &str = "No account found with that email address.";
/// Shown when a required registration field is blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Username, email and password are required.";
/// Shown when the age is not a whole number.
pub const INVALID_AGE_MESSAGE: &str = "Age must be a whole number.";

/// Registration form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    /// Display name.
    #[serde(default)]
    pub username: String,
    /// Login email, unique ignoring case.
    #[serde(default)]
    pub email: String,
    /// Optional age, a non-negative whole number when given.
    #[serde(default)]
    pub age: Option<String>,
    /// Optional profession.
    #[serde(default)]
    pub profession: Option<String>,
    /// Plain-text password, hashed before storage.
    #[serde(default)]
    pub password: String,
}

/// Login form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// Result of a registration attempt.
#[derive(Debug)]
pub enum RegistrationOutcome {
    /// The account was created.
    Registered(UserRecord),
    /// Another account already uses this email, ignoring case.
    EmailTaken,
    /// The form was incomplete or malformed.
    Invalid(&'static str),
}

impl RegistrationOutcome {
    /// The inline message for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            RegistrationOutcome::Registered(_) => REGISTERED_MESSAGE,
            RegistrationOutcome::EmailTaken => EMAIL_TAKEN_MESSAGE,
            RegistrationOutcome::Invalid(message) => message,
        }
    }
}

/// Result of a login attempt.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials matched.
    Authenticated(UserRecord),
    /// No account has this email.
    UnknownEmail,
    /// The account exists but the password is wrong.
    WrongPassword,
}

impl LoginOutcome {
    /// The inline message for a failed login.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            LoginOutcome::Authenticated(_) => None,
            LoginOutcome::UnknownEmail => Some(UNKNOWN_EMAIL_MESSAGE),
            LoginOutcome::WrongPassword => Some(WRONG_PASSWORD_MESSAGE),
        }
    }
}

/// Validates the form, hashes the password and stores the user.
///
/// Uniqueness is left to the store, so two concurrent registrations of the
/// same email cannot both succeed.
pub async fn register<U>(
    store: &U,
    form: &RegistrationForm,
    bcrypt_cost: u32,
) -> RestResult<RegistrationOutcome>
where
    U: UserStore + ?Sized,
{
    let username = form.username.trim();
    let email = form.email.trim();
    // Trimmed like the login path, so the two agree on what was typed.
    let password = form.password.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Ok(RegistrationOutcome::Invalid(MISSING_FIELDS_MESSAGE));
    }

    let age = match form.age.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<i32>() {
            Ok(age) if age >= 0 => Some(age),
            _ => return Ok(RegistrationOutcome::Invalid(INVALID_AGE_MESSAGE)),
        },
    };

    let password_hash = hash_password(password.to_string(), bcrypt_cost).await?;

    let user = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
        age,
        profession: form
            .profession
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from),
    };

    match store.create_user(user).await {
        Ok(record) => {
            info!(user_id = record.user_id, "User registered");
            Ok(RegistrationOutcome::Registered(record))
        }
        Err(StorageError::Account(AccountError::EmailTaken { .. })) => {
            debug!("Registration rejected, email already registered");
            Ok(RegistrationOutcome::EmailTaken)
        }
        Err(e) => Err(e.into()),
    }
}

/// Checks credentials. Both inputs are trimmed before use.
pub async fn login<U>(store: &U, form: &LoginForm) -> RestResult<LoginOutcome>
where
    U: UserStore + ?Sized,
{
    let email = form.email.trim();
    let password = form.password.trim().to_string();

    let Some(user) = store.find_user_by_email(email).await? else {
        return Ok(LoginOutcome::UnknownEmail);
    };

    if verify_password(password, user.password_hash.clone()).await? {
        info!(user_id = user.user_id, "User logged in");
        Ok(LoginOutcome::Authenticated(user))
    } else {
        Ok(LoginOutcome::WrongPassword)
    }
}

async fn hash_password(password: String, cost: u32) -> RestResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| RestError::InternalError {
            message: format!("password hashing task failed: {}", e),
        })?
        .map_err(|e| password_error(e).into())
}

async fn verify_password(password: String, hash: String) -> RestResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| RestError::InternalError {
            message: format!("password verification task failed: {}", e),
        })?
        .map_err(|e| password_error(e).into())
}

fn password_error(err: bcrypt::BcryptError) -> StorageError {
    AccountError::PasswordHash {
        message: err.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medisae_persistence::backends::memory::MemoryBackend;
    use crate::config::MIN_BCRYPT_COST;

    fn form(email: &str) -> RegistrationForm {
        RegistrationForm {
            username: "alice".to_string(),
            email: email.to_string(),
            age: Some("34".to_string()),
            profession: Some("Pharmacist".to_string()),
            password: "s3cret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryBackend::new();

        let outcome = register(&store, &form("alice@example.com"), MIN_BCRYPT_COST)
            .await
            .unwrap();
        let RegistrationOutcome::Registered(user) = outcome else {
            panic!("expected registration");
        };
        assert_eq!(user.age, Some(34));
        assert_ne!(user.password_hash, "s3cret");

        let outcome = login(
            &store,
            &LoginForm {
                email: "  ALICE@example.com ".to_string(),
                password: "s3cret ".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(matches!(outcome, LoginOutcome::Authenticated(u) if u.username == "alice"));
    }

    #[tokio::test]
    async fn test_email_taken_ignores_case() {
        let store = MemoryBackend::new();
        register(&store, &form("a@b.com"), MIN_BCRYPT_COST).await.unwrap();

        let outcome = register(&store, &form("A@B.com"), MIN_BCRYPT_COST)
            .await
            .unwrap();
        assert!(matches!(outcome, RegistrationOutcome::EmailTaken));
        assert_eq!(outcome.message(), EMAIL_TAKEN_MESSAGE);
    }

    #[tokio::test]
    async fn test_login_failures() {
        let store = MemoryBackend::new();
        register(&store, &form("alice@example.com"), MIN_BCRYPT_COST)
            .await
            .unwrap();

        let wrong = login(
            &store,
            &LoginForm {
                email: "alice@example.com".to_string(),
                password: "nope".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(wrong.message(), Some(WRONG_PASSWORD_MESSAGE));

        let unknown = login(
            &store,
            &LoginForm {
                email: "bob@example.com".to_string(),
                password: "s3cret".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(unknown.message(), Some(UNKNOWN_EMAIL_MESSAGE));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let store = MemoryBackend::new();

        let blank = RegistrationForm {
            username: "  ".to_string(),
            ..form("alice@example.com")
        };
        let outcome = register(&store, &blank, MIN_BCRYPT_COST).await.unwrap();
        assert_eq!(outcome.message(), MISSING_FIELDS_MESSAGE);

        let bad_age = RegistrationForm {
            age: Some("thirty".to_string()),
            ..form("alice@example.com")
        };
        let outcome = register(&store, &bad_age, MIN_BCRYPT_COST).await.unwrap();
        assert_eq!(outcome.message(), INVALID_AGE_MESSAGE);

        let no_age = RegistrationForm {
            age: Some(String::new()),
            profession: Some(" ".to_string()),
            ..form("alice@example.com")
        };
        let RegistrationOutcome::Registered(user) =
            register(&store, &no_age, MIN_BCRYPT_COST).await.unwrap()
        else {
            panic!("expected registration");
        };
        assert_eq!(user.age, None);
        assert_eq!(user.profession, None);
    }
}
