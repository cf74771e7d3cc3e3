//! Authentication service.
//!
//! Mock authentication: any well-formed credentials are accepted after a
//! simulated round trip, and the resulting user lives only in the store and
//! the session holder. There is no credential check of any kind.

mod error;

pub use error::AuthError;

use std::time::Duration;

use tracing::{info, instrument};

use scoder_core::{Email, UserId};

use crate::models::User;
use crate::services::ValidationErrors;
use crate::store::{Action, Store};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum display name length.
const MIN_NAME_LENGTH: usize = 2;

/// ID given to every user who logs in (as opposed to registering).
const LOGIN_USER_ID: &str = "1";

const INVALID_EMAIL: &str = "Please enter a valid email address";
const SHORT_PASSWORD: &str = "Password must be at least 6 characters";

// =============================================================================
// Forms
// =============================================================================

/// Submitted login form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Check every field, returning the parsed email on success.
    ///
    /// # Errors
    ///
    /// Returns all field errors at once.
    pub fn validate(&self) -> Result<Email, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        finish(email, errors)
    }
}

/// Submitted registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Check every field, returning the parsed email on success.
    ///
    /// # Errors
    ///
    /// Returns all field errors at once.
    pub fn validate(&self) -> Result<Email, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.chars().count() < MIN_NAME_LENGTH {
            errors.push("name", "Name must be at least 2 characters");
        }
        let email = check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if self.password != self.confirm_password {
            errors.push("confirm_password", "Passwords don't match");
        }

        finish(email, errors)
    }
}

fn check_email(raw: &str, errors: &mut ValidationErrors) -> Option<Email> {
    let parsed = Email::parse(raw).ok();
    if parsed.is_none() {
        errors.push("email", INVALID_EMAIL);
    }
    parsed
}

fn check_password(password: &str, errors: &mut ValidationErrors) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push("password", SHORT_PASSWORD);
    }
}

/// A missing email always comes with an email error, so this only succeeds
/// when every field passed.
fn finish(email: Option<Email>, errors: ValidationErrors) -> Result<Email, ValidationErrors> {
    match email {
        Some(email) if errors.is_empty() => Ok(email),
        _ => Err(errors),
    }
}

// =============================================================================
// AuthService
// =============================================================================

/// Authentication service.
///
/// Handles login, registration and logout against the application store.
pub struct AuthService<'a> {
    store: &'a Store,
    delay: Duration,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a Store, delay: Duration) -> Self {
        Self { store, delay }
    }

    /// Log in with any well-formed email and password.
    ///
    /// The user is named after the local part of the email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is invalid. The store is
    /// not touched in that case.
    #[instrument(skip_all)]
    pub async fn login(&self, form: &LoginForm) -> Result<User, AuthError> {
        let email = form.validate()?;

        tokio::time::sleep(self.delay).await;

        let user = User {
            id: UserId::new(LOGIN_USER_ID),
            name: email.local_part().to_string(),
            email,
        };
        info!(user_id = %user.id, "User logged in");
        self.store.dispatch(Action::SetUser(Some(user.clone())));
        Ok(user)
    }

    /// Register a new user.
    ///
    /// The user ID is the registration time in epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is invalid.
    #[instrument(skip_all)]
    pub async fn register(&self, form: &RegisterForm) -> Result<User, AuthError> {
        let email = form.validate()?;

        tokio::time::sleep(self.delay).await;

        let user = User {
            id: UserId::new(chrono::Utc::now().timestamp_millis().to_string()),
            email,
            name: form.name.clone(),
        };
        info!(user_id = %user.id, "User registered");
        self.store.dispatch(Action::SetUser(Some(user.clone())));
        Ok(user)
    }

    /// Log out and empty the cart.
    pub fn logout(&self) {
        self.store.dispatch(Action::SetUser(None));
        self.store.dispatch(Action::ClearCart);
        info!("User logged out");
    }

    /// The logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::LoginRequired` for guests.
    pub fn require_user(&self) -> Result<User, AuthError> {
        self.store
            .with_state(|state| state.user.clone())
            .ok_or(AuthError::LoginRequired)
    }
}
