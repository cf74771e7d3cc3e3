//! Authentication error types.

use thiserror::Error;

use crate::services::ValidationErrors;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The submitted form has invalid fields.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// The operation needs a logged-in user.
    #[error("Please login to add items to cart")]
    LoginRequired,
}
