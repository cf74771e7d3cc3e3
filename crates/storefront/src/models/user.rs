//! User domain type.

use serde::{Deserialize, Serialize};

use scoder_core::{Email, UserId};

/// A storefront user.
///
/// This is the whole identity: there is no password, no token and no
/// server-side record. It is serialized as-is into durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Client-generated ID.
    pub id: UserId,
    /// Email the user signed in with.
    pub email: Email,
    /// Display name.
    pub name: String,
}
