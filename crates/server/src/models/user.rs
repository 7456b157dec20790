//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use mercado_core::{Email, Role, UserId};

/// A registered account, buyer or seller.
///
/// The password hash is deliberately not part of this type; queries that
/// need it return it separately so it never reaches a response body.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address. Tombstoned (suffixed) on account deletion.
    pub email: Email,
    /// Buyer or seller.
    pub role: Role,
    /// Cleared on deactivation, restored on reactivation.
    pub active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
