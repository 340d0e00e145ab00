//! User domain model.

use chrono::{DateTime, Utc};

use stocklist_core::{UserId, Username};

/// A registered catalog user.
///
/// The password hash is intentionally not part of this struct; credential
/// lookups return it separately so it never travels further than the
/// authentication service.
#[derive(Debug, Clone)]
pub struct User {
    /// User's database ID.
    pub id: UserId,
    /// User's login name.
    pub username: Username,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
