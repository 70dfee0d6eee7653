use crate::domain::id::UserId;
use serde::{Deserialize, Deserializer, Serialize};

/// A registered user; referenced by id from boards and cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// The users every fresh store starts with
    pub fn default_users() -> Vec<User> {
        vec![
            User::new("user-1", "John Doe", "john@example.com"),
            User::new("user-2", "Jane Smith", "jane@example.com"),
        ]
    }
}

/// A stored user reference: either a bare id or an embedded user object
#[derive(Deserialize)]
#[serde(untagged)]
enum UserRef {
    Id(UserId),
    Embedded { id: UserId },
}

/// Reads a user reference written either as `"user-1"` or as
/// `{"id": "user-1", "name": ..., "email": ...}`. Always written back as an id.
pub(crate) fn deserialize_user_ref<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match UserRef::deserialize(deserializer)? {
        UserRef::Id(id) | UserRef::Embedded { id } => id,
    })
}
