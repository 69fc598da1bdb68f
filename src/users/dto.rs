use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use super::repo_types::User;

/// Request body for user creation.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password: String,
}

/// Request body for a full update; every mutable field is replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password: String,
    pub blocked: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UserId {
    pub id: i64,
}

/// Query of the list operation. Both fields may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersRequest {
    #[serde(default, deserialize_with = "empty_as_zero")]
    pub page_size: i64,
    #[serde(default)]
    pub page_token: String,
}

/// `page_size=` counts as absent.
fn empty_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse().map_err(serde::de::Error::custom)
}

/// User returned to the client. The password is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub blocked: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub registration_date: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            phone_number: u.phone_number,
            blocked: u.blocked,
            registration_date: u.registration_date,
        }
    }
}

/// One page of users. An empty `next_page_token` means the page was empty.
#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<PublicUser>,
    pub next_page_token: String,
}
