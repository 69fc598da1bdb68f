use sqlx::FromRow;
use time::OffsetDateTime;

/// User row in the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[sqlx(rename = "password")]
    pub password_hash: String, // Argon2 hash, never leaves the service
    pub blocked: bool,
    pub registration_date: OffsetDateTime,
}

/// Columns supplied on insert; `id`, `blocked` and `registration_date` come from the table defaults.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password_hash: String,
}

/// Full replacement of every mutable column.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password_hash: String,
    pub blocked: bool,
}
