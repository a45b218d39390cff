use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                      // unique user ID
    pub email: String,                 // user email
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // Argon2 hash; None for external providers
    pub provider: String,              // "local" or the external identity provider
    pub is_premium: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
