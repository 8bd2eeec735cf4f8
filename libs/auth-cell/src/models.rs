use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Stored user credential record. Created by the bootstrap seeder (or
/// out-of-band); the API itself never updates or deletes users.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub username: String,
    /// Argon2 PHC hash string, never the plaintext.
    pub password: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
