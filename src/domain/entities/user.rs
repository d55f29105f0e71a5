use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub todo_count: i32,
    pub image_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user shape returned by login and profile update. The password hash
/// never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub todo_count: i32,
    pub image_count: i32,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            todo_count: user.todo_count,
            image_count: user.image_count,
        }
    }
}

// Request fields are Option so that absent and present-but-invalid values
// map to distinct error payloads instead of a generic deserialize failure.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,

    #[serde(rename = "currentPassword")]
    pub current_password: Option<String>,

    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

#[derive(Debug)]
pub struct NewUserRecord {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
