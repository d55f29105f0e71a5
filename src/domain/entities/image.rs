use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata row for a stored blob. `filename` is the server-generated
/// storage key; `path` is the public URL the blob is served from.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ImageRecord {
    #[serde(skip_serializing)]
    pub id: i64,

    #[serde(rename = "userId")]
    pub user_id: i64,

    pub filename: String,

    #[serde(rename = "originalName")]
    pub original_name: String,

    pub size: i64,

    pub mimetype: String,

    pub path: String,

    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewImageRecord {
    pub user_id: i64,
    pub filename: String,
    pub original_name: String,
    pub size: i64,
    pub mimetype: String,
    pub path: String,
}

/// Upload form: exactly one file under the `image` field. Unknown or
/// duplicate fields are extractor errors, mapped to their own codes.
#[derive(Debug, MultipartForm)]
#[multipart(deny_unknown_fields, duplicate_field = "deny")]
pub struct ImageUploadForm {
    #[multipart(limit = "10MiB")]
    pub image: Option<TempFile>,
}
