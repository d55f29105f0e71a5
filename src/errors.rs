use std::borrow::Cow;

use actix_multipart::MultipartError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::Display;
use jsonwebtoken::errors::Error as JwtError;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DuplicateField {
    #[display("email")]
    Email,
    #[display("username")]
    Username,
}

/// Every failure the API surfaces, carrying its stable string code and
/// numeric code. Handlers turn these into JSON via [`ApiError::to_response`].
#[derive(Debug, Display)]
pub enum ApiError {
    #[display("Email, username, and password are all required")]
    MissingFields {
        username: bool,
        email: bool,
        password: bool,
    },

    #[display("Email and password are required")]
    MissingCredentials { email: bool, password: bool },

    #[display("This {_0} is already registered")]
    Duplicate(DuplicateField),

    #[display("Invalid email or password")]
    UserNotFound,

    #[display("Invalid email or password")]
    InvalidPassword,

    #[display("No token provided. Please login first.")]
    NoToken,

    #[display("Invalid token format. Use 'Bearer <token>'")]
    InvalidTokenFormat,

    #[display("Invalid or expired token. Please login again.")]
    InvalidOrExpiredToken,

    #[display("Provide a username or a new password to update")]
    NoChanges,

    #[display("Username cannot be empty")]
    InvalidUsername,

    #[display("Current password is required to set a new password")]
    MissingCurrentPassword,

    #[display("Current password is incorrect")]
    InvalidCurrentPassword,

    #[display("User not found")]
    ProfileUserNotFound,

    #[display("Todo title is required and cannot be empty")]
    MissingTitle,

    #[display("Todo ID must be a valid number")]
    InvalidTodoId,

    #[display("Todo title cannot be empty")]
    InvalidTitle,

    #[display("Todo not found or you don't have permission to modify it")]
    TodoNotFound,

    #[display("No image file provided. Please upload an image file.")]
    NoFile,

    #[display("Uploaded file is empty (0 bytes). Please select a valid image.")]
    EmptyFile,

    #[display("File size exceeds the 10MB limit")]
    FileTooLarge,

    #[display("Use 'image' as the form field key for file upload, got '{_0}'")]
    WrongFieldName(String),

    #[display("Only 1 file can be uploaded at a time")]
    TooManyFiles,

    #[display("Invalid file type '{_0}'. Allowed types: jpeg, png, gif, webp")]
    InvalidFileType(String),

    #[display("Filename is required to delete an image")]
    MissingFilename,

    #[display("Invalid filename")]
    InvalidFilename,

    #[display("File not found on server")]
    FileNotFound,

    #[display("Database error: {_0}")]
    Database(String),

    #[display("Failed to save image record in database")]
    DbInsert(String),

    #[display("Failed to delete image record from database")]
    DbDelete(String),

    #[display("Failed to delete file from filesystem")]
    FileDelete(String),

    #[display("Internal server error: {_0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use ApiError::*;
        match self {
            MissingFields { .. } | MissingCredentials { .. } | NoChanges | InvalidUsername
            | MissingCurrentPassword | MissingTitle | InvalidTodoId | InvalidTitle | NoFile
            | EmptyFile | WrongFieldName(_) | TooManyFiles | InvalidFileType(_)
            | MissingFilename | InvalidFilename => StatusCode::BAD_REQUEST,

            NoToken | InvalidTokenFormat | InvalidOrExpiredToken | UserNotFound
            | InvalidPassword | InvalidCurrentPassword => StatusCode::UNAUTHORIZED,

            ProfileUserNotFound | TodoNotFound | FileNotFound => StatusCode::NOT_FOUND,

            Duplicate(_) => StatusCode::CONFLICT,

            FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            Database(_) | DbInsert(_) | DbDelete(_) | FileDelete(_) | Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        use ApiError::*;
        match self {
            MissingFields { .. } => "ERROR_MISSING_FIELDS",
            MissingCredentials { .. } => "ERROR_MISSING_CREDENTIALS",
            Duplicate(DuplicateField::Email) => "ERROR_DUPLICATE_EMAIL",
            Duplicate(DuplicateField::Username) => "ERROR_DUPLICATE_USERNAME",
            UserNotFound | ProfileUserNotFound => "ERROR_USER_NOT_FOUND",
            InvalidPassword => "ERROR_INVALID_PASSWORD",
            NoToken => "ERROR_NO_TOKEN",
            InvalidTokenFormat => "ERROR_INVALID_TOKEN_FORMAT",
            InvalidOrExpiredToken => "ERROR_INVALID_OR_EXPIRED_TOKEN",
            NoChanges => "ERROR_NO_CHANGES",
            InvalidUsername => "ERROR_INVALID_USERNAME",
            MissingCurrentPassword => "ERROR_MISSING_CURRENT_PASSWORD",
            InvalidCurrentPassword => "ERROR_INVALID_CURRENT_PASSWORD",
            MissingTitle => "ERROR_MISSING_TITLE",
            InvalidTodoId => "ERROR_INVALID_ID",
            InvalidTitle => "ERROR_INVALID_TITLE",
            TodoNotFound => "ERROR_NOT_FOUND_OR_UNAUTHORIZED",
            NoFile => "ERROR_NO_FILE",
            EmptyFile => "ERROR_EMPTY_FILE",
            FileTooLarge => "ERROR_FILE_TOO_LARGE",
            WrongFieldName(_) => "ERROR_WRONG_FIELD_NAME",
            TooManyFiles => "ERROR_TOO_MANY_FILES",
            InvalidFileType(_) => "ERROR_INVALID_FILE_TYPE",
            MissingFilename => "ERROR_MISSING_FILENAME",
            InvalidFilename => "ERROR_INVALID_FILENAME",
            FileNotFound => "ERROR_FILE_NOT_FOUND",
            Database(_) => "ERROR_DATABASE",
            DbInsert(_) => "ERROR_DB_INSERT",
            DbDelete(_) => "ERROR_DB_DELETE",
            FileDelete(_) => "ERROR_FILE_DELETE",
            Internal(_) => "ERROR_SERVER",
        }
    }

    pub fn numeric_code(&self) -> u16 {
        use ApiError::*;
        match self {
            MissingFields { .. } | MissingCredentials { .. } | NoChanges | MissingTitle
            | InvalidTodoId | NoFile | TooManyFiles | MissingFilename => 4001,
            InvalidUsername | InvalidTitle | EmptyFile | WrongFieldName(_)
            | InvalidFilename => 4002,
            MissingCurrentPassword | InvalidFileType(_) => 4003,
            NoToken | UserNotFound | InvalidCurrentPassword => 4011,
            InvalidTokenFormat | InvalidPassword => 4012,
            InvalidOrExpiredToken => 4013,
            ProfileUserNotFound | TodoNotFound | FileNotFound => 4041,
            Duplicate(_) => 4091,
            FileTooLarge => 4131,
            Database(_) | FileDelete(_) | Internal(_) => 5001,
            DbInsert(_) | DbDelete(_) => 5002,
        }
    }

    /// Builds the JSON error body every endpoint shares: `success`, the
    /// stable string code, the numeric code, a human message, and the
    /// request id echo. Some variants attach extra detail fields.
    pub fn to_response(&self, request_id: &str) -> HttpResponse {
        let mut body = json!({
            "success": false,
            "error": self.error_code(),
            "code": self.numeric_code(),
            "message": self.to_string(),
            "requestId": request_id,
        });

        match self {
            ApiError::MissingFields {
                username,
                email,
                password,
            } => {
                body["missingFields"] = json!({
                    "username": username,
                    "email": email,
                    "password": password,
                });
            }
            ApiError::MissingCredentials { email, password } => {
                body["missingFields"] = json!({
                    "email": email,
                    "password": password,
                });
            }
            ApiError::Duplicate(field) => {
                body["field"] = json!(field.to_string());
            }
            _ => {}
        }

        HttpResponse::build(self.status())
            .insert_header(ContentType::json())
            .json(body)
    }
}

// Fallback for errors that escape handler-level matching. The request id is
// not recoverable here, so a fresh one is minted for the echo field.
impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        self.to_response(&Uuid::new_v4().to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref e) if e.code() == Some(Cow::Borrowed("23505")) => {
                let field = match e.constraint() {
                    Some(c) if c.contains("email") => DuplicateField::Email,
                    _ => DuplicateField::Username,
                };
                ApiError::Duplicate(field)
            }
            _ => ApiError::Database(err.to_string()),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(_: JwtError) -> Self {
        ApiError::InvalidOrExpiredToken
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<&MultipartError> for ApiError {
    fn from(err: &MultipartError) -> Self {
        match err {
            MultipartError::UnknownField(field) => ApiError::WrongFieldName(field.clone()),
            MultipartError::DuplicateField(_) => ApiError::TooManyFiles,
            MultipartError::MissingField(_) => ApiError::NoFile,
            MultipartError::Payload(_) => ApiError::FileTooLarge,
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}
