use std::sync::Arc;

use crate::auth::jwt::JwtService;
use crate::auth::password::{hash_password, verify_password};
use crate::entities::user::{
    LoginRequest, NewUserRecord, RegisterRequest, UpdateProfileRequest, UserSummary,
};
use crate::errors::ApiError;
use crate::repositories::user::UserRepository;

/// Registration, login, and profile update over an injected user store.
pub struct AuthHandler {
    pub user_repo: Arc<dyn UserRepository>,
    pub jwt: JwtService,
}

impl AuthHandler {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt: JwtService) -> Self {
        AuthHandler { user_repo, jwt }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<i64, ApiError> {
        let username = non_empty(request.username.as_deref());
        let email = non_empty(request.email.as_deref());
        let password = non_empty(request.password.as_deref());

        let (Some(username), Some(email), Some(password)) = (username, email, password) else {
            return Err(ApiError::MissingFields {
                username: username.is_none(),
                email: email.is_none(),
                password: password.is_none(),
            });
        };

        let password_hash = hash_password(password)?;

        let user_id = self
            .user_repo
            .create_user(&NewUserRecord {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id, "user registered");
        Ok(user_id)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<(String, UserSummary), ApiError> {
        let email = non_empty(request.email.as_deref());
        let password = non_empty(request.password.as_deref());

        let (Some(email), Some(password)) = (email, password) else {
            return Err(ApiError::MissingCredentials {
                email: email.is_none(),
                password: password.is_none(),
            });
        };

        let user = self
            .user_repo
            .get_user_by_email(email)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ApiError::InvalidPassword);
        }

        let token = self.jwt.create_token(user.id)?;

        tracing::info!(user_id = user.id, "login successful");
        Ok((token, UserSummary::from(&user)))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> Result<UserSummary, ApiError> {
        // An empty-string new password is treated as absent, so the
        // no-changes check and the current-password gate see the same thing.
        let new_password = request.new_password.as_deref().filter(|p| !p.is_empty());

        if request.username.is_none() && new_password.is_none() {
            return Err(ApiError::NoChanges);
        }

        let username = request.username.as_deref().map(str::trim);
        if username.is_some_and(str::is_empty) {
            return Err(ApiError::InvalidUsername);
        }

        if new_password.is_some() && request.current_password.is_none() {
            return Err(ApiError::MissingCurrentPassword);
        }

        let user = self
            .user_repo
            .get_user_by_id(user_id)
            .await?
            .ok_or(ApiError::ProfileUserNotFound)?;

        let password_hash = match new_password {
            Some(new_password) => {
                let current = request.current_password.as_deref().unwrap_or_default();
                if !verify_password(current, &user.password_hash)? {
                    return Err(ApiError::InvalidCurrentPassword);
                }
                hash_password(new_password)?
            }
            None => user.password_hash.clone(),
        };

        let final_username = username.unwrap_or(&user.username).to_string();

        self.user_repo
            .update_profile(user_id, &final_username, &password_hash)
            .await?;

        tracing::info!(user_id, "profile updated");
        Ok(UserSummary {
            username: final_username,
            ..UserSummary::from(&user)
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
