use async_trait::async_trait;
use std::borrow::Cow;

use crate::{
    entities::user::{NewUserRecord, User},
    errors::{ApiError, DuplicateField},
    repositories::sqlx_repo::SqlxUserRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUserRecord) -> Result<i64, ApiError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, ApiError>;
    async fn update_profile(
        &self,
        id: i64,
        username: &str,
        password_hash: &str,
    ) -> Result<(), ApiError>;

    // Denormalized counter maintenance. Separate statements, never part of
    // the primary mutation's transaction; callers treat failures as
    // warnings. Decrements are floored at zero.
    async fn increment_todo_count(&self, user_id: i64) -> Result<(), ApiError>;
    async fn decrement_todo_count(&self, user_id: i64) -> Result<(), ApiError>;
    async fn increment_image_count(&self, user_id: i64) -> Result<(), ApiError>;
    async fn decrement_image_count(&self, user_id: i64) -> Result<(), ApiError>;
}

impl SqlxUserRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn create_user(&self, user: &NewUserRecord) -> Result<i64, ApiError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, todo_count, image_count)
            VALUES ($1, $2, $3, 0, 0)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(ApiError::from)?;

        Ok(id)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(ApiError::from)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(ApiError::from)
    }

    async fn update_profile(
        &self,
        id: i64,
        username: &str,
        password_hash: &str,
    ) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.code() == Some(Cow::Borrowed("23505")) =>
            {
                ApiError::Duplicate(DuplicateField::Username)
            }
            _ => ApiError::from(e),
        })?;

        Ok(())
    }

    async fn increment_todo_count(&self, user_id: i64) -> Result<(), ApiError> {
        adjust_counter(&self.pool, "todo_count", user_id, 1).await
    }

    async fn decrement_todo_count(&self, user_id: i64) -> Result<(), ApiError> {
        adjust_counter(&self.pool, "todo_count", user_id, -1).await
    }

    async fn increment_image_count(&self, user_id: i64) -> Result<(), ApiError> {
        adjust_counter(&self.pool, "image_count", user_id, 1).await
    }

    async fn decrement_image_count(&self, user_id: i64) -> Result<(), ApiError> {
        adjust_counter(&self.pool, "image_count", user_id, -1).await
    }
}

async fn adjust_counter(
    pool: &sqlx::PgPool,
    column: &str,
    user_id: i64,
    delta: i32,
) -> Result<(), ApiError> {
    // `column` is one of two literals above, never user input.
    let sql = format!("UPDATE users SET {column} = GREATEST({column} + $2, 0) WHERE id = $1");

    sqlx::query(&sql)
        .bind(user_id)
        .bind(delta)
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(ApiError::from)
}
