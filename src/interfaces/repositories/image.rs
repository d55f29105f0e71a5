use async_trait::async_trait;

use crate::{
    entities::image::{ImageRecord, NewImageRecord},
    errors::ApiError,
    repositories::sqlx_repo::SqlxImageRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn insert(&self, record: &NewImageRecord) -> Result<i64, ApiError>;
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<ImageRecord>, ApiError>;
    async fn delete(&self, user_id: i64, filename: &str) -> Result<bool, ApiError>;
}

impl SqlxImageRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxImageRepo { pool }
    }
}

#[async_trait]
impl ImageRepository for SqlxImageRepo {
    async fn insert(&self, record: &NewImageRecord) -> Result<i64, ApiError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO images (user_id, filename, original_name, size, mimetype, path)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(record.user_id)
        .bind(&record.filename)
        .bind(&record.original_name)
        .bind(record.size)
        .bind(&record.mimetype)
        .bind(&record.path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::DbInsert(e.to_string()))
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<ImageRecord>, ApiError> {
        sqlx::query_as::<_, ImageRecord>(
            "SELECT * FROM images WHERE user_id = $1 ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::from)
    }

    async fn delete(&self, user_id: i64, filename: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM images WHERE user_id = $1 AND filename = $2")
            .bind(user_id)
            .bind(filename)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::DbDelete(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
