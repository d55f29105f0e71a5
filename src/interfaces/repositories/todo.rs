use async_trait::async_trait;

use crate::{
    entities::todo::Todo, errors::ApiError, repositories::sqlx_repo::SqlxTodoRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn insert(&self, user_id: i64, title: &str) -> Result<Todo, ApiError>;
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Todo>, ApiError>;

    /// Patches title and/or completed for the row matching both id and
    /// owner. `None` means "no match" — missing and unowned are not
    /// distinguished.
    async fn update(
        &self,
        id: i64,
        user_id: i64,
        title: Option<String>,
        completed: Option<bool>,
    ) -> Result<Option<Todo>, ApiError>;

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, ApiError>;
}

impl SqlxTodoRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxTodoRepo { pool }
    }
}

#[async_trait]
impl TodoRepository for SqlxTodoRepo {
    async fn insert(&self, user_id: i64, title: &str) -> Result<Todo, ApiError> {
        sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (user_id, title)
            VALUES ($1, $2)
            RETURNING id, user_id, title, completed, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .map_err(ApiError::from)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Todo>, ApiError> {
        sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::from)
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        title: Option<String>,
        completed: Option<bool>,
    ) -> Result<Option<Todo>, ApiError> {
        sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title = COALESCE($3, title),
                completed = COALESCE($4, completed)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, completed, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(completed)
        .fetch_optional(&self.pool)
        .await
        .map_err(ApiError::from)
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(ApiError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
