use std::sync::Arc;

use crate::entities::todo::{CreateTodoRequest, Todo, UpdateTodoRequest};
use crate::errors::ApiError;
use crate::repositories::todo::TodoRepository;
use crate::repositories::user::UserRepository;

pub struct TodoHandler {
    pub todo_repo: Arc<dyn TodoRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl TodoHandler {
    pub fn new(todo_repo: Arc<dyn TodoRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        TodoHandler {
            todo_repo,
            user_repo,
        }
    }

    pub async fn create(&self, user_id: i64, request: CreateTodoRequest) -> Result<Todo, ApiError> {
        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingTitle)?;

        let todo = self.todo_repo.insert(user_id, title).await?;

        // Counter cache is best-effort; the todo row is already committed.
        if let Err(e) = self.user_repo.increment_todo_count(user_id).await {
            tracing::warn!(user_id, todo_id = todo.id, error = %e, "todo count update failed");
        }

        tracing::info!(user_id, todo_id = todo.id, "todo created");
        Ok(todo)
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<Todo>, ApiError> {
        self.todo_repo.list_for_user(user_id).await
    }

    pub async fn update(
        &self,
        user_id: i64,
        todo_id: i64,
        request: UpdateTodoRequest,
    ) -> Result<Todo, ApiError> {
        let title = match request.title.as_deref().map(str::trim) {
            Some("") => return Err(ApiError::InvalidTitle),
            other => other.map(str::to_string),
        };

        self.todo_repo
            .update(todo_id, user_id, title, request.completed)
            .await?
            .ok_or(ApiError::TodoNotFound)
    }

    pub async fn delete(&self, user_id: i64, todo_id: i64) -> Result<(), ApiError> {
        if !self.todo_repo.delete(todo_id, user_id).await? {
            return Err(ApiError::TodoNotFound);
        }

        if let Err(e) = self.user_repo.decrement_todo_count(user_id).await {
            tracing::warn!(user_id, todo_id, error = %e, "todo count update failed");
        }

        tracing::info!(user_id, todo_id, "todo deleted");
        Ok(())
    }
}
