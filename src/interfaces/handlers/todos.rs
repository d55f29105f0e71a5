use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

use crate::entities::todo::{CreateTodoRequest, UpdateTodoRequest};
use crate::errors::ApiError;
use crate::use_cases::extractors::{AuthUser, ReqId};
use crate::AppState;

#[post("/todos")]
pub async fn create_todo(
    state: web::Data<AppState>,
    request_id: ReqId,
    user: AuthUser,
    body: web::Json<CreateTodoRequest>,
) -> impl Responder {
    match state.todo_handler.create(user.0, body.into_inner()).await {
        Ok(todo) => HttpResponse::Created().json(json!({
            "success": true,
            "message": "Todo created successfully",
            "todo": todo,
            "requestId": request_id.0,
        })),
        Err(e) => e.to_response(&request_id.0),
    }
}

#[get("/todos")]
pub async fn get_todos(
    state: web::Data<AppState>,
    request_id: ReqId,
    user: AuthUser,
) -> impl Responder {
    match state.todo_handler.list(user.0).await {
        Ok(todos) => HttpResponse::Ok().json(json!({
            "success": true,
            "count": todos.len(),
            "todos": todos,
            "requestId": request_id.0,
        })),
        Err(e) => e.to_response(&request_id.0),
    }
}

#[put("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    request_id: ReqId,
    user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateTodoRequest>,
) -> impl Responder {
    // The id stays a string in the route so a non-numeric value maps to the
    // invalid-id code instead of a routing 404.
    let Ok(todo_id) = path.into_inner().parse::<i64>() else {
        return ApiError::InvalidTodoId.to_response(&request_id.0);
    };

    match state
        .todo_handler
        .update(user.0, todo_id, body.into_inner())
        .await
    {
        Ok(todo) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Todo updated successfully",
            "todo": todo,
            "requestId": request_id.0,
        })),
        Err(e) => e.to_response(&request_id.0),
    }
}

#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    request_id: ReqId,
    user: AuthUser,
    path: web::Path<String>,
) -> impl Responder {
    let Ok(todo_id) = path.into_inner().parse::<i64>() else {
        return ApiError::InvalidTodoId.to_response(&request_id.0);
    };

    match state.todo_handler.delete(user.0, todo_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Todo deleted successfully",
            "requestId": request_id.0,
        })),
        Err(e) => e.to_response(&request_id.0),
    }
}
