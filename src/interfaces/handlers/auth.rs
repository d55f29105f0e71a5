use actix_web::{post, put, web, HttpResponse, Responder};
use serde_json::json;

use crate::entities::user::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::use_cases::extractors::{AuthUser, ReqId};
use crate::AppState;

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    request_id: ReqId,
    body: web::Json<RegisterRequest>,
) -> impl Responder {
    match state.auth_handler.register(body.into_inner()).await {
        Ok(user_id) => HttpResponse::Created().json(json!({
            "success": true,
            "message": "User registered successfully",
            "userId": user_id,
            "requestId": request_id.0,
        })),
        Err(e) => e.to_response(&request_id.0),
    }
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    request_id: ReqId,
    body: web::Json<LoginRequest>,
) -> impl Responder {
    match state.auth_handler.login(body.into_inner()).await {
        Ok((token, user)) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Login successful",
            "token": token,
            "user": user,
            "requestId": request_id.0,
        })),
        Err(e) => e.to_response(&request_id.0),
    }
}

#[put("/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    request_id: ReqId,
    user: AuthUser,
    body: web::Json<UpdateProfileRequest>,
) -> impl Responder {
    match state
        .auth_handler
        .update_profile(user.0, body.into_inner())
        .await
    {
        Ok(summary) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Profile updated successfully",
            "user": summary,
            "requestId": request_id.0,
        })),
        Err(e) => e.to_response(&request_id.0),
    }
}
