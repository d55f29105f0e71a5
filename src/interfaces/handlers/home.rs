use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;

use crate::constants::START_TIME;
use crate::use_cases::extractors::ReqId;

#[get("/")]
pub async fn home(request_id: ReqId) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Todo & Gallery API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": (Utc::now() - *START_TIME).num_seconds(),
        "endpoints": {
            "auth": "/api/register, /api/login, /api/profile",
            "todos": "/api/todos",
            "upload": "/api/upload"
        },
        "requestId": request_id.0
    }))
}
