use actix_web::{error::InternalError, web, HttpResponse};
use serde_json::json;

use crate::handlers::auth::{login, register, update_profile};
use crate::handlers::home::home;
use crate::handlers::todos::{create_todo, delete_todo, get_todos, update_todo};
use crate::handlers::uploads::{delete_image, list_images, upload_image};
use crate::use_cases::extractors::request_id;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());

    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .service(register)
            .service(login)
            .service(update_profile)
            .service(create_todo)
            .service(get_todos)
            .service(update_todo)
            .service(delete_todo)
            .service(upload_image)
            .service(list_images)
            .service(delete_image),
    );
}

// Malformed JSON bodies get the same response shape as every other error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        let body = HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "ERROR_INVALID_JSON",
            "code": 4001,
            "message": err.to_string(),
            "requestId": request_id(req),
        }));
        InternalError::from_response(err, body).into()
    })
}
