use actix_multipart::{form::MultipartForm, MultipartError};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;

use crate::entities::image::ImageUploadForm;
use crate::errors::ApiError;
use crate::use_cases::extractors::{AuthUser, ReqId};
use crate::AppState;

#[post("/upload")]
pub async fn upload_image(
    state: web::Data<AppState>,
    request_id: ReqId,
    user: AuthUser,
    form: Result<MultipartForm<ImageUploadForm>, actix_web::Error>,
) -> impl Responder {
    // Extractor failures carry the interesting cases: wrong field name,
    // duplicate fields, and the size limit.
    let form = match form {
        Ok(form) => form,
        Err(e) => {
            let error = match e.as_error::<MultipartError>() {
                Some(multipart_err) => ApiError::from(multipart_err),
                None => ApiError::Internal(e.to_string()),
            };
            return error.to_response(&request_id.0);
        }
    };

    let Some(file) = form.into_inner().image else {
        return ApiError::NoFile.to_response(&request_id.0);
    };

    match state.gallery_handler.upload(user.0, file).await {
        Ok(record) => HttpResponse::Created().json(json!({
            "success": true,
            "message": "Image uploaded successfully",
            "file": record,
            "requestId": request_id.0,
        })),
        Err(e) => e.to_response(&request_id.0),
    }
}

#[get("/upload")]
pub async fn list_images(
    state: web::Data<AppState>,
    request_id: ReqId,
    user: AuthUser,
) -> impl Responder {
    match state.gallery_handler.list(user.0).await {
        Ok(images) => HttpResponse::Ok().json(json!({
            "success": true,
            "count": images.len(),
            "images": images,
            "requestId": request_id.0,
        })),
        Err(e) => e.to_response(&request_id.0),
    }
}

#[delete("/upload/{filename}")]
pub async fn delete_image(
    state: web::Data<AppState>,
    request_id: ReqId,
    user: AuthUser,
    path: web::Path<String>,
) -> impl Responder {
    match state
        .gallery_handler
        .delete(user.0, &path.into_inner())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Image deleted successfully",
            "requestId": request_id.0,
        })),
        Err(e) => e.to_response(&request_id.0),
    }
}
