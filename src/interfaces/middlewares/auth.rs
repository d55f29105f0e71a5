use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{
    rc::Rc,
    task::{Context, Poll},
};
use uuid::Uuid;

use crate::{errors::ApiError, AppState};

/// Gate for all protected routes. Extracts the bearer token, verifies it,
/// and attaches the decoded claims to the request; public routes pass
/// through untouched.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let path = req.path();
            let method = req.method().as_str();

            if is_public_route(path, method) {
                return service
                    .call(req)
                    .await
                    .map(|res| res.map_into_boxed_body());
            }

            let Some(state) = req.app_data::<web::Data<AppState>>() else {
                tracing::error!("AppState missing in auth middleware");
                return Ok(error_response(
                    req,
                    ApiError::Internal("Application state unavailable".to_string()),
                ));
            };

            let header = match req.headers().get("Authorization") {
                Some(header) => header.to_str().unwrap_or_default().to_string(),
                None => {
                    tracing::warn!(%path, "no authorization header provided");
                    return Ok(error_response(req, ApiError::NoToken));
                }
            };

            let Some(token) = extract_bearer(&header) else {
                tracing::warn!(%path, "invalid authorization header format");
                return Ok(error_response(req, ApiError::InvalidTokenFormat));
            };

            let claims = match state.auth_handler.jwt.decode_token(&token) {
                Ok(claims) => claims,
                Err(_) => {
                    tracing::warn!(%path, "invalid or expired token");
                    return Ok(error_response(req, ApiError::InvalidOrExpiredToken));
                }
            };

            if claims.sub.parse::<i64>().is_err() {
                tracing::warn!(%path, sub = %claims.sub, "token subject is not a user id");
                return Ok(error_response(req, ApiError::InvalidOrExpiredToken));
            }

            req.extensions_mut().insert(claims);
            service
                .call(req)
                .await
                .map(|res| res.map_into_boxed_body())
        })
    }
}

fn is_public_route(path: &str, method: &str) -> bool {
    if method == "OPTIONS" {
        return true;
    }

    if path == "/uploads" || path.starts_with("/uploads/") || path.starts_with("/app") {
        return true;
    }

    matches!(
        (path, method),
        ("/", "GET") | ("/api/register", "POST") | ("/api/login", "POST")
    )
}

fn extract_bearer(header: &str) -> Option<String> {
    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
        Some(parts[1].to_string())
    } else {
        None
    }
}

fn error_response(req: ServiceRequest, error: ApiError) -> ServiceResponse<BoxBody> {
    let request_id = req
        .extensions()
        .get::<tracing_actix_web::RequestId>()
        .map(|id| id.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let response = error.to_response(&request_id);
    req.into_response(response)
}
