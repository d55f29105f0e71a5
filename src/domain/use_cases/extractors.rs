use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::{entities::token::Claims, errors::ApiError};

/// Extractor for the authenticated user's id, placed in request extensions
/// by the auth middleware. Usage: add `user: AuthUser` to a handler.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let user_id = req
            .extensions()
            .get::<Claims>()
            .and_then(|claims| claims.sub.parse::<i64>().ok());

        match user_id {
            Some(id) => ready(Ok(AuthUser(id))),
            None => ready(Err(ApiError::NoToken.into())),
        }
    }
}

/// The request id echoed in every JSON response. Reads the id minted by
/// `TracingLogger` when present, otherwise falls back to a fresh one so
/// handlers never fail on a missing extension.
#[derive(Debug, Clone)]
pub struct ReqId(pub String);

impl FromRequest for ReqId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(ReqId(request_id(req))))
    }
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<tracing_actix_web::RequestId>()
        .map(|id| id.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
