use actix_web::{http::StatusCode, HttpRequest, HttpResponse};
use serde::Serialize;

/// The `{code, message, data}` wrapper every response body is sent in.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            data,
        }
    }
}

pub fn ok(data: impl Serialize) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::new(StatusCode::OK, "execute ok", Some(data)))
}

pub fn created() -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::<()>::new(StatusCode::CREATED, "created", None))
}

pub fn accepted(message: &str) -> HttpResponse {
    HttpResponse::Accepted().json(ApiResponse::<()>::new(StatusCode::ACCEPTED, message, None))
}

/// Fallback for requests no route matches, so they get the envelope too.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    let message = format!("no route for {} {}", req.method(), req.path());
    HttpResponse::NotFound().json(ApiResponse::<()>::new(StatusCode::NOT_FOUND, message, None))
}
