use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use validator::ValidationErrors;

use crate::{db::StoreError, routes::util::ApiResponse};

pub const INVALID_BODY: &str = "invalid request body";
const INTERNAL_ERROR: &str = "internal server error";

/// Everything a handler can fail with. Rendering into the response envelope happens here
/// and nowhere else.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let message = fields
            .iter()
            .map(|(field, errors)| {
                let messages: Vec<&str> = errors
                    .iter()
                    .map(|e| e.message.as_deref().unwrap_or("invalid"))
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        if message.is_empty() {
            ApiError::Validation("validation error".to_owned())
        } else {
            ApiError::Validation(message)
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::Persistence(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            log::error!("unhandled error: {:?}", self);
            INTERNAL_ERROR.to_owned()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ApiResponse::<()>::new(status, message, None))
    }
}
