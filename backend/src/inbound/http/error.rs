//! HTTP adapter mapping for domain errors.
//!
//! Every error becomes a JSON body with a status derived from its code.
//! Storage outages answer 503 with `Retry-After`, and neither they nor
//! internal failures echo the underlying message.

use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Seconds a client should wait before retrying against a busy todo store.
///
/// Matches the SQLite busy timeout: by then the competing writer has either
/// committed or given up.
pub const STORAGE_RETRY_AFTER_SECS: u32 = 5;

const INTERNAL_MESSAGE: &str = "Internal server error";
const STORAGE_UNAVAILABLE_MESSAGE: &str = "Todo storage is busy, retry shortly";

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The body a client may see.
///
/// Storage and internal failures carry database paths and driver text, so
/// only their code and trace id survive.
fn public_view(error: &Error) -> Error {
    let message = match error.code() {
        ErrorCode::InternalError => INTERNAL_MESSAGE,
        ErrorCode::ServiceUnavailable => STORAGE_UNAVAILABLE_MESSAGE,
        ErrorCode::InvalidRequest | ErrorCode::NotFound => return error.clone(),
    };
    let mut public = Error::new(error.code(), message);
    if let Some(id) = error.trace_id() {
        public = public.with_trace_id(id.to_owned());
    }
    public
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self.code() {
            ErrorCode::InternalError => {
                error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
            }
            ErrorCode::ServiceUnavailable => {
                warn!(
                    message = self.message(),
                    trace_id = ?self.trace_id(),
                    "todo storage unavailable"
                );
                builder.insert_header((
                    header::RETRY_AFTER,
                    HeaderValue::from(STORAGE_RETRY_AFTER_SECS),
                ));
            }
            ErrorCode::InvalidRequest | ErrorCode::NotFound => {}
        }
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(public_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_MESSAGE)
    }
}
