use axum::extract::Json;
use axum::http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
    pub details: Option<String>,
}

impl Error {
    fn new(code: i32, message: &str) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Display) -> Self {
        self.details = Some(details.to_string());
        self
    }

    pub fn status(&self) -> StatusCode {
        match self.code {
            0..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            103 => StatusCode::NOT_FOUND,
            104 => StatusCode::FORBIDDEN,
            105 => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({}): {}", self.message, self.code, details),
            None => write!(f, "{} ({})", self.message, self.code),
        }
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        invalid_json_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        authorizor_error(err)
    }
}

impl From<axum::extract::multipart::MultipartError> for Error {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        invalid_input_error().with_details(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code, details = ?self.details, "{}", self.message);
        }

        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };

        let mut response = (status, Json(body)).into_response();
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

        response
    }
}

pub fn invalid_input_error() -> Error {
    Error::new(101, "invalid input")
}

pub fn invalid_json_error(err: serde_json::Error) -> Error {
    Error::new(102, "Invalid JSON body").with_details(err)
}

pub fn not_found_error() -> Error {
    Error::new(103, "not found")
}

pub fn unauthorized_error() -> Error {
    Error::new(104, "unauthorized")
}

pub fn method_not_allowed_error() -> Error {
    Error::new(105, "Method Not Allowed")
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error::new(1, "environment variable error")
}

pub fn config_error(key: &str) -> Error {
    Error::new(1, "configuration error").with_details(format!("{} is not set or invalid", key))
}

pub fn routing_not_configured_error() -> Error {
    Error::new(1, "Routing service API key is not configured")
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!(error = ?err, "database error");
    Error::new(2, "database error")
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    Error::new(3, "upstream request failed").with_details(err)
}

pub fn upstream_error() -> Error {
    Error::new(4, "upstream error")
}

pub fn unexpected_error() -> Error {
    Error::new(5, "unexpected error")
}

pub fn routing_request_error(err: reqwest::Error) -> Error {
    Error::new(6, "Failed to fetch route from routing service").with_details(err)
}

pub fn authorizor_error(err: oso::OsoError) -> Error {
    tracing::error!(error = ?err, "authorization policy error");
    Error::new(7, "authorization error")
}

pub fn storage_error() -> Error {
    Error::new(8, "storage error")
}

#[test]
fn status_by_code_range_test() {
    assert_eq!(upstream_error().status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(config_error("DATABASE_URL").status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(invalid_input_error().status(), StatusCode::BAD_REQUEST);
    assert_eq!(not_found_error().status(), StatusCode::NOT_FOUND);
    assert_eq!(unauthorized_error().status(), StatusCode::FORBIDDEN);
    assert_eq!(method_not_allowed_error().status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn error_response_headers_test() {
    use axum::http::header::CONTENT_TYPE;

    let response = method_not_allowed_error().into_response();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
}

#[test]
fn details_are_rendered_test() {
    let err = config_error("ORS_API_KEY");

    assert_eq!(err.details.as_deref(), Some("ORS_API_KEY is not set or invalid"));
    assert!(err.to_string().contains("ORS_API_KEY"));
}
