use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;
use serde_json::json;
use std::env;
use std::fmt;

use crate::entities::UserType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    InvalidCredentials,
    Forbidden,
    NotFound,
    ProfileIncomplete,
    WrongDashboard(UserType),
    InvalidInput,
    InvalidState,
    ServerError,
    ServerDown,
    Upstream,
    Config,
    Unexpected,
}

#[derive(Clone, Debug, Serialize)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub status: u16,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>, status: u16) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        tracing::error!("policy evaluation failed: {}", err);
        unexpected_error()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.kind {
            ErrorKind::Unauthorized => return Redirect::to("/login").into_response(),
            ErrorKind::ProfileIncomplete => {
                return Redirect::to("/profile/complete").into_response()
            }
            ErrorKind::WrongDashboard(user_type) => {
                return Redirect::to(user_type.dashboard_path()).into_response()
            }
            _ => (),
        }

        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(json!({
            "kind": self.kind,
            "data": {
                "message": self.message,
                "status": self.status,
            },
        }));

        (status, body).into_response()
    }
}

/// Maps a remote HTTP status onto the error taxonomy. `resource` names the
/// thing being fetched so 404s read as "Load not found", "Bid not found", ...
pub fn remote_status_error(status: u16, resource: &str) -> Error {
    match status {
        400 => Error::new(ErrorKind::BadRequest, "Bad request", 400),
        401 => unauthorized_error(),
        404 => not_found_error(resource),
        500 => Error::new(ErrorKind::ServerError, "Internal server error", 500),
        502 => Error::new(ErrorKind::ServerDown, "Server is down", 502),
        _ => Error::new(ErrorKind::Upstream, "An error occurred", status),
    }
}

pub fn unauthorized_error() -> Error {
    Error::new(ErrorKind::Unauthorized, "Unauthorized", 401)
}

/// Rejected login. Unlike an expired token it is answered in place.
pub fn invalid_credentials_error() -> Error {
    Error::new(ErrorKind::InvalidCredentials, "Invalid email or password", 401)
}

pub fn forbidden_error() -> Error {
    Error::new(ErrorKind::Forbidden, "Forbidden", 403)
}

pub fn not_found_error(resource: &str) -> Error {
    Error::new(ErrorKind::NotFound, format!("{} not found", resource), 404)
}

pub fn invalid_input_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidInput, message, 400)
}

pub fn invalid_state_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidState, message, 409)
}

pub fn profile_incomplete_error() -> Error {
    Error::new(
        ErrorKind::ProfileIncomplete,
        "complete your business profile first",
        403,
    )
}

pub fn wrong_dashboard_error(own: UserType) -> Error {
    Error::new(
        ErrorKind::WrongDashboard(own),
        format!("redirecting to the {} dashboard", own.name()),
        303,
    )
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error::new(ErrorKind::Config, "environment variable error", 500)
}

pub fn config_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Config, message, 500)
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::warn!("remote call failed: {}", err);

    if err.is_decode() {
        return Error::new(ErrorKind::Upstream, "An error occurred", 502);
    }

    match err.status() {
        Some(status) => remote_status_error(status.as_u16(), "Resource"),
        None => Error::new(ErrorKind::ServerDown, "Server is down", 502),
    }
}

pub fn unexpected_error() -> Error {
    Error::new(ErrorKind::Unexpected, "Something went wrong, try again", 500)
}

#[test]
fn remote_status_taxonomy_test() {
    assert_eq!(remote_status_error(400, "Bid").kind, ErrorKind::BadRequest);
    assert_eq!(remote_status_error(401, "Bid").kind, ErrorKind::Unauthorized);
    assert_eq!(remote_status_error(500, "Bid").message, "Internal server error");
    assert_eq!(remote_status_error(502, "Bid").message, "Server is down");

    let not_found = remote_status_error(404, "Load");
    assert!(not_found.is_not_found());
    assert_eq!(not_found.message, "Load not found");

    let other = remote_status_error(418, "Load");
    assert_eq!(other.kind, ErrorKind::Upstream);
    assert_eq!(other.message, "An error occurred");
    assert_eq!(other.status, 418);
}

#[test]
fn envelope_response_test() {
    let response = invalid_input_error("bid amount is required").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = invalid_credentials_error().into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get("location").is_none());

    let response = unauthorized_error().into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/login");

    let response = wrong_dashboard_error(UserType::Carrier).into_response();
    assert_eq!(response.headers()["location"], "/dashboard/carrier");
}
