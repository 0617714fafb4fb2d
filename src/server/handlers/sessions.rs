use axum::extract::{Extension, Json};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{invalid_credentials_error, Error};
use crate::server::session::{session_cookie, CurrentSession, SessionStore};
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct LoginParams {
    email: String,
    password: String,
}

pub async fn login(
    Extension(api): Extension<DynAPI>,
    Extension(store): Extension<SessionStore>,
    Json(params): Json<LoginParams>,
) -> Result<Response, Error> {
    let ctx = api
        .login(&params.email, &params.password)
        .await
        .map_err(login_error)?;

    let body = Json(json!({
        "id": ctx.identity.id,
        "email": ctx.identity.email,
        "name": ctx.identity.name,
        "roles": ctx.identity.roles,
    }));
    let cookie = session_cookie(ctx.id);

    store.save(ctx).await;

    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}

/// A 401 at login means bad credentials; it is rendered in place.
fn login_error(err: Error) -> Error {
    if err.is_unauthorized() {
        invalid_credentials_error()
    } else {
        err
    }
}

pub async fn logout(session: CurrentSession) -> Redirect {
    session.end().await;

    Redirect::to("/login")
}

#[test]
fn rejected_login_is_answered_in_place_test() {
    use crate::error::{invalid_input_error, unauthorized_error, ErrorKind};
    use axum::http::StatusCode;

    let err = login_error(unauthorized_error());
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::LOCATION).is_none());

    let err = login_error(invalid_input_error("email and password are required"));
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}
