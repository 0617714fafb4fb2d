use axum::extract::{Extension, Json};

use crate::api::Dashboard;
use crate::entities::{BusinessProfile, UserProfile, UserType};
use crate::error::Error;
use crate::server::session::CurrentSession;
use crate::server::DynAPI;

pub async fn carrier(
    Extension(api): Extension<DynAPI>,
    session: CurrentSession,
) -> Result<Json<Dashboard>, Error> {
    show(api, session, UserType::Carrier).await
}

pub async fn shipper(
    Extension(api): Extension<DynAPI>,
    session: CurrentSession,
) -> Result<Json<Dashboard>, Error> {
    show(api, session, UserType::Shipper).await
}

async fn show(
    api: DynAPI,
    mut session: CurrentSession,
    view: UserType,
) -> Result<Json<Dashboard>, Error> {
    let result = api.hydrate(&mut session.ctx, view).await;
    let dashboard = session.finish(result).await?;

    Ok(dashboard.into())
}

pub async fn complete_profile(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Json(business): Json<BusinessProfile>,
) -> Result<Json<UserProfile>, Error> {
    let result = api.complete_profile(&mut session.ctx, business).await;
    let profile = session.finish(result).await?;

    Ok(profile.into())
}
