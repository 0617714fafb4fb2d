use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::entities::{Load, LoadDraft, LoadStatus};
use crate::error::Error;
use crate::server::session::CurrentSession;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusParams {
    load_status: LoadStatus,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
) -> Result<Json<Vec<Load>>, Error> {
    let result = api.list_loads(&mut session.ctx).await;
    let loads = session.finish(result).await?;

    Ok(loads.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Json(draft): Json<LoadDraft>,
) -> Result<Json<Load>, Error> {
    let result = api.create_load(&mut session.ctx, draft).await;
    let load = session.finish(result).await?;

    Ok(load.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Path(id): Path<i64>,
) -> Result<Json<Load>, Error> {
    let result = api.find_load(&mut session.ctx, id).await;
    let load = session.finish(result).await?;

    Ok(load.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Path(id): Path<i64>,
    Json(draft): Json<LoadDraft>,
) -> Result<Json<Load>, Error> {
    let result = api.update_load(&mut session.ctx, id, draft).await;
    let load = session.finish(result).await?;

    Ok(load.into())
}

pub async fn change_status(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Path(id): Path<i64>,
    Json(params): Json<ChangeStatusParams>,
) -> Result<Json<Load>, Error> {
    let result = api
        .change_load_status(&mut session.ctx, id, params.load_status)
        .await;
    let load = session.finish(result).await?;

    Ok(load.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Path(id): Path<i64>,
) -> Result<Json<()>, Error> {
    let result = api.delete_load(&mut session.ctx, id).await;
    session.finish(result).await?;

    Ok(().into())
}
