use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::BidView;
use crate::entities::{Bid, BidOutcome};
use crate::error::Error;
use crate::server::session::CurrentSession;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceParams {
    #[serde(default)]
    bid_amount: Option<Value>,
}

pub async fn place(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Path(load_id): Path<i64>,
    Json(params): Json<PlaceParams>,
) -> Result<Json<BidOutcome>, Error> {
    let result = api
        .place_bid(&mut session.ctx, load_id, params.bid_amount)
        .await;
    let outcome = session.finish(result).await?;

    Ok(outcome.into())
}

pub async fn find_own(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Path(load_id): Path<i64>,
) -> Result<Json<BidView>, Error> {
    let result = api.find_own_bid(&mut session.ctx, load_id).await;
    let view = session.finish(result).await?;

    Ok(view.into())
}

pub async fn withdraw(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Path(load_id): Path<i64>,
) -> Result<Json<()>, Error> {
    let result = api.withdraw_bid(&mut session.ctx, load_id).await;
    session.finish(result).await?;

    Ok(().into())
}

pub async fn list_own(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
) -> Result<Json<Vec<Bid>>, Error> {
    let result = api.list_own_bids(&mut session.ctx).await;
    let bids = session.finish(result).await?;

    Ok(bids.into())
}

pub async fn list_for_load(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Path(load_id): Path<i64>,
) -> Result<Json<Vec<Bid>>, Error> {
    let result = api.list_load_bids(&mut session.ctx, load_id).await;
    let bids = session.finish(result).await?;

    Ok(bids.into())
}

pub async fn accept(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Path((load_id, bid_id)): Path<(i64, i64)>,
) -> Result<Json<Bid>, Error> {
    let result = api.accept_bid(&mut session.ctx, load_id, bid_id).await;
    let bid = session.finish(result).await?;

    Ok(bid.into())
}

pub async fn reject(
    Extension(api): Extension<DynAPI>,
    mut session: CurrentSession,
    Path((load_id, bid_id)): Path<(i64, i64)>,
) -> Result<Json<Bid>, Error> {
    let result = api.reject_bid(&mut session.ctx, load_id, bid_id).await;
    let bid = session.finish(result).await?;

    Ok(bid.into())
}
