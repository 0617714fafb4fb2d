use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::auth::{Capabilities, SessionContext};
use crate::entities::{
    Bid, BidOutcome, BusinessProfile, Load, LoadDraft, LoadStatus, UserProfile, UserType,
};
use crate::error::Error;

/// A carrier's own bid on a load together with the actions the view may
/// offer; disabled actions are never sent to the remote store.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidView {
    pub bid: Option<Bid>,
    pub can_adjust: bool,
    pub can_withdraw: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct Dashboard {
    pub profile: UserProfile,
    pub capabilities: Capabilities,
}

#[async_trait]
pub trait SessionAPI {
    async fn login(&self, email: &str, password: &str) -> Result<SessionContext, Error>;

    async fn hydrate(&self, ctx: &mut SessionContext, view: UserType) -> Result<Dashboard, Error>;

    async fn complete_profile(
        &self,
        ctx: &mut SessionContext,
        business: BusinessProfile,
    ) -> Result<UserProfile, Error>;
}

#[async_trait]
pub trait LoadAPI {
    async fn list_loads(&self, ctx: &mut SessionContext) -> Result<Vec<Load>, Error>;
    async fn find_load(&self, ctx: &mut SessionContext, id: i64) -> Result<Load, Error>;
    async fn create_load(&self, ctx: &mut SessionContext, draft: LoadDraft) -> Result<Load, Error>;
    async fn update_load(
        &self,
        ctx: &mut SessionContext,
        id: i64,
        draft: LoadDraft,
    ) -> Result<Load, Error>;
    async fn change_load_status(
        &self,
        ctx: &mut SessionContext,
        id: i64,
        status: LoadStatus,
    ) -> Result<Load, Error>;
    async fn delete_load(&self, ctx: &mut SessionContext, id: i64) -> Result<(), Error>;
}

#[async_trait]
pub trait BidAPI {
    async fn place_bid(
        &self,
        ctx: &mut SessionContext,
        load_id: i64,
        amount: Option<Value>,
    ) -> Result<BidOutcome, Error>;
    async fn find_own_bid(&self, ctx: &mut SessionContext, load_id: i64) -> Result<BidView, Error>;
    async fn withdraw_bid(&self, ctx: &mut SessionContext, load_id: i64) -> Result<(), Error>;
    async fn list_own_bids(&self, ctx: &mut SessionContext) -> Result<Vec<Bid>, Error>;
    async fn list_load_bids(&self, ctx: &mut SessionContext, load_id: i64)
        -> Result<Vec<Bid>, Error>;
    async fn accept_bid(
        &self,
        ctx: &mut SessionContext,
        load_id: i64,
        bid_id: i64,
    ) -> Result<Bid, Error>;
    async fn reject_bid(
        &self,
        ctx: &mut SessionContext,
        load_id: i64,
        bid_id: i64,
    ) -> Result<Bid, Error>;
}

pub trait API: SessionAPI + LoadAPI + BidAPI {}
