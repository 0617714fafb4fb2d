use super::reconcile::{created_message, declined, plan, BidWrite};
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::{
    api::{BidAPI, BidView},
    auth::{require_complete, Platform, SessionContext},
    entities::{Bid, BidAmount, BidMessage, BidOutcome, LoadStatus, UserType},
    error::{invalid_state_error, not_found_error, Error},
};

#[derive(Clone, Copy, Debug)]
enum Decision {
    Accept,
    Reject,
}

#[async_trait]
impl BidAPI for Engine {
    /// Creates the carrier's bid on a load, or moves the amount of the one it
    /// already has. The existence check and the write are two separate remote
    /// calls; the store is the only arbiter between concurrent submissions.
    #[tracing::instrument(skip(self, ctx, amount))]
    async fn place_bid(
        &self,
        ctx: &mut SessionContext,
        load_id: i64,
        amount: Option<Value>,
    ) -> Result<BidOutcome, Error> {
        let amount = BidAmount::parse(amount.as_ref())?;

        let (profile, actor) = self.acting_profile(ctx).await?;

        self.authorize(actor.clone(), "place_bid", Platform::load_board())?;
        require_complete(&profile, UserType::Carrier)?;

        let token = profile.token.as_str();
        let carrier_id = profile.id;

        let load = self.remote.find_load(token, load_id).await?;
        if !load.is_open() {
            return Err(invalid_state_error("load is no longer taking bids"));
        }

        let existing = self.remote.find_bid(token, load_id, carrier_id).await?;
        if let Some(bid) = &existing {
            self.authorize(actor, "adjust", bid.clone())?;
        }

        let write = plan(
            existing.as_ref(),
            load_id,
            carrier_id,
            amount,
            profile.id,
            Utc::now(),
        )?;

        let message = match write {
            BidWrite::Create(new_bid) => {
                tracing::info!("no bid on file, creating one");

                match self.remote.create_bid(token, &new_bid).await {
                    Ok(created) => created_message(&created),
                    Err(err) if declined(&err) => BidMessage::NotPlaced,
                    Err(err) => return Err(err),
                }
            }
            BidWrite::Update(bid) => {
                tracing::info!(bid_id = bid.id, "bid on file, updating amount");

                match self.remote.update_bid(token, &bid).await {
                    Ok(()) => BidMessage::UpdatePlaced,
                    Err(err) if declined(&err) => BidMessage::NotPlaced,
                    Err(err) => return Err(err),
                }
            }
        };

        Ok(BidOutcome::new(message, amount))
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn find_own_bid(&self, ctx: &mut SessionContext, load_id: i64) -> Result<BidView, Error> {
        let (profile, actor) = self.acting_profile(ctx).await?;

        self.authorize(actor.clone(), "place_bid", Platform::load_board())?;

        let bid = self.remote.find_bid(&profile.token, load_id, profile.id).await?;

        let view = match bid {
            Some(bid) => {
                self.authorize(actor, "read", bid.clone())?;

                let pending = bid.is_pending();
                BidView {
                    can_adjust: pending && profile.carrier_role().is_some(),
                    can_withdraw: pending,
                    bid: Some(bid),
                }
            }
            None => BidView {
                bid: None,
                can_adjust: profile.carrier_role().is_some(),
                can_withdraw: false,
            },
        };

        Ok(view)
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn withdraw_bid(&self, ctx: &mut SessionContext, load_id: i64) -> Result<(), Error> {
        let (profile, actor) = self.acting_profile(ctx).await?;

        let bid = self
            .remote
            .find_bid(&profile.token, load_id, profile.id)
            .await?
            .ok_or_else(|| not_found_error("Bid"))?;

        self.authorize(actor, "withdraw", bid.clone())?;
        bid.ensure_withdrawable()?;

        self.remote.delete_bid(&profile.token, bid.id).await?;

        tracing::info!(bid_id = bid.id, "bid withdrawn");

        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn list_own_bids(&self, ctx: &mut SessionContext) -> Result<Vec<Bid>, Error> {
        let (profile, actor) = self.acting_profile(ctx).await?;

        self.authorize(actor, "list_own_bids", Platform::load_board())?;

        self.remote
            .list_carrier_bids(&profile.token, profile.id)
            .await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn list_load_bids(
        &self,
        ctx: &mut SessionContext,
        load_id: i64,
    ) -> Result<Vec<Bid>, Error> {
        let (profile, actor) = self.acting_profile(ctx).await?;

        let load = self.remote.find_load(&profile.token, load_id).await?;

        self.authorize(actor, "read_bids", load)?;

        self.remote.list_load_bids(&profile.token, load_id).await
    }

    async fn accept_bid(
        &self,
        ctx: &mut SessionContext,
        load_id: i64,
        bid_id: i64,
    ) -> Result<Bid, Error> {
        self.decide_bid(ctx, load_id, bid_id, Decision::Accept).await
    }

    async fn reject_bid(
        &self,
        ctx: &mut SessionContext,
        load_id: i64,
        bid_id: i64,
    ) -> Result<Bid, Error> {
        self.decide_bid(ctx, load_id, bid_id, Decision::Reject).await
    }
}

impl Engine {
    /// Shipper decision on a pending bid. Accepting also moves the load from
    /// open to accepted; both transitions are checked before either write.
    #[tracing::instrument(skip(self, ctx))]
    async fn decide_bid(
        &self,
        ctx: &mut SessionContext,
        load_id: i64,
        bid_id: i64,
        decision: Decision,
    ) -> Result<Bid, Error> {
        let (profile, actor) = self.acting_profile(ctx).await?;
        let token = profile.token.as_str();

        let mut load = self.remote.find_load(token, load_id).await?;

        self.authorize(actor, "decide_bid", load.clone())?;

        let mut bid = self
            .remote
            .list_load_bids(token, load_id)
            .await?
            .into_iter()
            .find(|bid| bid.id == bid_id)
            .ok_or_else(|| not_found_error("Bid"))?;

        let now = Utc::now();

        match decision {
            Decision::Accept => {
                bid.accept(profile.id, now)?;
                load.transition(LoadStatus::Accepted)?;
            }
            Decision::Reject => bid.reject(profile.id, now)?,
        }

        // The load goes first: if the bid write then fails, the load is no
        // longer open and no second bid can be accepted on it.
        if let Decision::Accept = decision {
            self.remote.update_load(token, &load).await?;
        }

        self.remote.update_bid(token, &bid).await?;

        if let Decision::Accept = decision {
            tracing::info!(bid_id, load_id, "bid accepted, load taken");
        }

        Ok(bid)
    }
}
