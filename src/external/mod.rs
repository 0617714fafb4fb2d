//! Clients for the remote load-board REST service, which owns all persisted
//! state. Every call except login carries the caller's bearer token.

pub mod load_board;

use async_trait::async_trait;

use crate::entities::{AuthIdentity, Bid, Load, NewBid, NewLoad, UserRecord};
use crate::error::Error;

#[async_trait]
pub trait AuthRemote {
    async fn login(&self, email: &str, password: &str) -> Result<AuthIdentity, Error>;
}

#[async_trait]
pub trait UserRemote {
    /// `None` when the store has no record for `id` yet.
    async fn find_user(&self, token: &str, id: i64) -> Result<Option<UserRecord>, Error>;
    async fn create_user(&self, token: &str, record: &UserRecord) -> Result<UserRecord, Error>;
    async fn update_user(&self, token: &str, id: i64, record: &UserRecord) -> Result<(), Error>;
}

#[async_trait]
pub trait LoadRemote {
    async fn create_load(&self, token: &str, load: &NewLoad) -> Result<Load, Error>;
    async fn list_loads(&self, token: &str) -> Result<Vec<Load>, Error>;
    async fn find_load(&self, token: &str, id: i64) -> Result<Load, Error>;
    async fn update_load(&self, token: &str, load: &Load) -> Result<(), Error>;
    async fn delete_load(&self, token: &str, id: i64) -> Result<(), Error>;
}

#[async_trait]
pub trait BidRemote {
    async fn create_bid(&self, token: &str, bid: &NewBid) -> Result<Bid, Error>;
    /// The carrier's bid on a load; a 404 from the store is `Ok(None)`.
    async fn find_bid(&self, token: &str, load_id: i64, carrier_id: i64)
        -> Result<Option<Bid>, Error>;
    async fn list_load_bids(&self, token: &str, load_id: i64) -> Result<Vec<Bid>, Error>;
    async fn list_carrier_bids(&self, token: &str, carrier_id: i64) -> Result<Vec<Bid>, Error>;
    async fn update_bid(&self, token: &str, bid: &Bid) -> Result<(), Error>;
    async fn delete_bid(&self, token: &str, id: i64) -> Result<(), Error>;
}

pub trait Remote: AuthRemote + UserRemote + LoadRemote + BidRemote + Send + Sync {}

impl<T> Remote for T where T: AuthRemote + UserRemote + LoadRemote + BidRemote + Send + Sync {}
