#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use loadboard::auth::SessionContext;
use loadboard::engine::Engine;
use loadboard::entities::{
    AuthIdentity, Bid, BusinessProfile, CarrierProfile, CarrierRole, Load, LoadStatus, NewBid,
    NewLoad, ShipperProfile, ShipperRole, ShipperSnapshot, UserRecord,
};
use loadboard::error::{not_found_error, remote_status_error, unauthorized_error, Error};
use loadboard::external::{AuthRemote, BidRemote, LoadRemote, UserRemote};

/// In-memory stand-in for the remote load-board service. Records every call
/// by name so tests can assert that refused actions never reached it.
#[derive(Default)]
pub struct FakeRemote {
    state: Mutex<State>,
}

#[derive(Default)]
pub struct State {
    pub users: HashMap<i64, UserRecord>,
    pub loads: HashMap<i64, Load>,
    pub bids: HashMap<i64, Bid>,
    pub next_id: i64,
    pub calls: Vec<&'static str>,
    /// Status to answer with on the next call of the named method.
    pub failures: HashMap<&'static str, u16>,
    pub create_bid_returns_zero_id: bool,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.with(|s| s.calls.clone())
    }

    pub fn clear_calls(&self) {
        self.with(|s| s.calls.clear());
    }

    pub fn fail_next(&self, method: &'static str, status: u16) {
        self.with(|s| s.failures.insert(method, status));
    }

    pub fn bids_for(&self, load_id: i64, carrier_id: i64) -> Vec<Bid> {
        self.with(|s| {
            s.bids
                .values()
                .filter(|b| b.load_id == load_id && b.carrier_id == carrier_id)
                .cloned()
                .collect()
        })
    }

    pub fn insert_load(&self, shipper_id: i64) -> Load {
        self.with(|s| {
            s.next_id += 1;
            let load = sample_load(s.next_id, shipper_id);
            s.loads.insert(load.id, load.clone());
            load
        })
    }

    pub fn insert_bid(&self, bid: Bid) {
        self.with(|s| {
            s.next_id = s.next_id.max(bid.id);
            s.bids.insert(bid.id, bid);
        });
    }

    pub fn insert_user(&self, record: UserRecord) {
        self.with(|s| s.users.insert(record.id, record));
    }

    pub fn load(&self, id: i64) -> Load {
        self.with(|s| s.loads[&id].clone())
    }

    pub fn bid(&self, id: i64) -> Bid {
        self.with(|s| s.bids[&id].clone())
    }

    fn enter(&self, method: &'static str) -> Result<(), Error> {
        self.with(|s| {
            s.calls.push(method);
            match s.failures.remove(method) {
                Some(status) => Err(remote_status_error(status, "Resource")),
                None => Ok(()),
            }
        })
    }
}

#[async_trait]
impl AuthRemote for FakeRemote {
    async fn login(&self, email: &str, password: &str) -> Result<AuthIdentity, Error> {
        self.enter("login")?;

        if password != "secret" {
            return Err(unauthorized_error());
        }

        Ok(AuthIdentity {
            id: 77,
            token: "issued-token".into(),
            email: email.into(),
            name: "Morgan".into(),
            roles: vec!["carrier".into()],
        })
    }
}

#[async_trait]
impl UserRemote for FakeRemote {
    async fn find_user(&self, _token: &str, id: i64) -> Result<Option<UserRecord>, Error> {
        self.enter("find_user")?;
        Ok(self.with(|s| s.users.get(&id).cloned()))
    }

    async fn create_user(&self, _token: &str, record: &UserRecord) -> Result<UserRecord, Error> {
        self.enter("create_user")?;
        self.with(|s| s.users.insert(record.id, record.clone()));
        Ok(record.clone())
    }

    async fn update_user(&self, _token: &str, id: i64, record: &UserRecord) -> Result<(), Error> {
        self.enter("update_user")?;
        self.with(|s| match s.users.get_mut(&id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(not_found_error("User")),
        })
    }
}

#[async_trait]
impl LoadRemote for FakeRemote {
    async fn create_load(&self, _token: &str, load: &NewLoad) -> Result<Load, Error> {
        self.enter("create_load")?;
        self.with(|s| {
            s.next_id += 1;
            let draft = load.draft.clone();
            let created = Load {
                id: s.next_id,
                origin: draft.origin,
                destination: draft.destination,
                pickup_date: draft.pickup_date,
                delivery_date: draft.delivery_date,
                commodity: draft.commodity,
                weight: draft.weight,
                offer_amount: draft.offer_amount,
                load_details: draft.load_details,
                load_status: load.load_status,
                created_by: load.created_by.clone(),
            };
            s.loads.insert(created.id, created.clone());
            Ok(created)
        })
    }

    async fn list_loads(&self, _token: &str) -> Result<Vec<Load>, Error> {
        self.enter("list_loads")?;
        Ok(self.with(|s| s.loads.values().cloned().collect()))
    }

    async fn find_load(&self, _token: &str, id: i64) -> Result<Load, Error> {
        self.enter("find_load")?;
        self.with(|s| s.loads.get(&id).cloned().ok_or_else(|| not_found_error("Load")))
    }

    async fn update_load(&self, _token: &str, load: &Load) -> Result<(), Error> {
        self.enter("update_load")?;
        self.with(|s| match s.loads.get_mut(&load.id) {
            Some(existing) => {
                *existing = load.clone();
                Ok(())
            }
            None => Err(not_found_error("Load")),
        })
    }

    async fn delete_load(&self, _token: &str, id: i64) -> Result<(), Error> {
        self.enter("delete_load")?;
        self.with(|s| {
            s.loads
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| not_found_error("Load"))
        })
    }
}

#[async_trait]
impl BidRemote for FakeRemote {
    async fn create_bid(&self, _token: &str, bid: &NewBid) -> Result<Bid, Error> {
        self.enter("create_bid")?;
        self.with(|s| {
            let id = if s.create_bid_returns_zero_id {
                0
            } else {
                s.next_id += 1;
                s.next_id
            };

            let created = Bid {
                id,
                load_id: bid.load_id,
                carrier_id: bid.carrier_id,
                bid_amount: bid.bid_amount,
                bid_status: bid.bid_status,
                bidding_time: bid.bidding_time,
                updated_by: None,
                updated_at: Some(bid.updated_at),
            };

            if id > 0 {
                s.bids.insert(id, created.clone());
            }

            Ok(created)
        })
    }

    async fn find_bid(
        &self,
        _token: &str,
        load_id: i64,
        carrier_id: i64,
    ) -> Result<Option<Bid>, Error> {
        self.enter("find_bid")?;
        Ok(self.with(|s| {
            s.bids
                .values()
                .find(|b| b.load_id == load_id && b.carrier_id == carrier_id)
                .cloned()
        }))
    }

    async fn list_load_bids(&self, _token: &str, load_id: i64) -> Result<Vec<Bid>, Error> {
        self.enter("list_load_bids")?;
        Ok(self.with(|s| {
            s.bids
                .values()
                .filter(|b| b.load_id == load_id)
                .cloned()
                .collect()
        }))
    }

    async fn list_carrier_bids(&self, _token: &str, carrier_id: i64) -> Result<Vec<Bid>, Error> {
        self.enter("list_carrier_bids")?;
        Ok(self.with(|s| {
            s.bids
                .values()
                .filter(|b| b.carrier_id == carrier_id)
                .cloned()
                .collect()
        }))
    }

    async fn update_bid(&self, _token: &str, bid: &Bid) -> Result<(), Error> {
        self.enter("update_bid")?;
        self.with(|s| match s.bids.get_mut(&bid.id) {
            Some(existing) => {
                *existing = bid.clone();
                Ok(())
            }
            None => Err(not_found_error("Bid")),
        })
    }

    async fn delete_bid(&self, _token: &str, id: i64) -> Result<(), Error> {
        self.enter("delete_bid")?;
        self.with(|s| {
            s.bids
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| not_found_error("Bid"))
        })
    }
}

pub fn engine(remote: &Arc<FakeRemote>) -> Engine {
    Engine::new(remote.clone()).unwrap()
}

pub fn identity(id: i64, roles: &[&str]) -> AuthIdentity {
    AuthIdentity {
        id,
        token: format!("token-{}", id),
        email: format!("user{}@example.com", id),
        name: format!("User {}", id),
        roles: roles.iter().map(|x| x.to_string()).collect(),
    }
}

/// Session of a carrier whose profile is already hydrated.
pub fn carrier_session(id: i64, role: Option<CarrierRole>) -> SessionContext {
    let mut ctx = SessionContext::new(identity(id, &["carrier"]));
    ctx.hydrate(
        BusinessProfile::Carrier(CarrierProfile {
            company_name: "Roadrunner Freight".into(),
            carrier_role: role,
            ..CarrierProfile::default()
        }),
        true,
    );
    ctx
}

/// Session of a shipper whose profile is already hydrated.
pub fn shipper_session(id: i64, role: Option<ShipperRole>) -> SessionContext {
    let mut ctx = SessionContext::new(identity(id, &["shipper"]));
    ctx.hydrate(
        BusinessProfile::Shipper(ShipperProfile {
            company_name: "Acme Goods".into(),
            shipper_role: role,
            ..ShipperProfile::default()
        }),
        true,
    );
    ctx
}

pub fn sample_load(id: i64, shipper_id: i64) -> Load {
    Load {
        id,
        origin: "Dallas, TX".into(),
        destination: "Memphis, TN".into(),
        pickup_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
        delivery_date: NaiveDate::from_ymd_opt(2026, 11, 4).unwrap(),
        commodity: "Paper goods".into(),
        weight: 42000.0,
        offer_amount: 1800.0,
        load_details: String::new(),
        load_status: LoadStatus::Open,
        created_by: ShipperSnapshot {
            id: shipper_id,
            name: format!("User {}", shipper_id),
            email: format!("user{}@example.com", shipper_id),
            company_name: "Acme Goods".into(),
        },
    }
}
