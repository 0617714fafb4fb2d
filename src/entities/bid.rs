use chrono::{DateTime, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codes::BidStatus;
use crate::error::{invalid_input_error, invalid_state_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: i64,
    pub load_id: i64,
    pub carrier_id: i64,
    pub bid_amount: f64,
    pub bid_status: BidStatus,
    pub bidding_time: DateTime<Utc>,
    #[serde(default)]
    pub updated_by: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /bids/`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBid {
    pub load_id: i64,
    pub carrier_id: i64,
    pub bid_amount: f64,
    pub bid_status: BidStatus,
    pub bidding_time: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewBid {
    pub fn new(load_id: i64, carrier_id: i64, amount: BidAmount, now: DateTime<Utc>) -> Self {
        Self {
            load_id,
            carrier_id,
            bid_amount: amount.value(),
            bid_status: BidStatus::Pending,
            bidding_time: now,
            updated_at: now,
        }
    }
}

/// A validated bid amount: finite and not negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BidAmount(f64);

impl BidAmount {
    pub fn new(value: f64) -> Result<Self, Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid_input_error(
                "bid amount must be a non-negative number",
            ));
        }

        Ok(Self(value))
    }

    /// Accepts JSON numbers and numeric strings, since form posts submit the
    /// amount as text.
    pub fn parse(raw: Option<&Value>) -> Result<Self, Error> {
        let value = match raw {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match value {
            Some(value) => Self::new(value),
            None => Err(invalid_input_error("bid amount is required")),
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidMessage {
    #[serde(rename = "bidPlaced")]
    Placed,
    #[serde(rename = "bidUpdatePlaced")]
    UpdatePlaced,
    #[serde(rename = "bidNotPlaced")]
    NotPlaced,
}

/// What the carrier is told after submitting an amount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BidOutcome {
    pub message: BidMessage,
    pub amount: f64,
}

impl BidOutcome {
    pub fn new(message: BidMessage, amount: BidAmount) -> Self {
        Self {
            message,
            amount: amount.value(),
        }
    }
}

impl Bid {
    pub fn is_pending(&self) -> bool {
        self.bid_status == BidStatus::Pending
    }

    /// Update payload for a new amount; identity, status and bidding time
    /// carry over from the stored bid.
    #[tracing::instrument(skip(self), fields(bid_id = self.id))]
    pub fn with_amount(
        &self,
        amount: BidAmount,
        updated_by: i64,
        now: DateTime<Utc>,
    ) -> Result<Bid, Error> {
        if !self.is_pending() {
            return Err(invalid_state_error(format!(
                "bid is {} and its amount can no longer change",
                self.bid_status
            )));
        }

        Ok(Bid {
            bid_amount: amount.value(),
            updated_by: Some(updated_by),
            updated_at: Some(now),
            ..self.clone()
        })
    }

    #[tracing::instrument(skip(self), fields(bid_id = self.id))]
    pub fn accept(&mut self, updated_by: i64, now: DateTime<Utc>) -> Result<(), Error> {
        self.decide(BidStatus::Accepted, updated_by, now)
    }

    #[tracing::instrument(skip(self), fields(bid_id = self.id))]
    pub fn reject(&mut self, updated_by: i64, now: DateTime<Utc>) -> Result<(), Error> {
        self.decide(BidStatus::Rejected, updated_by, now)
    }

    pub fn ensure_withdrawable(&self) -> Result<(), Error> {
        match self.bid_status {
            BidStatus::Pending => Ok(()),
            status => Err(invalid_state_error(format!(
                "bid is {} and can no longer be withdrawn",
                status
            ))),
        }
    }

    fn decide(&mut self, next: BidStatus, updated_by: i64, now: DateTime<Utc>) -> Result<(), Error> {
        match self.bid_status {
            BidStatus::Pending => {
                self.bid_status = next;
                self.updated_by = Some(updated_by);
                self.updated_at = Some(now);
                Ok(())
            }
            status => Err(invalid_state_error(format!(
                "bid is already {}",
                status
            ))),
        }
    }
}

impl PolarClass for Bid {
    fn get_polar_class_builder() -> oso::ClassBuilder<Bid> {
        oso::Class::builder()
            .name("Bid")
            .add_attribute_getter("id", |recv: &Bid| recv.id)
            .add_attribute_getter("load_id", |recv: &Bid| recv.load_id)
            .add_attribute_getter("carrier_id", |recv: &Bid| recv.carrier_id)
            .add_attribute_getter("status", |recv: &Bid| recv.bid_status.name().to_string())
    }

    fn get_polar_class() -> oso::Class {
        let builder = Bid::get_polar_class_builder();
        builder.build()
    }
}

#[cfg(test)]
pub(crate) fn sample_bid(id: i64, load_id: i64, carrier_id: i64, amount: f64) -> Bid {
    Bid {
        id,
        load_id,
        carrier_id,
        bid_amount: amount,
        bid_status: BidStatus::Pending,
        bidding_time: Utc::now(),
        updated_by: None,
        updated_at: None,
    }
}

#[test]
fn terminal_status_test() {
    let now = Utc::now();

    let mut bid = sample_bid(1, 10, 20, 100.0);
    bid.accept(7, now).unwrap();
    assert_eq!(bid.bid_status, BidStatus::Accepted);
    assert_eq!(bid.updated_by, Some(7));
    assert!(bid.accept(7, now).is_err());
    assert!(bid.reject(7, now).is_err());

    let mut bid = sample_bid(2, 10, 21, 100.0);
    bid.reject(7, now).unwrap();
    assert!(bid.accept(7, now).is_err());
    assert_eq!(bid.bid_status, BidStatus::Rejected);
}

#[test]
fn amount_change_keeps_identity_test() {
    let bid = sample_bid(3, 10, 20, 100.0);
    let later = bid.bidding_time + chrono::Duration::minutes(5);

    let updated = bid
        .with_amount(BidAmount::new(150.0).unwrap(), 20, later)
        .unwrap();

    assert_eq!(updated.id, bid.id);
    assert_eq!(updated.load_id, bid.load_id);
    assert_eq!(updated.carrier_id, bid.carrier_id);
    assert_eq!(updated.bid_status, BidStatus::Pending);
    assert_eq!(updated.bidding_time, bid.bidding_time);
    assert_eq!(updated.bid_amount, 150.0);
    assert_eq!(updated.updated_at, Some(later));
    assert_eq!(updated.updated_by, Some(20));
}

#[test]
fn amount_change_refused_after_decision_test() {
    let mut bid = sample_bid(3, 10, 20, 100.0);
    bid.reject(7, Utc::now()).unwrap();

    let result = bid.with_amount(BidAmount::new(150.0).unwrap(), 20, Utc::now());
    assert!(result.is_err());
    assert!(bid.ensure_withdrawable().is_err());
}

#[test]
fn bid_amount_parsing_test() {
    use serde_json::json;

    assert_eq!(BidAmount::parse(Some(&json!(100))).unwrap().value(), 100.0);
    assert_eq!(BidAmount::parse(Some(&json!(" 99.5 "))).unwrap().value(), 99.5);
    assert_eq!(BidAmount::parse(Some(&json!(0))).unwrap().value(), 0.0);
    assert!(BidAmount::parse(None).is_err());
    assert!(BidAmount::parse(Some(&json!("abc"))).is_err());
    assert!(BidAmount::parse(Some(&json!(-1))).is_err());
    assert!(BidAmount::parse(Some(&json!(null))).is_err());
    assert!(BidAmount::parse(Some(&json!("inf"))).is_err());
}

#[test]
fn outcome_wire_format_test() {
    let outcome = BidOutcome::new(BidMessage::UpdatePlaced, BidAmount::new(150.0).unwrap());
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["message"], "bidUpdatePlaced");
    assert_eq!(value["amount"], 150.0);
}
