use chrono::{DateTime, Utc};

use crate::{
    entities::{Bid, BidAmount, BidMessage, NewBid},
    error::{Error, ErrorKind},
};

/// The write a bid submission turns into.
#[derive(Clone, Debug, PartialEq)]
pub enum BidWrite {
    Create(NewBid),
    Update(Bid),
}

/// Decides between creating and updating given what the store returned for
/// (load, carrier). An existing bid that is no longer pending is refused
/// here, so no write is ever attempted for it.
pub fn plan(
    existing: Option<&Bid>,
    load_id: i64,
    carrier_id: i64,
    amount: BidAmount,
    acting_user: i64,
    now: DateTime<Utc>,
) -> Result<BidWrite, Error> {
    match existing {
        None => Ok(BidWrite::Create(NewBid::new(load_id, carrier_id, amount, now))),
        Some(bid) => Ok(BidWrite::Update(bid.with_amount(amount, acting_user, now)?)),
    }
}

/// Remote answers that mean "the store declined this bid" rather than
/// "the call failed".
pub(super) fn declined(err: &Error) -> bool {
    matches!(err.kind, ErrorKind::BadRequest | ErrorKind::NotFound)
}

pub(super) fn created_message(created: &Bid) -> BidMessage {
    if created.id > 0 {
        BidMessage::Placed
    } else {
        BidMessage::NotPlaced
    }
}

#[test]
fn first_bid_is_created_pending_test() {
    use crate::entities::BidStatus;

    let now = Utc::now();
    let write = plan(None, 10, 20, BidAmount::new(100.0).unwrap(), 20, now).unwrap();

    match write {
        BidWrite::Create(new_bid) => {
            assert_eq!(new_bid.load_id, 10);
            assert_eq!(new_bid.carrier_id, 20);
            assert_eq!(new_bid.bid_amount, 100.0);
            assert_eq!(new_bid.bid_status, BidStatus::Pending);
            assert_eq!(new_bid.bidding_time, now);
            assert_eq!(new_bid.updated_at, now);
        }
        other => panic!("expected a create, got {:?}", other),
    }
}

#[test]
fn existing_bid_is_updated_test() {
    use crate::entities::sample_bid;

    let existing = sample_bid(3, 10, 20, 100.0);
    let now = existing.bidding_time + chrono::Duration::seconds(30);

    let write = plan(Some(&existing), 10, 20, BidAmount::new(150.0).unwrap(), 20, now).unwrap();

    let expected = Bid {
        bid_amount: 150.0,
        updated_by: Some(20),
        updated_at: Some(now),
        ..existing
    };
    assert_eq!(write, BidWrite::Update(expected));
}

#[test]
fn decided_bid_is_not_planned_test() {
    use crate::entities::sample_bid;

    let mut existing = sample_bid(3, 10, 20, 100.0);
    existing.accept(7, Utc::now()).unwrap();

    let result = plan(Some(&existing), 10, 20, BidAmount::new(150.0).unwrap(), 20, Utc::now());
    assert_eq!(result.unwrap_err().kind, ErrorKind::InvalidState);
}

#[test]
fn created_message_requires_id_test() {
    use crate::entities::sample_bid;

    assert_eq!(created_message(&sample_bid(1, 1, 1, 1.0)), BidMessage::Placed);
    assert_eq!(created_message(&sample_bid(0, 1, 1, 1.0)), BidMessage::NotPlaced);
}
