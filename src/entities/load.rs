use chrono::NaiveDate;
use oso::PolarClass;
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, invalid_state_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    pub id: i64,
    pub origin: String,
    pub destination: String,
    pub pickup_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub commodity: String,
    pub weight: f64,
    pub offer_amount: f64,
    #[serde(default)]
    pub load_details: String,
    pub load_status: Status,
    pub created_by: ShipperSnapshot,
}

/// Shipper identity frozen onto a load when it is posted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShipperSnapshot {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company_name: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Accepted,
    Enroute,
    Delivered,
    Rejected,
    Closed,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Open => "open".into(),
            Self::Accepted => "accepted".into(),
            Self::Enroute => "enroute".into(),
            Self::Delivered => "delivered".into(),
            Self::Rejected => "rejected".into(),
            Self::Closed => "closed".into(),
        }
    }

    pub fn can_become(&self, next: Status) -> bool {
        use Status::*;

        matches!(
            (self, next),
            (Open, Accepted)
                | (Open, Rejected)
                | (Open, Closed)
                | (Accepted, Enroute)
                | (Accepted, Closed)
                | (Enroute, Delivered)
                | (Delivered, Closed)
        )
    }
}

/// Fields a shipper supplies when posting or editing a load.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadDraft {
    pub origin: String,
    pub destination: String,
    pub pickup_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub commodity: String,
    pub weight: f64,
    pub offer_amount: f64,
    #[serde(default)]
    pub load_details: String,
}

impl LoadDraft {
    pub fn validate(&self) -> Result<(), Error> {
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(invalid_input_error("origin and destination are required"));
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(invalid_input_error("weight must be a non-negative number"));
        }

        if !self.offer_amount.is_finite() || self.offer_amount < 0.0 {
            return Err(invalid_input_error(
                "offer amount must be a non-negative number",
            ));
        }

        if self.delivery_date < self.pickup_date {
            return Err(invalid_input_error(
                "delivery date cannot precede pickup date",
            ));
        }

        Ok(())
    }
}

/// Body of `POST /loads/`; the remote store assigns the id.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoad {
    #[serde(flatten)]
    pub draft: LoadDraft,
    pub load_status: Status,
    pub created_by: ShipperSnapshot,
}

impl NewLoad {
    pub fn new(draft: LoadDraft, created_by: ShipperSnapshot) -> Self {
        Self {
            draft,
            load_status: Status::Open,
            created_by,
        }
    }
}

impl Load {
    pub fn shipper_id(&self) -> i64 {
        self.created_by.id
    }

    pub fn is_open(&self) -> bool {
        self.load_status == Status::Open
    }

    #[tracing::instrument(skip(self), fields(load_id = self.id))]
    pub fn transition(&mut self, next: Status) -> Result<(), Error> {
        if !self.load_status.can_become(next) {
            return Err(invalid_state_error(format!(
                "load cannot move from {} to {}",
                self.load_status.name(),
                next.name()
            )));
        }

        self.load_status = next;
        Ok(())
    }

    pub fn apply(&mut self, draft: LoadDraft) -> Result<(), Error> {
        if !self.is_open() {
            return Err(invalid_state_error("only open loads can be edited"));
        }

        self.origin = draft.origin;
        self.destination = draft.destination;
        self.pickup_date = draft.pickup_date;
        self.delivery_date = draft.delivery_date;
        self.commodity = draft.commodity;
        self.weight = draft.weight;
        self.offer_amount = draft.offer_amount;
        self.load_details = draft.load_details;

        Ok(())
    }
}

impl PolarClass for Load {
    fn get_polar_class_builder() -> oso::ClassBuilder<Load> {
        oso::Class::builder()
            .name("Load")
            .add_attribute_getter("id", |recv: &Load| recv.id)
            .add_attribute_getter("shipper_id", |recv: &Load| recv.shipper_id())
    }

    fn get_polar_class() -> oso::Class {
        let builder = Load::get_polar_class_builder();
        builder.build()
    }
}

#[cfg(test)]
pub(crate) fn sample_load(id: i64, shipper_id: i64) -> Load {
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
        load_status: Status::Open,
        created_by: ShipperSnapshot {
            id: shipper_id,
            name: "Shipper".into(),
            email: "shipper@example.com".into(),
            company_name: "Acme".into(),
        },
    }
}

#[test]
fn load_status_transition_test() {
    let mut load = sample_load(1, 7);

    assert!(load.transition(Status::Delivered).is_err());
    load.transition(Status::Accepted).unwrap();
    load.transition(Status::Enroute).unwrap();
    assert!(load.transition(Status::Open).is_err());
    load.transition(Status::Delivered).unwrap();
    load.transition(Status::Closed).unwrap();
    assert!(load.transition(Status::Closed).is_err());
}

#[test]
fn load_edit_requires_open_test() {
    let mut load = sample_load(1, 7);
    let draft = LoadDraft {
        origin: "Austin, TX".into(),
        destination: "Tulsa, OK".into(),
        pickup_date: load.pickup_date,
        delivery_date: load.delivery_date,
        commodity: "Steel".into(),
        weight: 1000.0,
        offer_amount: 900.0,
        load_details: String::new(),
    };

    load.apply(draft.clone()).unwrap();
    assert_eq!(load.origin, "Austin, TX");

    load.transition(Status::Closed).unwrap();
    assert!(load.apply(draft).is_err());
}

#[test]
fn load_draft_validation_test() {
    let load = sample_load(1, 7);
    let mut draft = LoadDraft {
        origin: "".into(),
        destination: "Tulsa, OK".into(),
        pickup_date: load.pickup_date,
        delivery_date: load.delivery_date,
        commodity: "Steel".into(),
        weight: 1000.0,
        offer_amount: 900.0,
        load_details: String::new(),
    };
    assert!(draft.validate().is_err());

    draft.origin = "Austin, TX".into();
    assert!(draft.validate().is_ok());

    draft.offer_amount = f64::NAN;
    assert!(draft.validate().is_err());

    draft.offer_amount = 10.0;
    draft.delivery_date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
    assert!(draft.validate().is_err());
}
