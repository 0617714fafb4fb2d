use serde::{Deserialize, Serialize};

use super::codes::{CarrierRole, ShipperRole};
use super::load::ShipperSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Carrier,
    Shipper,
}

impl UserType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Carrier => "carrier",
            Self::Shipper => "shipper",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "carrier" => Some(Self::Carrier),
            "shipper" => Some(Self::Shipper),
            _ => None,
        }
    }

    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Self::Carrier => "/dashboard/carrier",
            Self::Shipper => "/dashboard/shipper",
        }
    }
}

/// Identity returned by the auth API at login.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthIdentity {
    pub id: i64,
    pub token: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub plate_number: String,
    #[serde(default)]
    pub capacity: Option<f64>,
}

/// User record as stored by the remote `/users` resource.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub motor_carrier_number: Option<String>,
    #[serde(default)]
    pub dot_number: Option<String>,
    #[serde(default)]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub available_capacity: Option<f64>,
    #[serde(default)]
    pub carrier_role: Option<CarrierRole>,
    #[serde(default)]
    pub carrier_vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub business_registration_number: Option<String>,
    #[serde(default)]
    pub shipper_role: Option<ShipperRole>,
    #[serde(default)]
    pub id_card_or_driver_licence_number: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CarrierProfile {
    pub company_name: String,
    pub motor_carrier_number: String,
    pub dot_number: String,
    pub equipment_type: String,
    pub available_capacity: Option<f64>,
    pub carrier_role: Option<CarrierRole>,
    pub carrier_vehicles: Vec<Vehicle>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipperProfile {
    pub company_name: String,
    pub business_type: String,
    pub business_registration_number: String,
    pub shipper_role: Option<ShipperRole>,
    pub id_card_or_driver_licence_number: String,
}

/// Business half of a profile. Being an enum, a profile carries either a
/// carrier role or a shipper role, never both.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "userType", rename_all = "lowercase")]
pub enum BusinessProfile {
    Carrier(CarrierProfile),
    Shipper(ShipperProfile),
}

impl BusinessProfile {
    /// Empty profile of the given type, used when the remote record is
    /// missing or belongs to the other dashboard.
    pub fn blank(user_type: UserType) -> Self {
        match user_type {
            UserType::Carrier => Self::Carrier(CarrierProfile::default()),
            UserType::Shipper => Self::Shipper(ShipperProfile::default()),
        }
    }

    /// Reads the business fields for `expected` out of a remote record,
    /// falling back to a blank profile when the record is of another type.
    pub fn from_record(record: &UserRecord, expected: UserType) -> Self {
        if record.user_type.as_deref() != Some(expected.name()) {
            return Self::blank(expected);
        }

        let text = |field: &Option<String>| field.clone().unwrap_or_default();

        match expected {
            UserType::Carrier => Self::Carrier(CarrierProfile {
                company_name: text(&record.company_name),
                motor_carrier_number: text(&record.motor_carrier_number),
                dot_number: text(&record.dot_number),
                equipment_type: text(&record.equipment_type),
                available_capacity: record.available_capacity,
                carrier_role: record.carrier_role,
                carrier_vehicles: record.carrier_vehicles.clone(),
            }),
            UserType::Shipper => Self::Shipper(ShipperProfile {
                company_name: text(&record.company_name),
                business_type: text(&record.business_type),
                business_registration_number: text(&record.business_registration_number),
                shipper_role: record.shipper_role,
                id_card_or_driver_licence_number: text(&record.id_card_or_driver_licence_number),
            }),
        }
    }

    pub fn user_type(&self) -> UserType {
        match self {
            Self::Carrier(_) => UserType::Carrier,
            Self::Shipper(_) => UserType::Shipper,
        }
    }

    pub fn company_name(&self) -> &str {
        match self {
            Self::Carrier(p) => &p.company_name,
            Self::Shipper(p) => &p.company_name,
        }
    }
}

/// Session-scoped union of the login identity and the business profile.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    #[serde(skip_serializing, default)]
    pub token: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub business: BusinessProfile,
    /// Whether the remote store already holds a record for this user.
    #[serde(default)]
    pub persisted: bool,
}

impl UserProfile {
    /// The one place identity and business fields are combined. Identity
    /// fields always come from the login; the remote record only supplies
    /// business data.
    pub fn merge(identity: &AuthIdentity, business: BusinessProfile, persisted: bool) -> Self {
        Self {
            id: identity.id,
            token: identity.token.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            roles: identity.roles.clone(),
            business,
            persisted,
        }
    }

    pub fn user_type(&self) -> UserType {
        self.business.user_type()
    }

    pub fn carrier_role(&self) -> Option<CarrierRole> {
        match &self.business {
            BusinessProfile::Carrier(p) => p.carrier_role,
            BusinessProfile::Shipper(_) => None,
        }
    }

    pub fn shipper_role(&self) -> Option<ShipperRole> {
        match &self.business {
            BusinessProfile::Shipper(p) => p.shipper_role,
            BusinessProfile::Carrier(_) => None,
        }
    }

    pub fn snapshot(&self) -> ShipperSnapshot {
        ShipperSnapshot {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            company_name: self.business.company_name().to_string(),
        }
    }

    /// Remote record carrying this profile, for `POST`/`PUT /users`.
    pub fn to_record(&self) -> UserRecord {
        let mut record = UserRecord {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            user_type: Some(self.user_type().name().to_string()),
            ..UserRecord::default()
        };

        match &self.business {
            BusinessProfile::Carrier(p) => {
                record.company_name = Some(p.company_name.clone());
                record.motor_carrier_number = Some(p.motor_carrier_number.clone());
                record.dot_number = Some(p.dot_number.clone());
                record.equipment_type = Some(p.equipment_type.clone());
                record.available_capacity = p.available_capacity;
                record.carrier_role = p.carrier_role;
                record.carrier_vehicles = p.carrier_vehicles.clone();
            }
            BusinessProfile::Shipper(p) => {
                record.company_name = Some(p.company_name.clone());
                record.business_type = Some(p.business_type.clone());
                record.business_registration_number = Some(p.business_registration_number.clone());
                record.shipper_role = p.shipper_role;
                record.id_card_or_driver_licence_number =
                    Some(p.id_card_or_driver_licence_number.clone());
            }
        }

        record
    }
}

#[cfg(test)]
fn identity() -> AuthIdentity {
    AuthIdentity {
        id: 42,
        token: "t0k3n".into(),
        email: "ops@haulers.test".into(),
        name: "Dana".into(),
        roles: vec!["carrier".into()],
    }
}

#[test]
fn matching_record_hydrates_business_fields_test() {
    let record = UserRecord {
        id: 42,
        user_type: Some("carrier".into()),
        company_name: Some("Haulers".into()),
        dot_number: Some("1234567".into()),
        carrier_role: Some(CarrierRole::FleetOwner),
        // stray shipper data must not leak into a carrier profile
        shipper_role: Some(ShipperRole::Corporate),
        ..UserRecord::default()
    };

    let profile = UserProfile::merge(
        &identity(),
        BusinessProfile::from_record(&record, UserType::Carrier),
        true,
    );

    assert_eq!(profile.carrier_role(), Some(CarrierRole::FleetOwner));
    assert_eq!(profile.shipper_role(), None);
    assert_eq!(profile.business.company_name(), "Haulers");
    assert_eq!(profile.token, "t0k3n");
}

#[test]
fn mismatched_record_yields_blank_profile_test() {
    let record = UserRecord {
        user_type: Some("shipper".into()),
        company_name: Some("Acme".into()),
        shipper_role: Some(ShipperRole::Independent),
        ..UserRecord::default()
    };

    let business = BusinessProfile::from_record(&record, UserType::Carrier);
    assert_eq!(business, BusinessProfile::Carrier(CarrierProfile::default()));
}

#[test]
fn record_round_trip_keeps_single_role_test() {
    let profile = UserProfile::merge(
        &identity(),
        BusinessProfile::Shipper(ShipperProfile {
            company_name: "Acme".into(),
            shipper_role: Some(ShipperRole::Government),
            ..ShipperProfile::default()
        }),
        false,
    );

    let record = profile.to_record();
    assert_eq!(record.user_type.as_deref(), Some("shipper"));
    assert_eq!(record.shipper_role, Some(ShipperRole::Government));
    assert_eq!(record.carrier_role, None);

    let json = serde_json::to_value(&profile).unwrap();
    assert!(json.get("token").is_none());
    assert_eq!(json["business"]["userType"], "shipper");
    assert_eq!(json["business"]["shipperRole"], 2);
}
