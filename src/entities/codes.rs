//! Integer-coded enumerations shared with the remote API.
//!
//! The remote store encodes bid status and business roles as small integers.
//! Each enum below is declared once with its code and display name, and that
//! table is the only place either mapping lives.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::error::{invalid_input_error, Error};

macro_rules! coded_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|x| x.name() == name)
            }
        }

        impl TryFrom<u8> for $name {
            type Error = Error;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|x| x.code() == code)
                    .ok_or_else(|| {
                        invalid_input_error(format!(
                            "{} is not a valid {} code",
                            code,
                            stringify!($name)
                        ))
                    })
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.code()
            }
        }
    };
}

coded_enum!(
    /// Lifecycle state of a bid.
    BidStatus {
        Pending = 0 => "pending",
        Accepted = 1 => "accepted",
        Rejected = 2 => "rejected",
    }
);

coded_enum!(
    CarrierRole {
        OwnerOperator = 0 => "owner_operator",
        FleetOwner = 1 => "fleet_owner",
        Dispatcher = 2 => "dispatcher",
    }
);

coded_enum!(
    ShipperRole {
        Independent = 0 => "independent",
        Corporate = 1 => "corporate",
        Government = 2 => "govt",
    }
);

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[test]
fn bid_status_wire_format_test() {
    assert_eq!(serde_json::to_value(BidStatus::Accepted).unwrap(), 1);
    assert_eq!(
        serde_json::from_value::<BidStatus>(serde_json::json!(2)).unwrap(),
        BidStatus::Rejected
    );
    assert!(serde_json::from_value::<BidStatus>(serde_json::json!(7)).is_err());
}

#[test]
fn role_name_table_test() {
    assert_eq!(CarrierRole::try_from(2).unwrap(), CarrierRole::Dispatcher);
    assert_eq!(ShipperRole::Government.name(), "govt");
    assert_eq!(
        CarrierRole::from_name("fleet_owner"),
        Some(CarrierRole::FleetOwner)
    );
    assert_eq!(ShipperRole::from_name("unknown"), None);
}
