use serde::Serialize;

use crate::entities::{UserProfile, UserType};
use crate::error::{forbidden_error, profile_incomplete_error, wrong_dashboard_error, Error};

const SHIPPER_ROLES: &[&str] = &[
    "shipper",
    "owner_operator",
    "dispatcher",
    "company_driver",
    "fleet_owner",
];

/// Capability flags derived once per request from user type and roles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub carrier: bool,
    pub shipper: bool,
}

impl Capabilities {
    pub fn derive(user_type: Option<UserType>, roles: &[String]) -> Self {
        let type_name = user_type.map(|t| t.name()).unwrap_or_default();
        let has_role = |role: &str| roles.iter().any(|r| r == role);
        let admin = has_role("admin");

        let carrier = type_name.contains("carrier")
            || roles.iter().any(|r| r.contains("carrier"))
            || has_role("support")
            || admin;

        let shipper = SHIPPER_ROLES.contains(&type_name)
            || roles.iter().any(|r| SHIPPER_ROLES.contains(&r.as_str()))
            || admin;

        Self { carrier, shipper }
    }

    pub fn of(profile: &UserProfile) -> Self {
        Self::derive(Some(profile.user_type()), &profile.roles)
    }

    pub fn any(&self) -> bool {
        self.carrier || self.shipper
    }

    /// Dashboard an account lands on by default.
    pub fn home(&self) -> Option<UserType> {
        match (self.carrier, self.shipper) {
            (true, _) => Some(UserType::Carrier),
            (false, true) => Some(UserType::Shipper),
            (false, false) => None,
        }
    }

    pub fn allows(&self, view: UserType) -> bool {
        match view {
            UserType::Carrier => self.carrier,
            UserType::Shipper => self.shipper,
        }
    }

    /// Admits a request to `view`, or sends the account to its own
    /// dashboard. Accounts with no capability at all are refused.
    pub fn enter(&self, view: UserType) -> Result<(), Error> {
        if self.allows(view) {
            return Ok(());
        }

        match self.home() {
            Some(own) => Err(wrong_dashboard_error(own)),
            None => Err(forbidden_error()),
        }
    }
}

/// Posting loads and placing bids both need the matching business role on
/// file; anything else is routed to profile completion.
pub fn require_complete(profile: &UserProfile, acting_as: UserType) -> Result<(), Error> {
    let complete = match acting_as {
        UserType::Carrier => profile.carrier_role().is_some(),
        UserType::Shipper => profile.shipper_role().is_some(),
    };

    if complete {
        Ok(())
    } else {
        tracing::info!(user_id = profile.id, "business profile incomplete");
        Err(profile_incomplete_error())
    }
}

#[cfg(test)]
fn roles(names: &[&str]) -> Vec<String> {
    names.iter().map(|x| x.to_string()).collect()
}

#[test]
fn carrier_access_test() {
    let caps = Capabilities::derive(Some(UserType::Carrier), &[]);
    assert_eq!(caps, Capabilities { carrier: true, shipper: false });

    let caps = Capabilities::derive(None, &roles(&["carrier_admin"]));
    assert!(caps.carrier);

    let caps = Capabilities::derive(None, &roles(&["support"]));
    assert!(caps.carrier && !caps.shipper);
}

#[test]
fn shipper_access_test() {
    let caps = Capabilities::derive(Some(UserType::Shipper), &[]);
    assert_eq!(caps, Capabilities { carrier: false, shipper: true });

    let caps = Capabilities::derive(None, &roles(&["company_driver"]));
    assert!(caps.shipper && !caps.carrier);

    let caps = Capabilities::derive(None, &roles(&["admin"]));
    assert!(caps.shipper && caps.carrier);
}

#[test]
fn no_capability_is_denied_test() {
    let caps = Capabilities::derive(None, &roles(&["guest"]));
    assert!(!caps.any());

    let err = caps.enter(UserType::Carrier).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::Forbidden);
}

#[test]
fn wrong_dashboard_redirects_home_test() {
    let caps = Capabilities::derive(Some(UserType::Carrier), &[]);

    assert!(caps.enter(UserType::Carrier).is_ok());

    let err = caps.enter(UserType::Shipper).unwrap_err();
    assert_eq!(
        err.kind,
        crate::error::ErrorKind::WrongDashboard(UserType::Carrier)
    );
}
