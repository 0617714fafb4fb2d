use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::access::Capabilities;
use super::User;
use crate::entities::{AuthIdentity, BusinessProfile, UserProfile, UserType};

/// Per-session state handed to every engine call by mutable reference.
///
/// `version` increases on every change so a handler can tell whether it must
/// write the session back. Nothing else in the crate copies identity or
/// business fields around; `hydrate` is the only writer of `profile`.
#[derive(Clone, Debug, Serialize)]
pub struct SessionContext {
    pub id: Uuid,
    pub version: u64,
    #[serde(skip)]
    pub identity: AuthIdentity,
    pub profile: Option<UserProfile>,
    pub hydrated_at: Option<DateTime<Utc>>,
    /// Last request served on this session; the store expires sessions idle
    /// for longer than its TTL.
    pub last_seen: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(identity: AuthIdentity) -> Self {
        Self {
            id: Uuid::new_v4(),
            version: 1,
            identity,
            profile: None,
            hydrated_at: None,
            last_seen: Utc::now(),
        }
    }

    pub fn token(&self) -> &str {
        &self.identity.token
    }

    /// Capabilities before any business profile is known, from the login
    /// roles alone.
    pub fn identity_capabilities(&self) -> Capabilities {
        Capabilities::derive(None, &self.identity.roles)
    }

    pub fn capabilities(&self) -> Capabilities {
        match &self.profile {
            Some(profile) => Capabilities::of(profile),
            None => self.identity_capabilities(),
        }
    }

    /// Replaces the session profile with the merge of the login identity and
    /// `business`.
    pub fn hydrate(&mut self, business: BusinessProfile, persisted: bool) -> &UserProfile {
        self.version += 1;
        self.hydrated_at = Some(Utc::now());
        self.profile
            .insert(UserProfile::merge(&self.identity, business, persisted))
    }

    pub fn actor(&self) -> Option<User> {
        self.profile.as_ref().map(User::from)
    }

    pub fn hydrated_as(&self, user_type: UserType) -> Option<&UserProfile> {
        self.profile
            .as_ref()
            .filter(|profile| profile.user_type() == user_type)
    }
}

#[cfg(test)]
fn identity(roles: &[&str]) -> AuthIdentity {
    AuthIdentity {
        id: 9,
        token: "abc".into(),
        email: "c@example.com".into(),
        name: "Casey".into(),
        roles: roles.iter().map(|x| x.to_string()).collect(),
    }
}

#[test]
fn hydrate_bumps_version_and_merges_test() {
    use crate::entities::{CarrierProfile, CarrierRole};

    let mut ctx = SessionContext::new(identity(&["carrier"]));
    assert_eq!(ctx.version, 1);
    assert!(ctx.actor().is_none());

    let profile = ctx.hydrate(
        BusinessProfile::Carrier(CarrierProfile {
            carrier_role: Some(CarrierRole::OwnerOperator),
            ..CarrierProfile::default()
        }),
        true,
    );
    assert_eq!(profile.id, 9);
    assert_eq!(profile.token, "abc");

    assert_eq!(ctx.version, 2);
    assert!(ctx.hydrated_as(UserType::Carrier).is_some());
    assert!(ctx.hydrated_as(UserType::Shipper).is_none());

    let actor = ctx.actor().unwrap();
    assert!(actor.carrier_access);
    assert!(!actor.shipper_access);
}

#[test]
fn identity_capabilities_before_hydration_test() {
    let ctx = SessionContext::new(identity(&["shipper"]));
    let caps = ctx.capabilities();

    assert!(caps.shipper);
    assert!(!caps.carrier);
}
