use oso::PolarClass;
use serde::{Deserialize, Serialize};

use super::access::Capabilities;
use crate::entities::UserProfile;

/// The acting user as the policy sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub roles: Vec<String>,
    pub carrier_access: bool,
    pub shipper_access: bool,
}

impl User {
    pub fn new(id: i64, roles: Vec<String>, capabilities: Capabilities) -> Self {
        Self {
            id,
            roles,
            carrier_access: capabilities.carrier,
            shipper_access: capabilities.shipper,
        }
    }

    fn has_role(&self, role: String) -> bool {
        self.roles.iter().any(|x| x == &role)
    }
}

impl From<&UserProfile> for User {
    fn from(profile: &UserProfile) -> Self {
        User::new(profile.id, profile.roles.clone(), Capabilities::of(profile))
    }
}

impl PolarClass for User {
    fn get_polar_class_builder() -> oso::ClassBuilder<User> {
        oso::Class::builder()
            .name("User")
            .add_attribute_getter("id", |recv: &User| recv.id)
            .add_attribute_getter("roles", |recv: &User| recv.roles.clone())
            .add_attribute_getter("carrier_access", |recv: &User| recv.carrier_access)
            .add_attribute_getter("shipper_access", |recv: &User| recv.shipper_access)
            .add_method("has_role", User::has_role)
    }

    fn get_polar_class() -> oso::Class {
        let builder = User::get_polar_class_builder();
        builder.build()
    }
}
