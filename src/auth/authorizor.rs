use oso::{Oso, PolarClass};

use crate::auth::{Platform, User};
use crate::entities::{Bid, Load};
use crate::error::Error;

pub fn new() -> Result<Oso, Error> {
    let mut o = Oso::new();

    o.register_class(Platform::get_polar_class())?;
    o.register_class(User::get_polar_class())?;
    o.register_class(Load::get_polar_class())?;
    o.register_class(Bid::get_polar_class())?;

    o.load_str(include_str!("rules.polar"))?;

    Ok(o)
}

#[cfg(test)]
fn carrier(id: i64) -> User {
    User {
        id,
        roles: vec!["carrier".into()],
        carrier_access: true,
        shipper_access: false,
    }
}

#[cfg(test)]
fn shipper(id: i64) -> User {
    User {
        id,
        roles: vec!["shipper".into()],
        carrier_access: false,
        shipper_access: true,
    }
}

#[test]
fn platform_actions_test() {
    let authorizor = new().unwrap();

    let result = authorizor.is_allowed(shipper(1), "post_load", Platform::load_board());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(carrier(2), "post_load", Platform::load_board());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(carrier(2), "browse_loads", Platform::load_board());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(carrier(2), "list_own_bids", Platform::load_board());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(carrier(2), "place_bid", Platform::load_board());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(shipper(1), "place_bid", Platform::load_board());
    assert_eq!(result.unwrap(), false);

    let nobody = User {
        id: 3,
        roles: vec![],
        carrier_access: false,
        shipper_access: false,
    };
    let result = authorizor.is_allowed(nobody, "browse_loads", Platform::load_board());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn load_owner_test() {
    use crate::entities::sample_load;

    let authorizor = new().unwrap();
    let load = sample_load(10, 1);

    for action in ["edit", "delete", "change_status", "read_bids", "decide_bid"] {
        let result = authorizor.is_allowed(shipper(1), action, load.clone());
        assert_eq!(result.unwrap(), true, "owner should be allowed to {}", action);

        let result = authorizor.is_allowed(shipper(99), action, load.clone());
        assert_eq!(result.unwrap(), false, "stranger should not {}", action);

        let result = authorizor.is_allowed(carrier(1), action, load.clone());
        assert_eq!(result.unwrap(), false, "carrier should not {}", action);
    }

    let result = authorizor.is_allowed(carrier(2), "read", load.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(shipper(99), "read", load);
    assert_eq!(result.unwrap(), false);
}

#[test]
fn bid_owner_test() {
    use crate::entities::sample_bid;

    let authorizor = new().unwrap();
    let bid = sample_bid(5, 10, 2, 100.0);

    for action in ["read", "adjust", "withdraw"] {
        let result = authorizor.is_allowed(carrier(2), action, bid.clone());
        assert_eq!(result.unwrap(), true);

        let result = authorizor.is_allowed(carrier(3), action, bid.clone());
        assert_eq!(result.unwrap(), false);

        let result = authorizor.is_allowed(shipper(2), action, bid.clone());
        assert_eq!(result.unwrap(), false);
    }
}

#[test]
fn support_reads_any_bid_test() {
    use crate::entities::sample_bid;

    let authorizor = new().unwrap();
    let bid = sample_bid(5, 10, 2, 100.0);

    let support = User {
        id: 50,
        roles: vec!["support".into()],
        carrier_access: true,
        shipper_access: false,
    };

    let result = authorizor.is_allowed(support.clone(), "read", bid.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(support, "withdraw", bid);
    assert_eq!(result.unwrap(), false);
}
