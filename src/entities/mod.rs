mod bid;
mod codes;
mod load;
mod profile;

pub use bid::{Bid, BidAmount, BidMessage, BidOutcome, NewBid};
pub use codes::{BidStatus, CarrierRole, ShipperRole};
pub use load::{Load, LoadDraft, NewLoad, ShipperSnapshot, Status as LoadStatus};
pub use profile::{
    AuthIdentity, BusinessProfile, CarrierProfile, ShipperProfile, UserProfile, UserRecord,
    UserType, Vehicle,
};

#[cfg(test)]
pub(crate) use bid::sample_bid;
#[cfg(test)]
pub(crate) use load::sample_load;
