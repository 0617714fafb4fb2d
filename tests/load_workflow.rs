mod common;

use chrono::NaiveDate;
use tokio_test::assert_ok;

use common::{carrier_session, engine, shipper_session, FakeRemote};
use loadboard::api::LoadAPI;
use loadboard::entities::{CarrierRole, LoadDraft, LoadStatus, ShipperRole};
use loadboard::error::ErrorKind;

const SHIPPER: i64 = 10;

fn draft() -> LoadDraft {
    LoadDraft {
        origin: "Tulsa, OK".into(),
        destination: "Wichita, KS".into(),
        pickup_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
        delivery_date: NaiveDate::from_ymd_opt(2026, 12, 2).unwrap(),
        commodity: "Steel coils".into(),
        weight: 38000.0,
        offer_amount: 1200.0,
        load_details: "Tarps required".into(),
    }
}

#[tokio::test]
async fn shipper_posts_open_load_test() {
    let remote = FakeRemote::new();
    let engine = engine(&remote);
    let mut ctx = shipper_session(SHIPPER, Some(ShipperRole::Corporate));

    let load = assert_ok!(engine.create_load(&mut ctx, draft()).await);

    assert_eq!(load.load_status, LoadStatus::Open);
    assert_eq!(load.shipper_id(), SHIPPER);
    assert_eq!(load.created_by.company_name, "Acme Goods");
    assert_eq!(remote.load(load.id), load);
}

#[tokio::test]
async fn posting_needs_complete_shipper_test() {
    let remote = FakeRemote::new();
    let engine = engine(&remote);

    let mut incomplete = shipper_session(SHIPPER, None);
    let err = engine.create_load(&mut incomplete, draft()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ProfileIncomplete);

    let mut carrier = carrier_session(20, Some(CarrierRole::OwnerOperator));
    let err = engine.create_load(&mut carrier, draft()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn invalid_draft_is_refused_test() {
    let remote = FakeRemote::new();
    let engine = engine(&remote);
    let mut ctx = shipper_session(SHIPPER, Some(ShipperRole::Corporate));

    let mut backwards = draft();
    backwards.delivery_date = NaiveDate::from_ymd_opt(2026, 11, 30).unwrap();
    let err = engine.create_load(&mut ctx, backwards).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let mut heavy = draft();
    heavy.weight = -1.0;
    let err = engine.create_load(&mut ctx, heavy).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn owner_edits_open_load_only_test() {
    let remote = FakeRemote::new();
    let engine = engine(&remote);
    let load = remote.insert_load(SHIPPER);

    let mut owner = shipper_session(SHIPPER, Some(ShipperRole::Corporate));
    let edited = assert_ok!(engine.update_load(&mut owner, load.id, draft()).await);
    assert_eq!(edited.origin, "Tulsa, OK");
    assert_eq!(edited.created_by, load.created_by);
    assert_eq!(remote.load(load.id).commodity, "Steel coils");

    let mut other = shipper_session(SHIPPER + 1, Some(ShipperRole::Corporate));
    let err = engine
        .update_load(&mut other, load.id, draft())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    assert_ok!(
        engine
            .change_load_status(&mut owner, load.id, LoadStatus::Closed)
            .await
    );
    let err = engine
        .update_load(&mut owner, load.id, draft())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
}

#[tokio::test]
async fn load_status_moves_forward_only_test() {
    let remote = FakeRemote::new();
    let engine = engine(&remote);
    let load = remote.insert_load(SHIPPER);
    let mut ctx = shipper_session(SHIPPER, Some(ShipperRole::Independent));

    for next in [LoadStatus::Accepted, LoadStatus::Enroute, LoadStatus::Delivered] {
        let moved = assert_ok!(engine.change_load_status(&mut ctx, load.id, next).await);
        assert_eq!(moved.load_status, next);
    }

    remote.clear_calls();
    let err = engine
        .change_load_status(&mut ctx, load.id, LoadStatus::Open)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
    assert!(!remote.calls().contains(&"update_load"));
    assert_eq!(remote.load(load.id).load_status, LoadStatus::Delivered);
}

#[tokio::test]
async fn carriers_browse_but_do_not_manage_test() {
    let remote = FakeRemote::new();
    let engine = engine(&remote);
    let load = remote.insert_load(SHIPPER);
    let mut ctx = carrier_session(20, Some(CarrierRole::OwnerOperator));

    assert_eq!(assert_ok!(engine.list_loads(&mut ctx).await).len(), 1);
    assert_eq!(assert_ok!(engine.find_load(&mut ctx, load.id).await), load);

    let err = engine.delete_load(&mut ctx, load.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = engine
        .change_load_status(&mut ctx, load.id, LoadStatus::Closed)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn owner_deletes_load_test() {
    let remote = FakeRemote::new();
    let engine = engine(&remote);
    let load = remote.insert_load(SHIPPER);
    let mut ctx = shipper_session(SHIPPER, Some(ShipperRole::Government));

    assert_ok!(engine.delete_load(&mut ctx, load.id).await);

    let err = engine.find_load(&mut ctx, load.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
