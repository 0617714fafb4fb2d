use std::net::SocketAddr;

use axum::{
    extract::{Json, Path},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tokio_test::assert_ok;

use loadboard::entities::{Bid, BidAmount, BidStatus, NewBid};
use loadboard::error::ErrorKind;
use loadboard::external::load_board::LoadBoardClient;
use loadboard::external::{AuthRemote, BidRemote, LoadRemote, UserRemote};

const TOKEN: &str = "tok";

fn bid_json(id: i64, load_id: i64, carrier_id: i64) -> Value {
    json!({
        "id": id,
        "loadId": load_id,
        "carrierId": carrier_id,
        "bidAmount": 1500.0,
        "bidStatus": 0,
        "biddingTime": "2026-10-01T12:00:00Z",
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != "secret" {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(json!({
        "id": 5,
        "token": TOKEN,
        "email": body["email"],
        "name": "Sam",
        "roles": ["carrier"],
    }))
    .into_response()
}

async fn find_user(Path(_id): Path<i64>) -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn find_load(Path(id): Path<i64>) -> Response {
    match id {
        404 => StatusCode::NOT_FOUND.into_response(),
        502 => StatusCode::BAD_GATEWAY.into_response(),
        _ => "not json".into_response(),
    }
}

async fn create_bid(headers: HeaderMap, Json(mut body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if body["bidAmount"] == json!(0.0) {
        return StatusCode::BAD_REQUEST.into_response();
    }

    body["id"] = json!(41);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn find_bid(Path((load_id, carrier_id)): Path<(i64, i64)>) -> Response {
    match load_id {
        1 => Json(bid_json(9, load_id, carrier_id)).into_response(),
        2 => StatusCode::NOT_FOUND.into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn update_bid(headers: HeaderMap, Path(id): Path<i64>, Json(_): Json<Value>) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }

    match id {
        404 => StatusCode::NOT_FOUND,
        _ => StatusCode::NO_CONTENT,
    }
}

/// Starts a stand-in for the remote store on an ephemeral port.
fn spawn_store() -> LoadBoardClient {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/users/:id", get(find_user))
        .route("/loads/:id", get(find_load))
        .route("/bids/", post(create_bid))
        .route("/bids/:id", put(update_bid))
        .route("/bids/:id/:carrier_id", get(find_bid));

    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let server = axum::Server::bind(&addr).serve(app.into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);

    LoadBoardClient::new(format!("http://{}/", addr))
}

fn stored_bid(id: i64) -> Bid {
    Bid {
        id,
        load_id: 1,
        carrier_id: 20,
        bid_amount: 1600.0,
        bid_status: BidStatus::Pending,
        bidding_time: Utc::now(),
        updated_by: Some(20),
        updated_at: Some(Utc::now()),
    }
}

#[tokio::test]
async fn find_bid_test() {
    let client = spawn_store();

    let bid = assert_ok!(client.find_bid(TOKEN, 1, 20).await).unwrap();
    assert_eq!(bid.id, 9);
    assert_eq!(bid.carrier_id, 20);
    assert_eq!(bid.bid_status, BidStatus::Pending);
    assert_eq!(bid.updated_by, None);

    let missing = assert_ok!(client.find_bid(TOKEN, 2, 20).await);
    assert!(missing.is_none());

    let err = client.find_bid(TOKEN, 3, 20).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServerError);
    assert_eq!(err.message, "Internal server error");
}

#[tokio::test]
async fn create_bid_test() {
    let client = spawn_store();
    let now = Utc::now();
    let new_bid = NewBid::new(1, 20, BidAmount::new(1500.0).unwrap(), now);

    let created = assert_ok!(client.create_bid(TOKEN, &new_bid).await);
    assert_eq!(created.id, 41);
    assert_eq!(created.bid_amount, 1500.0);
    assert_eq!(created.bidding_time, now);

    let err = client.create_bid("stale", &new_bid).await.unwrap_err();
    assert!(err.is_unauthorized());

    let zero = NewBid::new(1, 20, BidAmount::new(0.0).unwrap(), now);
    let err = client.create_bid(TOKEN, &zero).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
}

#[tokio::test]
async fn update_bid_test() {
    let client = spawn_store();

    assert_ok!(client.update_bid(TOKEN, &stored_bid(9)).await);

    let err = client.update_bid(TOKEN, &stored_bid(404)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "Bid not found");
}

#[tokio::test]
async fn login_test() {
    let client = spawn_store();

    let identity = assert_ok!(client.login("sam@example.com", "secret").await);
    assert_eq!(identity.id, 5);
    assert_eq!(identity.token, TOKEN);
    assert_eq!(identity.email, "sam@example.com");

    let err = client.login("sam@example.com", "nope").await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn missing_user_is_none_test() {
    let client = spawn_store();

    let record = assert_ok!(client.find_user(TOKEN, 5).await);
    assert!(record.is_none());
}

#[tokio::test]
async fn load_errors_test() {
    let client = spawn_store();

    let err = client.find_load(TOKEN, 404).await.unwrap_err();
    assert_eq!(err.message, "Load not found");

    let err = client.find_load(TOKEN, 502).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServerDown);
    assert_eq!(err.message, "Server is down");

    let err = client.find_load(TOKEN, 1).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Upstream);
}

#[tokio::test]
async fn unreachable_store_is_down_test() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = LoadBoardClient::new(format!("http://{}", addr));

    let err = client.find_bid(TOKEN, 1, 20).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServerDown);
}
