mod handlers;
pub mod session;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::api::API;
use crate::config::Config;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{bids, dashboard, loads, sessions};
use crate::server::session::SessionStore;

pub type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: T, store: SessionStore) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/login", post(sessions::login))
        .route("/logout", post(sessions::logout))
        .route("/dashboard/carrier", get(dashboard::carrier))
        .route("/dashboard/shipper", get(dashboard::shipper))
        .route("/profile/complete", post(dashboard::complete_profile))
        .route("/loads", get(loads::list).post(loads::create))
        .route(
            "/loads/:id",
            get(loads::find).put(loads::update).delete(loads::delete),
        )
        .route("/loads/:id/status", patch(loads::change_status))
        .route("/loads/:id/bids", get(bids::list_for_load))
        .route(
            "/loads/:id/bid",
            get(bids::find_own).post(bids::place).delete(bids::withdraw),
        )
        .route("/loads/:id/bids/:bid_id/accept", patch(bids::accept))
        .route("/loads/:id/bids/:bid_id/reject", patch(bids::reject))
        .route("/bids", get(bids::list_own))
        .layer(Extension(api))
        .layer(Extension(store))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, config: &Config) -> Result<(), Error> {
    let app = router(api, SessionStore::new(config.session_ttl));
    let addr = config.bind_addr;

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server stopped: {}", err);
            unexpected_error()
        })
}
