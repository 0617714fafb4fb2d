use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::json;

use super::{AuthRemote, BidRemote, LoadRemote, UserRemote};
use crate::{
    entities::{AuthIdentity, Bid, Load, NewBid, NewLoad, UserRecord},
    error::{remote_status_error, Error},
};

#[derive(Clone, Debug)]
pub struct LoadBoardClient {
    http: Client,
    api_base: String,
}

impl LoadBoardClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

/// Turns any non-2xx answer into the error taxonomy.
fn ensure_success(res: Response, resource: &str) -> Result<Response, Error> {
    let status_code = res.status();

    if status_code.is_success() {
        return Ok(res);
    }

    tracing::warn!(status = status_code.as_u16(), resource, "remote call rejected");

    Err(remote_status_error(status_code.as_u16(), resource))
}

#[async_trait]
impl AuthRemote for LoadBoardClient {
    #[tracing::instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<AuthIdentity, Error> {
        let res = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let identity = ensure_success(res, "Account")?.json().await?;

        Ok(identity)
    }
}

#[async_trait]
impl UserRemote for LoadBoardClient {
    #[tracing::instrument(skip(self, token))]
    async fn find_user(&self, token: &str, id: i64) -> Result<Option<UserRecord>, Error> {
        let res = self
            .http
            .get(self.url(&format!("/users/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let record = ensure_success(res, "User")?.json().await?;

        Ok(Some(record))
    }

    #[tracing::instrument(skip(self, token, record))]
    async fn create_user(&self, token: &str, record: &UserRecord) -> Result<UserRecord, Error> {
        let res = self
            .http
            .post(self.url("/users/"))
            .bearer_auth(token)
            .json(record)
            .send()
            .await?;

        let created = ensure_success(res, "User")?.json().await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self, token, record))]
    async fn update_user(&self, token: &str, id: i64, record: &UserRecord) -> Result<(), Error> {
        let res = self
            .http
            .put(self.url(&format!("/users/{}", id)))
            .bearer_auth(token)
            .json(record)
            .send()
            .await?;

        ensure_success(res, "User")?;

        Ok(())
    }
}

#[async_trait]
impl LoadRemote for LoadBoardClient {
    #[tracing::instrument(skip(self, token, load))]
    async fn create_load(&self, token: &str, load: &NewLoad) -> Result<Load, Error> {
        let res = self
            .http
            .post(self.url("/loads/"))
            .bearer_auth(token)
            .json(load)
            .send()
            .await?;

        let created = ensure_success(res, "Load")?.json().await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self, token))]
    async fn list_loads(&self, token: &str) -> Result<Vec<Load>, Error> {
        let res = self
            .http
            .get(self.url("/loads/"))
            .bearer_auth(token)
            .send()
            .await?;

        let loads = ensure_success(res, "Load")?.json().await?;

        Ok(loads)
    }

    #[tracing::instrument(skip(self, token))]
    async fn find_load(&self, token: &str, id: i64) -> Result<Load, Error> {
        let res = self
            .http
            .get(self.url(&format!("/loads/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;

        let load = ensure_success(res, "Load")?.json().await?;

        Ok(load)
    }

    #[tracing::instrument(skip(self, token, load), fields(load_id = load.id))]
    async fn update_load(&self, token: &str, load: &Load) -> Result<(), Error> {
        let res = self
            .http
            .put(self.url(&format!("/loads/{}", load.id)))
            .bearer_auth(token)
            .json(load)
            .send()
            .await?;

        ensure_success(res, "Load")?;

        Ok(())
    }

    #[tracing::instrument(skip(self, token))]
    async fn delete_load(&self, token: &str, id: i64) -> Result<(), Error> {
        let res = self
            .http
            .delete(self.url(&format!("/loads/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;

        ensure_success(res, "Load")?;

        Ok(())
    }
}

#[async_trait]
impl BidRemote for LoadBoardClient {
    #[tracing::instrument(skip(self, token, bid), fields(load_id = bid.load_id, carrier_id = bid.carrier_id))]
    async fn create_bid(&self, token: &str, bid: &NewBid) -> Result<Bid, Error> {
        let res = self
            .http
            .post(self.url("/bids/"))
            .bearer_auth(token)
            .json(bid)
            .send()
            .await?;

        let created = ensure_success(res, "Bid")?.json().await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self, token))]
    async fn find_bid(
        &self,
        token: &str,
        load_id: i64,
        carrier_id: i64,
    ) -> Result<Option<Bid>, Error> {
        let res = self
            .http
            .get(self.url(&format!("/bids/{}/{}", load_id, carrier_id)))
            .bearer_auth(token)
            .send()
            .await?;

        if res.status() == StatusCode::NOT_FOUND {
            tracing::info!("no bid yet");
            return Ok(None);
        }

        let bid = ensure_success(res, "Bid")?.json().await?;

        Ok(Some(bid))
    }

    #[tracing::instrument(skip(self, token))]
    async fn list_load_bids(&self, token: &str, load_id: i64) -> Result<Vec<Bid>, Error> {
        let res = self
            .http
            .get(self.url(&format!("/bids/load/{}", load_id)))
            .bearer_auth(token)
            .send()
            .await?;

        let bids = ensure_success(res, "Bid")?.json().await?;

        Ok(bids)
    }

    #[tracing::instrument(skip(self, token))]
    async fn list_carrier_bids(&self, token: &str, carrier_id: i64) -> Result<Vec<Bid>, Error> {
        let res = self
            .http
            .get(self.url(&format!("/bids/carrier/{}", carrier_id)))
            .bearer_auth(token)
            .send()
            .await?;

        let bids = ensure_success(res, "Bid")?.json().await?;

        Ok(bids)
    }

    #[tracing::instrument(skip(self, token, bid), fields(bid_id = bid.id))]
    async fn update_bid(&self, token: &str, bid: &Bid) -> Result<(), Error> {
        let res = self
            .http
            .put(self.url(&format!("/bids/{}", bid.id)))
            .bearer_auth(token)
            .json(bid)
            .send()
            .await?;

        ensure_success(res, "Bid")?;

        Ok(())
    }

    #[tracing::instrument(skip(self, token))]
    async fn delete_bid(&self, token: &str, id: i64) -> Result<(), Error> {
        let res = self
            .http
            .delete(self.url(&format!("/bids/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;

        ensure_success(res, "Bid")?;

        Ok(())
    }
}
