use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use axum::extract::{Extension, FromRequest, RequestParts, TypedHeader};
use axum::headers::Cookie;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::SessionContext;
use crate::error::{unauthorized_error, unexpected_error, Error};

pub const SESSION_COOKIE: &str = "sid";

/// In-process session store. Sessions are written back whole, so two
/// concurrent requests on one session resolve as last write wins. A session
/// idle for longer than `ttl` is gone: loading it fails and every save
/// prunes such entries.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn expired(&self, ctx: &SessionContext, now: DateTime<Utc>) -> bool {
        now - ctx.last_seen > self.ttl
    }

    /// Returns a live session and marks it as seen now.
    pub async fn load(&self, id: Uuid) -> Option<SessionContext> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let expired = self.expired(sessions.get(&id)?, now);
        if expired {
            tracing::info!(session_id = %id, "session expired");
            sessions.remove(&id);
            return None;
        }

        let ctx = sessions.get_mut(&id)?;
        ctx.last_seen = now;

        Some(ctx.clone())
    }

    pub async fn save(&self, ctx: SessionContext) {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        sessions.retain(|_, stored| !self.expired(stored, now));
        sessions.insert(ctx.id, ctx);
    }

    pub async fn remove(&self, id: Uuid) {
        self.sessions.write().await.remove(&id);
    }
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, id)
}

/// Session of the current request, resolved from the `sid` cookie.
pub struct CurrentSession {
    pub ctx: SessionContext,
    store: SessionStore,
    loaded_version: u64,
}

impl CurrentSession {
    /// Ends the request: a 401 from the remote service tears the session
    /// down, otherwise a changed session is written back.
    pub async fn finish<T>(self, result: Result<T, Error>) -> Result<T, Error> {
        match &result {
            Err(err) if err.is_unauthorized() => {
                tracing::warn!(session_id = %self.ctx.id, "remote rejected token, ending session");
                self.store.remove(self.ctx.id).await;
            }
            _ => {
                if self.ctx.version != self.loaded_version {
                    self.store.save(self.ctx).await;
                }
            }
        }

        result
    }

    pub async fn end(self) {
        self.store.remove(self.ctx.id).await;
    }
}

#[async_trait]
impl<B> FromRequest<B> for CurrentSession
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(store) = Extension::<SessionStore>::from_request(req)
            .await
            .map_err(|_| unexpected_error())?;

        let TypedHeader(cookie) = TypedHeader::<Cookie>::from_request(req)
            .await
            .map_err(|_| unauthorized_error())?;

        let id = cookie
            .get(SESSION_COOKIE)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(unauthorized_error)?;

        let ctx = store.load(id).await.ok_or_else(unauthorized_error)?;
        let loaded_version = ctx.version;

        Ok(Self {
            ctx,
            store,
            loaded_version,
        })
    }
}

#[cfg(test)]
fn context() -> SessionContext {
    SessionContext::new(crate::entities::AuthIdentity {
        id: 1,
        token: "t".into(),
        email: "a@b.test".into(),
        name: "A".into(),
        roles: vec!["carrier".into()],
    })
}

#[tokio::test]
async fn finish_tears_down_on_unauthorized_test() {
    let store = SessionStore::new(Duration::hours(1));
    let ctx = context();
    let id = ctx.id;
    store.save(ctx.clone()).await;

    let session = CurrentSession {
        ctx,
        store: store.clone(),
        loaded_version: 1,
    };
    let result: Result<(), Error> = session.finish(Err(unauthorized_error())).await;

    assert!(result.is_err());
    assert!(store.load(id).await.is_none());
}

#[tokio::test]
async fn finish_writes_back_changed_session_test() {
    use crate::entities::{BusinessProfile, UserType};

    let store = SessionStore::new(Duration::hours(1));
    let mut ctx = context();
    let id = ctx.id;
    store.save(ctx.clone()).await;

    ctx.hydrate(BusinessProfile::blank(UserType::Carrier), false);

    let session = CurrentSession {
        ctx,
        store: store.clone(),
        loaded_version: 1,
    };
    tokio_test::assert_ok!(session.finish(Ok::<_, Error>(())).await);

    let stored = store.load(id).await.unwrap();
    assert_eq!(stored.version, 2);
    assert!(stored.profile.is_some());
}

#[tokio::test]
async fn idle_session_expires_test() {
    let store = SessionStore::new(Duration::minutes(30));

    let mut stale = context();
    stale.last_seen = Utc::now() - Duration::hours(1);
    let stale_id = stale.id;
    store.save(stale).await;

    assert!(store.load(stale_id).await.is_none());
    assert!(store.sessions.read().await.is_empty());

    let fresh = context();
    let fresh_id = fresh.id;
    store.save(fresh).await;

    let loaded = store.load(fresh_id).await.unwrap();
    assert!(Utc::now() - loaded.last_seen < Duration::minutes(1));
}

#[tokio::test]
async fn save_prunes_expired_sessions_test() {
    let store = SessionStore::new(Duration::minutes(30));

    for _ in 0..3 {
        let mut stale = context();
        stale.last_seen = Utc::now() - Duration::hours(2);
        store.sessions.write().await.insert(stale.id, stale);
    }

    let fresh = context();
    let fresh_id = fresh.id;
    store.save(fresh).await;

    let sessions = store.sessions.read().await;
    assert_eq!(sessions.len(), 1);
    assert!(sessions.contains_key(&fresh_id));
}
