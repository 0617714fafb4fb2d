mod bid_api;
mod load_api;
mod reconcile;
mod session_api;

use std::sync::Arc;

use oso::Oso;

use crate::{
    api::API,
    auth::{authorizor, SessionContext, User},
    entities::UserProfile,
    error::{forbidden_error, Error},
    external::Remote,
};

pub use reconcile::{plan, BidWrite};

pub type DynRemote = Arc<dyn Remote>;

pub struct Engine {
    remote: DynRemote,
    authorizor: Oso,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(remote: DynRemote) -> Result<Self, Error> {
        Ok(Self {
            remote,
            authorizor: authorizor::new()?,
        })
    }
}

impl Engine {
    pub fn authorize<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<(), Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        if self.authorizor.is_allowed(actor, action, resource)? {
            return Ok(());
        }

        Err(forbidden_error())
    }

    /// Profile of the acting user. A session with no profile yet is hydrated
    /// for the account's home dashboard, judged from the remote user type
    /// and the login roles.
    async fn acting_profile(&self, ctx: &mut SessionContext) -> Result<(UserProfile, User), Error> {
        if let Some(profile) = &ctx.profile {
            return Ok((profile.clone(), User::from(profile)));
        }

        let (record, capabilities) = self.fetch_record(ctx).await?;
        let home = capabilities.home().ok_or_else(forbidden_error)?;

        let profile = session_api::apply_record(ctx, record, home);
        let actor = User::from(&profile);

        Ok((profile, actor))
    }
}

impl API for Engine {}
