use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{Dashboard, SessionAPI},
    auth::{Capabilities, SessionContext},
    entities::{BusinessProfile, UserProfile, UserRecord, UserType},
    error::{forbidden_error, invalid_input_error, Error},
};

impl Engine {
    /// Fetches the remote user record and the capabilities it grants together
    /// with the login roles.
    #[tracing::instrument(skip(self, ctx), fields(user_id = ctx.identity.id))]
    pub(super) async fn fetch_record(
        &self,
        ctx: &SessionContext,
    ) -> Result<(Option<UserRecord>, Capabilities), Error> {
        let record = self.remote.find_user(ctx.token(), ctx.identity.id).await?;

        let remote_type = record
            .as_ref()
            .and_then(|r| r.user_type.as_deref())
            .and_then(UserType::parse);

        let capabilities = Capabilities::derive(remote_type, &ctx.identity.roles);

        Ok((record, capabilities))
    }
}

/// A record of another user type, or no record at all, yields a blank
/// profile of the `view` type.
pub(super) fn apply_record(
    ctx: &mut SessionContext,
    record: Option<UserRecord>,
    view: UserType,
) -> UserProfile {
    let business = match &record {
        Some(record) => BusinessProfile::from_record(record, view),
        None => {
            tracing::info!("no remote profile yet, using a blank one");
            BusinessProfile::blank(view)
        }
    };

    ctx.hydrate(business, record.is_some()).clone()
}

#[async_trait]
impl SessionAPI for Engine {
    #[tracing::instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<SessionContext, Error> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(invalid_input_error("email and password are required"));
        }

        let identity = self.remote.login(email, password).await?;

        tracing::info!(user_id = identity.id, "logged in");

        Ok(SessionContext::new(identity))
    }

    #[tracing::instrument(skip(self, ctx), fields(user_id = ctx.identity.id))]
    async fn hydrate(&self, ctx: &mut SessionContext, view: UserType) -> Result<Dashboard, Error> {
        let (record, capabilities) = self.fetch_record(ctx).await?;

        capabilities.enter(view)?;

        let profile = apply_record(ctx, record, view);
        let capabilities = Capabilities::of(&profile);

        Ok(Dashboard {
            profile,
            capabilities,
        })
    }

    #[tracing::instrument(skip(self, ctx, business), fields(user_id = ctx.identity.id))]
    async fn complete_profile(
        &self,
        ctx: &mut SessionContext,
        business: BusinessProfile,
    ) -> Result<UserProfile, Error> {
        let (current, _) = self.acting_profile(ctx).await?;
        let user_type = business.user_type();

        if current.user_type() != user_type && !ctx.identity_capabilities().allows(user_type) {
            return Err(forbidden_error());
        }

        if business.company_name().trim().is_empty() {
            return Err(invalid_input_error("company name is required"));
        }

        let record = UserProfile::merge(&ctx.identity, business.clone(), current.persisted)
            .to_record();

        if current.persisted {
            self.remote
                .update_user(ctx.token(), ctx.identity.id, &record)
                .await?;
        } else {
            self.remote.create_user(ctx.token(), &record).await?;
        }

        tracing::info!(user_type = user_type.name(), "business profile saved");

        Ok(ctx.hydrate(business, true).clone())
    }
}
