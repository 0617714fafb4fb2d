use super::Engine;

use async_trait::async_trait;

use crate::{
    api::LoadAPI,
    auth::{require_complete, Platform, SessionContext},
    entities::{Load, LoadDraft, LoadStatus, NewLoad, UserType},
    error::Error,
};

#[async_trait]
impl LoadAPI for Engine {
    #[tracing::instrument(skip(self, ctx))]
    async fn list_loads(&self, ctx: &mut SessionContext) -> Result<Vec<Load>, Error> {
        let (profile, actor) = self.acting_profile(ctx).await?;

        self.authorize(actor, "browse_loads", Platform::load_board())?;

        self.remote.list_loads(&profile.token).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn find_load(&self, ctx: &mut SessionContext, id: i64) -> Result<Load, Error> {
        let (profile, actor) = self.acting_profile(ctx).await?;

        let load = self.remote.find_load(&profile.token, id).await?;

        self.authorize(actor, "read", load.clone())?;

        Ok(load)
    }

    #[tracing::instrument(skip(self, ctx, draft))]
    async fn create_load(&self, ctx: &mut SessionContext, draft: LoadDraft) -> Result<Load, Error> {
        let (profile, actor) = self.acting_profile(ctx).await?;

        self.authorize(actor, "post_load", Platform::load_board())?;
        require_complete(&profile, UserType::Shipper)?;
        draft.validate()?;

        let new_load = NewLoad::new(draft, profile.snapshot());
        let load = self.remote.create_load(&profile.token, &new_load).await?;

        tracing::info!(load_id = load.id, "load posted");

        Ok(load)
    }

    #[tracing::instrument(skip(self, ctx, draft))]
    async fn update_load(
        &self,
        ctx: &mut SessionContext,
        id: i64,
        draft: LoadDraft,
    ) -> Result<Load, Error> {
        draft.validate()?;

        let (profile, actor) = self.acting_profile(ctx).await?;

        let mut load = self.remote.find_load(&profile.token, id).await?;

        self.authorize(actor, "edit", load.clone())?;

        load.apply(draft)?;
        self.remote.update_load(&profile.token, &load).await?;

        Ok(load)
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn change_load_status(
        &self,
        ctx: &mut SessionContext,
        id: i64,
        status: LoadStatus,
    ) -> Result<Load, Error> {
        let (profile, actor) = self.acting_profile(ctx).await?;

        let mut load = self.remote.find_load(&profile.token, id).await?;

        self.authorize(actor, "change_status", load.clone())?;

        load.transition(status)?;
        self.remote.update_load(&profile.token, &load).await?;

        Ok(load)
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn delete_load(&self, ctx: &mut SessionContext, id: i64) -> Result<(), Error> {
        let (profile, actor) = self.acting_profile(ctx).await?;

        let load = self.remote.find_load(&profile.token, id).await?;

        self.authorize(actor, "delete", load)?;

        self.remote.delete_load(&profile.token, id).await
    }
}
