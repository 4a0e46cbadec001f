//! GraphQL surface: queries and mutations over the services.

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema};

use crate::{
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, RequestContext},
    state::AppState,
};

pub mod mutation;
pub mod query;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

fn app_state<'a>(ctx: &Context<'a>) -> AppResult<&'a AppState> {
    ctx.data::<AppState>()
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err.message)))
}

/// The owner resolved for this request, if any.
fn caller<'a>(ctx: &Context<'a>) -> Option<&'a AuthUser> {
    ctx.data_opt::<RequestContext>()
        .and_then(|request| request.user.as_ref())
}

fn require_caller<'a>(ctx: &Context<'a>) -> AppResult<&'a AuthUser> {
    ctx.data_opt::<RequestContext>()
        .ok_or(AppError::Unauthorized)?
        .require_user()
}

/// A failed batch item resolves to null, with its error reported at that index.
fn batch_items<T>(items: Vec<AppResult<T>>) -> Vec<Option<async_graphql::Result<T>>> {
    items
        .into_iter()
        .map(|item| Some(item.map_err(|e| e.extend())))
        .collect()
}
