use async_graphql::{ErrorExtensions, Pos, http::GraphiQLSource};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension,
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
};

use crate::{middleware::auth::RequestContext, schema::AppSchema, state::AppState};

/// Resolve the caller once, then run the operation with it attached.
pub async fn graphql_handler(
    State(state): State<AppState>,
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let context = match RequestContext::from_headers(&state, &headers).await {
        Ok(context) => context,
        Err(err) => {
            let error = err.extend().into_server_error(Pos::default());
            return async_graphql::Response::from_errors(vec![error]).into();
        }
    };
    schema.execute(request.into_inner().data(context)).await.into()
}

pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
