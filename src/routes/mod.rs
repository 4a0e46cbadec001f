use axum::{Extension, Router, routing::get};

use crate::{schema::AppSchema, state::AppState};

pub mod graphql;
pub mod health;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router(schema: AppSchema) -> Router<AppState> {
    Router::new()
        .route(
            "/graphql",
            get(graphql::graphiql).post(graphql::graphql_handler),
        )
        .layer(Extension(schema))
}
