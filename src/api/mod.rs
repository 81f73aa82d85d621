use crate::ports::database::{DatabasePort, Error};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod members;
pub mod products;

/// Shared handler state.
///
/// Holds only the database port; requests carry no session state of their own.
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<dyn DatabasePort + Send + Sync>,
}

/// The `/database` HTTP surface over the given store.
pub fn router(database: Arc<dyn DatabasePort + Send + Sync>) -> Router {
    Router::new()
        .route("/database/addMember", post(members::add_member))
        .route("/database/givePoints/{id}/{points}", post(members::give_points))
        .route(
            "/database/withdrawPoints/{id}/{points}",
            post(members::withdraw_points),
        )
        .route("/database/getMember/{id}", get(members::get_member))
        .route(
            "/database/getMemberByPhone/{phone}",
            get(members::get_member_by_phone),
        )
        .route("/database/getItem/{id}", get(products::get_item))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { database })
}

/// Store failure during a lookup.
///
/// Lookups answer `null` for absent rows, so a store failure is the one case
/// that surfaces as an error status instead of a body.
pub struct LookupFailure(Error);

impl From<Error> for LookupFailure {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for LookupFailure {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "lookup failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not complete lookup due to an unknown error.",
        )
            .into_response()
    }
}
