//! Session creation.
//!
//! Sessions are stateless: the ONG id is the credential and is re-sent on
//! every authorized request. Creating a session only confirms the id exists.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use tracing::{debug, instrument};

use super::types::{CreateSessionRequest, SessionResponse};
use crate::{
    api::{error::ApiError, validation},
    store::DynStore,
};

#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "The id belongs to a registered ONG.", body = SessionResponse),
        (status = 400, description = "Missing id.", body = crate::api::error::ErrorBody),
        (status = 401, description = "No ONG found with this ID.", body = crate::api::error::ErrorBody),
    ),
    tag = "sessions"
)]
/// Confirms that the submitted id names an ONG and returns its id and name.
#[instrument(skip(store, payload))]
pub async fn create_session(
    Extension(store): Extension<DynStore>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let id = validation::session(&validation::body(payload)?)?;

    let Some(ong) = store.find_ong(&id).await? else {
        debug!("session rejected: unknown ONG id");
        return Err(ApiError::Unauthorized("No ONG found with this ID"));
    };

    Ok(Json(SessionResponse {
        id: ong.id,
        name: ong.name,
    }))
}
