use axum::{extract::Extension, http::HeaderMap, Json};
use tracing::instrument;

use crate::{
    api::{error::ApiError, validation},
    store::{DynStore, Incident},
};

#[utoipa::path(
    get,
    path = "/profile",
    params(("Authorization" = String, Header, description = "ONG id")),
    responses(
        (status = 200, description = "Incidents owned by the caller, newest first.", body = [Incident]),
        (status = 400, description = "Missing Authorization header.", body = crate::api::error::ErrorBody),
    ),
    tag = "profile"
)]
/// Lists the caller's own incidents. An unknown id simply owns nothing.
#[instrument(skip(store, headers))]
pub async fn profile(
    Extension(store): Extension<DynStore>,
    headers: HeaderMap,
) -> Result<Json<Vec<Incident>>, ApiError> {
    let ong_id = validation::authorization(&headers)?;

    Ok(Json(store.list_incidents_by_ong(&ong_id).await?))
}
