//! Incident listing, creation and deletion.
//!
//! Listing is public and paginated. Creation and deletion identify the caller
//! by the ONG id in the `Authorization` header. Deletion loads the incident,
//! compares its owner with the caller and only then deletes, so a foreign
//! caller gets `403` and a missing incident `404`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{debug, info, instrument, warn};

use super::{
    types::{CreateIncidentRequest, CreatedIncident, PageQuery},
    PAGE_SIZE, X_TOTAL_COUNT,
};
use crate::{
    api::{error::ApiError, validation},
    store::{DynStore, IncidentWithOng, NewIncident},
};

#[utoipa::path(
    get,
    path = "/incidents",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of incidents, newest first.", body = [IncidentWithOng],
            headers(("X-Total-Count" = i64, description = "Total number of incidents"))),
        (status = 400, description = "Invalid page.", body = crate::api::error::ErrorBody),
    ),
    tag = "incidents"
)]
/// Lists five incidents per page joined with their ONG's contact fields.
#[instrument(skip(store, query))]
pub async fn list_incidents(
    Extension(store): Extension<DynStore>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let query = validation::query(query)?;
    let page = validation::page(query.page.as_deref())?;
    let offset = (page - 1).saturating_mul(PAGE_SIZE);

    let total = store.count_incidents().await?;
    let incidents = store.list_incidents(PAGE_SIZE, offset).await?;

    debug!(page, total, returned = incidents.len(), "listed incidents");

    Ok(([(X_TOTAL_COUNT, total.to_string())], Json(incidents)))
}

#[utoipa::path(
    post,
    path = "/incidents",
    params(("Authorization" = String, Header, description = "ONG id")),
    request_body = CreateIncidentRequest,
    responses(
        (status = 201, description = "Incident created.", body = CreatedIncident),
        (status = 400, description = "Invalid input or missing Authorization header.", body = crate::api::error::ErrorBody),
        (status = 401, description = "No ONG found with this ID.", body = crate::api::error::ErrorBody),
    ),
    tag = "incidents"
)]
/// Creates an incident owned by the calling ONG.
#[instrument(skip(store, headers, payload))]
pub async fn create_incident(
    Extension(store): Extension<DynStore>,
    headers: HeaderMap,
    payload: Result<Json<CreateIncidentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedIncident>), ApiError> {
    let ong_id = validation::authorization(&headers)?;
    let fields = validation::incident(&validation::body(payload)?)?;

    // The foreign key would catch this too, but as an opaque storage error.
    if store.find_ong(&ong_id).await?.is_none() {
        debug!("incident rejected: unknown ONG id");
        return Err(ApiError::Unauthorized("No ONG found with this ID"));
    }

    let id = store
        .create_incident(&NewIncident {
            title: fields.title,
            description: fields.description,
            value: fields.value,
            ong_id,
        })
        .await?;

    info!(incident_id = id, "incident created");

    Ok((StatusCode::CREATED, Json(CreatedIncident { id })))
}

#[utoipa::path(
    delete,
    path = "/incidents/{id}",
    params(
        ("id" = i64, Path, description = "Incident id"),
        ("Authorization" = String, Header, description = "ONG id"),
    ),
    responses(
        (status = 204, description = "Incident deleted."),
        (status = 400, description = "Invalid id or missing Authorization header.", body = crate::api::error::ErrorBody),
        (status = 403, description = "The incident belongs to another ONG.", body = crate::api::error::ErrorBody),
        (status = 404, description = "Incident not found.", body = crate::api::error::ErrorBody),
    ),
    tag = "incidents"
)]
/// Deletes an incident after checking that the caller owns it.
#[instrument(skip(store, headers))]
pub async fn delete_incident(
    Extension(store): Extension<DynStore>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let id = validation::incident_id(&id)?;
    let ong_id = validation::authorization(&headers)?;

    let Some(incident) = store.find_incident(id).await? else {
        return Err(ApiError::NotFound("Incident not found."));
    };

    if incident.ong_id != ong_id {
        warn!(incident_id = id, "delete rejected: caller does not own incident");
        return Err(ApiError::Forbidden("Operation not permitted."));
    }

    store.delete_incident(id).await?;

    info!(incident_id = id, "incident deleted");

    Ok(StatusCode::NO_CONTENT)
}
