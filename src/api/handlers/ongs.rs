//! ONG registration and listing.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::types::{CreateOngRequest, CreatedOng};
use crate::{
    api::{error::ApiError, validation},
    store::{DynStore, Ong},
    unique_id::generate_unique_id,
};

#[utoipa::path(
    get,
    path = "/ongs",
    responses(
        (status = 200, description = "Every registered ONG.", body = [Ong]),
    ),
    tag = "ongs"
)]
/// Lists every registered ONG ordered by name.
#[instrument(skip(store))]
pub async fn list_ongs(Extension(store): Extension<DynStore>) -> Result<Json<Vec<Ong>>, ApiError> {
    Ok(Json(store.list_ongs().await?))
}

#[utoipa::path(
    post,
    path = "/ongs",
    request_body = CreateOngRequest,
    responses(
        (status = 201, description = "ONG registered; the id is its credential.", body = CreatedOng),
        (status = 400, description = "Invalid input.", body = crate::api::error::ErrorBody),
    ),
    tag = "ongs"
)]
/// Registers an ONG under a freshly generated 8 character id.
/// No duplicate name/email check is made; an id collision is a storage error
/// and is not retried.
#[instrument(skip(store, payload))]
pub async fn create_ong(
    Extension(store): Extension<DynStore>,
    payload: Result<Json<CreateOngRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedOng>), ApiError> {
    let fields = validation::ong(&validation::body(payload)?)?;

    let ong = Ong {
        id: generate_unique_id(),
        name: fields.name,
        email: fields.email,
        whatsapp: fields.whatsapp,
        city: fields.city,
        uf: fields.uf,
    };

    store.create_ong(&ong).await?;

    info!(city = %ong.city, uf = %ong.uf, "ONG registered");

    Ok((StatusCode::CREATED, Json(CreatedOng { id: ong.id })))
}
