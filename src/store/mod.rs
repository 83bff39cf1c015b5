//! Persistence seams for ONGs and incidents.
//!
//! Handlers only see the `OngStore` and `IncidentStore` traits. The server
//! builds one `Store` at startup (PostgreSQL or in-memory) and injects it as an
//! axum `Extension`, so tests get an isolated store per run.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// A registered organization. `id` is also its bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Ong {
    pub id: String,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub city: String,
    pub uf: String,
}

/// Incident as stored, without the owner join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Incident {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub value: f64,
    pub ong_id: String,
}

/// Incident row joined with the public contact fields of its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct IncidentWithOng {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub value: f64,
    pub ong_id: String,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub city: String,
    pub uf: String,
}

impl IncidentWithOng {
    #[must_use]
    pub fn new(incident: Incident, ong: &Ong) -> Self {
        Self {
            id: incident.id,
            title: incident.title,
            description: incident.description,
            value: incident.value,
            ong_id: incident.ong_id,
            name: ong.name.clone(),
            email: ong.email.clone(),
            whatsapp: ong.whatsapp.clone(),
            city: ong.city.clone(),
            uf: ong.uf.clone(),
        }
    }
}

/// Validated input for a new incident; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
    pub title: String,
    pub description: String,
    pub value: f64,
    pub ong_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Primary-key or foreign-key violation.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

#[async_trait]
pub trait OngStore: Send + Sync {
    /// Inserts a new ONG. A duplicate id is a `StoreError::Constraint`.
    async fn create_ong(&self, ong: &Ong) -> Result<(), StoreError>;

    async fn list_ongs(&self) -> Result<Vec<Ong>, StoreError>;

    async fn find_ong(&self, id: &str) -> Result<Option<Ong>, StoreError>;
}

#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Inserts an incident and returns its id. An unknown `ong_id` is a
    /// `StoreError::Constraint`.
    async fn create_incident(&self, incident: &NewIncident) -> Result<i64, StoreError>;

    /// Newest first, joined with the owning ONG.
    async fn list_incidents(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IncidentWithOng>, StoreError>;

    async fn count_incidents(&self) -> Result<i64, StoreError>;

    /// Newest first, only incidents owned by `ong_id`.
    async fn list_incidents_by_ong(&self, ong_id: &str) -> Result<Vec<Incident>, StoreError>;

    async fn find_incident(&self, id: i64) -> Result<Option<Incident>, StoreError>;

    async fn delete_incident(&self, id: i64) -> Result<(), StoreError>;
}

/// Everything the API needs from persistence.
#[async_trait]
pub trait Store: OngStore + IncidentStore {
    /// Cheap round trip used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}

pub type DynStore = Arc<dyn Store>;
