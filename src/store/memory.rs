//! In-process store used by tests and `--in-memory` runs.
//!
//! Mirrors the PostgreSQL constraints: ONG ids are unique and an incident must
//! reference an existing ONG. Incident ids are assigned sequentially from 1.

use super::{Incident, IncidentStore, IncidentWithOng, NewIncident, Ong, OngStore, Store, StoreError};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    ongs: Vec<Ong>,
    incidents: Vec<Incident>,
    last_incident_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OngStore for MemoryStore {
    async fn create_ong(&self, ong: &Ong) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.ongs.iter().any(|existing| existing.id == ong.id) {
            return Err(StoreError::Constraint(format!(
                "duplicate key value violates unique constraint \"ongs_pkey\": {}",
                ong.id
            )));
        }
        tables.ongs.push(ong.clone());
        Ok(())
    }

    async fn list_ongs(&self) -> Result<Vec<Ong>, StoreError> {
        let mut ongs = self.tables.read().await.ongs.clone();
        ongs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(ongs)
    }

    async fn find_ong(&self, id: &str) -> Result<Option<Ong>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .ongs
            .iter()
            .find(|ong| ong.id == id)
            .cloned())
    }
}

#[async_trait]
impl IncidentStore for MemoryStore {
    async fn create_incident(&self, incident: &NewIncident) -> Result<i64, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.ongs.iter().any(|ong| ong.id == incident.ong_id) {
            return Err(StoreError::Constraint(
                "insert on table \"incidents\" violates foreign key constraint \"incidents_ong_id_fkey\""
                    .to_string(),
            ));
        }

        tables.last_incident_id += 1;
        let id = tables.last_incident_id;
        tables.incidents.push(Incident {
            id,
            title: incident.title.clone(),
            description: incident.description.clone(),
            value: incident.value,
            ong_id: incident.ong_id.clone(),
        });

        Ok(id)
    }

    async fn list_incidents(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IncidentWithOng>, StoreError> {
        let tables = self.tables.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        let offset = usize::try_from(offset).unwrap_or(0);

        Ok(tables
            .incidents
            .iter()
            .rev()
            .filter_map(|incident| {
                tables
                    .ongs
                    .iter()
                    .find(|ong| ong.id == incident.ong_id)
                    .map(|ong| IncidentWithOng::new(incident.clone(), ong))
            })
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count_incidents(&self) -> Result<i64, StoreError> {
        let count = self.tables.read().await.incidents.len();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn list_incidents_by_ong(&self, ong_id: &str) -> Result<Vec<Incident>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .incidents
            .iter()
            .rev()
            .filter(|incident| incident.ong_id == ong_id)
            .cloned()
            .collect())
    }

    async fn find_incident(&self, id: i64) -> Result<Option<Incident>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .incidents
            .iter()
            .find(|incident| incident.id == id)
            .cloned())
    }

    async fn delete_incident(&self, id: i64) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .incidents
            .retain(|incident| incident.id != id);
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
