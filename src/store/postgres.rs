//! PostgreSQL store backed by a `sqlx` pool.
//!
//! The DDL lives in `sql/schema.sql`. Constraint violations (duplicate ONG id,
//! incident pointing at an unknown ONG) are reported as
//! `StoreError::Constraint`, everything else as `StoreError::Database`.

use super::{Incident, IncidentStore, IncidentWithOng, NewIncident, Ong, OngStore, Store, StoreError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Connection, PgPool};
use std::time::Duration;
use tracing::{instrument, Instrument, info_span};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a bounded pool to `dsn`.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable.
    pub async fn connect(dsn: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(max_connections)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        Ok(Self::new(pool))
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps SQLSTATE integrity errors to `StoreError::Constraint`.
fn map_db_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err
            .code()
            .is_some_and(|code| code == UNIQUE_VIOLATION || code == FOREIGN_KEY_VIOLATION)
        {
            return StoreError::Constraint(db_err.message().to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl OngStore for PgStore {
    #[instrument(skip(self, ong), fields(ong_id = %ong.id))]
    async fn create_ong(&self, ong: &Ong) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO ongs (id, name, email, whatsapp, city, uf)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&ong.id)
        .bind(&ong.name)
        .bind(&ong.email)
        .bind(&ong.whatsapp)
        .bind(&ong.city)
        .bind(&ong.uf)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_ongs(&self) -> Result<Vec<Ong>, StoreError> {
        sqlx::query_as::<_, Ong>(
            r"
            SELECT id, name, email, whatsapp, city, uf
            FROM ongs
            ORDER BY name, id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, id))]
    async fn find_ong(&self, id: &str) -> Result<Option<Ong>, StoreError> {
        sqlx::query_as::<_, Ong>(
            r"
            SELECT id, name, email, whatsapp, city, uf
            FROM ongs
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl IncidentStore for PgStore {
    #[instrument(skip(self, incident), fields(ong_id = %incident.ong_id))]
    async fn create_incident(&self, incident: &NewIncident) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO incidents (title, description, value, ong_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(&incident.title)
        .bind(&incident.description)
        .bind(incident.value)
        .bind(&incident.ong_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list_incidents(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IncidentWithOng>, StoreError> {
        sqlx::query_as::<_, IncidentWithOng>(
            r"
            SELECT incidents.id, incidents.title, incidents.description, incidents.value,
                incidents.ong_id, ongs.name, ongs.email, ongs.whatsapp, ongs.city, ongs.uf
            FROM incidents
            JOIN ongs ON ongs.id = incidents.ong_id
            ORDER BY incidents.id DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_incidents(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM incidents")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, ong_id))]
    async fn list_incidents_by_ong(&self, ong_id: &str) -> Result<Vec<Incident>, StoreError> {
        sqlx::query_as::<_, Incident>(
            r"
            SELECT id, title, description, value, ong_id
            FROM incidents
            WHERE ong_id = $1
            ORDER BY id DESC
            ",
        )
        .bind(ong_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_incident(&self, id: i64) -> Result<Option<Incident>, StoreError> {
        sqlx::query_as::<_, Incident>(
            r"
            SELECT id, title, description, value, ong_id
            FROM incidents
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn delete_incident(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM incidents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .map_err(StoreError::Database)?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .map_err(StoreError::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::{borrow::Cow, error::Error as StdError, fmt};

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    #[test]
    fn integrity_errors_map_to_constraint() {
        for code in [UNIQUE_VIOLATION, FOREIGN_KEY_VIOLATION] {
            let err = sqlx::Error::Database(Box::new(TestDbError { code: Some(code) }));
            assert!(matches!(map_db_error(err), StoreError::Constraint(_)));
        }
    }

    #[test]
    fn other_errors_stay_database_errors() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("99999"),
        }));
        assert!(matches!(map_db_error(err), StoreError::Database(_)));

        assert!(matches!(
            map_db_error(sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
    }
}
