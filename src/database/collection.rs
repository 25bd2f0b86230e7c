use serde::Serialize;
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::manager::{Database, DatabaseError};

/// Acknowledgment returned by a single-document insert.
///
/// These result shapes are the wire contract: clients receive the store's
/// acknowledgment verbatim, with no response envelope around it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// A schemaless document collection backed by an `(id UUID, doc JSONB)`
/// table. Reads merge the row id into the document as `_id`.
pub struct Collection {
    table: &'static str,
    pool: PgPool,
}

impl Collection {
    pub fn new(table: &'static str, pool: PgPool) -> Self {
        Self { table, pool }
    }

    pub fn users() -> Result<Self, DatabaseError> {
        Ok(Self::new("users", Database::pool()?))
    }

    pub fn classes() -> Result<Self, DatabaseError> {
        Ok(Self::new("classes", Database::pool()?))
    }

    pub fn orders() -> Result<Self, DatabaseError> {
        Ok(Self::new("orders", Database::pool()?))
    }

    pub async fn find_all(&self) -> Result<Vec<Value>, DatabaseError> {
        let sql = format!(
            "SELECT doc || jsonb_build_object('_id', id) AS doc FROM \"{}\"",
            self.table
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| row.try_get::<Value, _>("doc").map_err(DatabaseError::from))
            .collect()
    }

    pub async fn find_eq(&self, field: &str, value: &str) -> Result<Vec<Value>, DatabaseError> {
        let sql = format!(
            "SELECT doc || jsonb_build_object('_id', id) AS doc FROM \"{}\" WHERE doc->>$1 = $2",
            self.table
        );
        let rows = sqlx::query(&sql)
            .bind(field)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row| row.try_get::<Value, _>("doc").map_err(DatabaseError::from))
            .collect()
    }

    pub async fn find_one_eq(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, DatabaseError> {
        let sql = format!(
            "SELECT doc || jsonb_build_object('_id', id) AS doc FROM \"{}\" WHERE doc->>$1 = $2 LIMIT 1",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(field)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.try_get::<Value, _>("doc"))
            .transpose()
            .map_err(DatabaseError::from)
    }

    /// All documents, sorted numerically descending on one field.
    /// Relative order of ties is whatever the store returns.
    pub async fn find_all_sorted_desc(&self, field: &str) -> Result<Vec<Value>, DatabaseError> {
        let sql = format!(
            "SELECT doc || jsonb_build_object('_id', id) AS doc FROM \"{}\" \
             ORDER BY (doc->>$1)::numeric DESC NULLS LAST",
            self.table
        );
        let rows = sqlx::query(&sql).bind(field).fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| row.try_get::<Value, _>("doc").map_err(DatabaseError::from))
            .collect()
    }

    pub async fn insert_one(&self, doc: Value) -> Result<InsertOneResult, DatabaseError> {
        let id = Uuid::new_v4();
        let sql = format!("INSERT INTO \"{}\" (id, doc) VALUES ($1, $2)", self.table);
        sqlx::query(&sql).bind(id).bind(doc).execute(&self.pool).await?;
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    /// Atomic insert-if-absent on a unique field. Returns None when a
    /// document with the same value already exists. Requires the unique
    /// index created in atomic registration mode.
    pub async fn insert_one_unique(
        &self,
        field: &str,
        doc: Value,
    ) -> Result<Option<InsertOneResult>, DatabaseError> {
        let id = Uuid::new_v4();
        let sql = format!(
            "INSERT INTO \"{}\" (id, doc) VALUES ($1, $2) ON CONFLICT ((doc->>'{}')) DO NOTHING",
            self.table, field
        );
        let result = sqlx::query(&sql).bind(id).bind(doc).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            Ok(None)
        } else {
            Ok(Some(InsertOneResult {
                acknowledged: true,
                inserted_id: id,
            }))
        }
    }

    /// Unconditional merge of the given fields into one document.
    /// An unknown id yields zero counts, not an error.
    pub async fn set_fields(&self, id: &str, fields: Value) -> Result<UpdateResult, DatabaseError> {
        let id = Self::parse_id(id)?;
        let sql = format!("UPDATE \"{}\" SET doc = doc || $2 WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(fields)
            .execute(&self.pool)
            .await?;
        let n = result.rows_affected();
        Ok(UpdateResult {
            acknowledged: true,
            matched_count: n,
            modified_count: n,
        })
    }

    /// Delete one document by id. An unknown id yields a zero count.
    pub async fn delete_one(&self, id: &str) -> Result<DeleteResult, DatabaseError> {
        let id = Self::parse_id(id)?;
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", self.table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }

    fn parse_id(id: &str) -> Result<Uuid, DatabaseError> {
        Uuid::parse_str(id).map_err(|_| DatabaseError::InvalidId(id.to_string()))
    }
}
