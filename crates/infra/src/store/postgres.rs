//! Postgres-backed record stores.
//!
//! Packing lists keep the client snapshot, boxes and tracking numbers as
//! JSONB documents (`client_data`, `boxes_data`, `tracking_numbers`) in the
//! same camelCase shape the API speaks; the code is the primary key.
//! Clients are flat rows with the address as JSONB.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use lomartex_clients::{Address, Client};
use lomartex_core::ClientId;
use lomartex_packing::{Carrier, PackingList, ShippingBox};

use super::error::map_sqlx_error;
use super::{ClientStore, PackingListStore, StoreError, check_packing_list};

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS clients (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL,
        address JSONB,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS packing_lists (
        code TEXT PRIMARY KEY CHECK (code ~ '^LOMPL[0-9]{12}$'),
        client_data JSONB NOT NULL,
        boxes_data JSONB NOT NULL,
        tracking_numbers JSONB NOT NULL DEFAULT '[]'::jsonb,
        carrier TEXT NOT NULL,
        custom_carrier TEXT,
        po TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS clients_name_idx ON clients (lower(name))",
    "CREATE INDEX IF NOT EXISTS packing_lists_created_at_idx ON packing_lists (created_at DESC)",
];

/// Connect a pool to `database_url`.
pub async fn connect(database_url: &str) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Create the tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    tracing::info!("database schema ready");
    Ok(())
}

/// `%query%` for ILIKE, with the pattern metacharacters escaped.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_json<T: serde::Serialize>(what: &str, value: &T) -> Result<JsonValue, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Backend(format!("failed to encode {what}: {e}")))
}

fn from_json<T: serde::de::DeserializeOwned>(what: &str, value: JsonValue) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Backend(format!("failed to decode {what}: {e}")))
}

// -------------------------
// Clients
// -------------------------

#[derive(Debug, Clone)]
pub struct PostgresClientStore {
    pool: Arc<PgPool>,
}

impl PostgresClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn client_from_row(row: &PgRow) -> Result<Client, StoreError> {
    let decode = |e| map_sqlx_error("decode_client", e);
    let id: Uuid = row.try_get("id").map_err(decode)?;
    let address: Option<JsonValue> = row.try_get("address").map_err(decode)?;
    Ok(Client {
        id: ClientId::from_uuid(id),
        name: row.try_get("name").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
        phone: row.try_get("phone").map_err(decode)?,
        address: address
            .map(|a| from_json::<Address>("client address", a))
            .transpose()?,
    })
}

fn address_json(client: &Client) -> Result<Option<JsonValue>, StoreError> {
    client
        .address
        .as_ref()
        .map(|a| to_json("client address", a))
        .transpose()
}

#[async_trait]
impl ClientStore for PostgresClientStore {
    #[instrument(skip(self, client), fields(client_id = %client.id), err)]
    async fn create(&self, client: Client) -> Result<Client, StoreError> {
        client.validate()?;
        sqlx::query(
            r#"
            INSERT INTO clients (id, name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(address_json(&client)?)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_client", e))?;
        Ok(client)
    }

    async fn get(&self, id: ClientId) -> Result<Client, StoreError> {
        let row = sqlx::query("SELECT id, name, email, phone, address FROM clients WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_client", e))?
            .ok_or(StoreError::NotFound)?;
        client_from_row(&row)
    }

    #[instrument(skip(self, client), fields(client_id = %client.id), err)]
    async fn update(&self, client: Client) -> Result<Client, StoreError> {
        client.validate()?;
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET name = $2, email = $3, phone = $4, address = $5, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(address_json(&client)?)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_client", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(client)
    }

    #[instrument(skip(self, client), fields(client_id = %client.id), err)]
    async fn upsert(&self, client: Client) -> Result<Client, StoreError> {
        client.validate()?;
        sqlx::query(
            r#"
            INSERT INTO clients (id, name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                updated_at = now()
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(address_json(&client)?)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_client", e))?;
        Ok(client)
    }

    #[instrument(skip(self), fields(client_id = %id), err)]
    async fn delete(&self, id: ClientId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_client", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Client>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, address FROM clients ORDER BY lower(name) ASC, id ASC",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_clients", e))?;
        rows.iter().map(client_from_row).collect()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Client>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, phone, address
            FROM clients
            WHERE name ILIKE $1 OR email ILIKE $1
            ORDER BY lower(name) ASC, id ASC
            LIMIT $2
            "#,
        )
        .bind(like_pattern(query))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("search_clients", e))?;
        rows.iter().map(client_from_row).collect()
    }
}

// -------------------------
// Packing lists
// -------------------------

#[derive(Debug, Clone)]
pub struct PostgresPackingListStore {
    pool: Arc<PgPool>,
}

impl PostgresPackingListStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

const PACKING_LIST_COLUMNS: &str = "code, client_data, boxes_data, tracking_numbers, carrier, custom_carrier, po, created_at, updated_at";

fn packing_list_from_row(row: &PgRow) -> Result<PackingList, StoreError> {
    let decode = |e| map_sqlx_error("decode_packing_list", e);
    let carrier: String = row.try_get("carrier").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(decode)?;
    Ok(PackingList {
        code: row.try_get("code").map_err(decode)?,
        client: from_json::<Client>("client_data", row.try_get("client_data").map_err(decode)?)?,
        boxes: from_json::<Vec<ShippingBox>>("boxes_data", row.try_get("boxes_data").map_err(decode)?)?,
        tracking_numbers: from_json::<Vec<String>>(
            "tracking_numbers",
            row.try_get("tracking_numbers").map_err(decode)?,
        )?,
        carrier: carrier
            .parse::<Carrier>()
            .map_err(|e| StoreError::Backend(format!("failed to decode carrier: {e}")))?,
        custom_carrier: row.try_get("custom_carrier").map_err(decode)?,
        po: row.try_get("po").map_err(decode)?,
        created_at: Some(created_at),
        updated_at: Some(updated_at),
    })
}

#[async_trait]
impl PackingListStore for PostgresPackingListStore {
    #[instrument(skip(self, list), fields(code = %list.code), err)]
    async fn create(&self, mut list: PackingList) -> Result<PackingList, StoreError> {
        check_packing_list(&list)?;
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO packing_lists
                (code, client_data, boxes_data, tracking_numbers, carrier, custom_carrier, po, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(&list.code)
        .bind(to_json("client_data", &list.client)?)
        .bind(to_json("boxes_data", &list.boxes)?)
        .bind(to_json("tracking_numbers", &list.tracking_numbers)?)
        .bind(list.carrier.as_str())
        .bind(list.custom_carrier.as_deref())
        .bind(list.po.as_deref())
        .bind(now)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_packing_list", e))?;

        list.created_at = Some(now);
        list.updated_at = Some(now);
        Ok(list)
    }

    async fn get(&self, code: &str) -> Result<PackingList, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PACKING_LIST_COLUMNS} FROM packing_lists WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_packing_list", e))?
        .ok_or(StoreError::NotFound)?;
        packing_list_from_row(&row)
    }

    #[instrument(skip(self, list), err)]
    async fn update(&self, code: &str, mut list: PackingList) -> Result<PackingList, StoreError> {
        list.code = code.to_string();
        check_packing_list(&list)?;
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            UPDATE packing_lists
            SET client_data = $2,
                boxes_data = $3,
                tracking_numbers = $4,
                carrier = $5,
                custom_carrier = $6,
                po = $7,
                updated_at = $8
            WHERE code = $1
            RETURNING created_at
            "#,
        )
        .bind(&list.code)
        .bind(to_json("client_data", &list.client)?)
        .bind(to_json("boxes_data", &list.boxes)?)
        .bind(to_json("tracking_numbers", &list.tracking_numbers)?)
        .bind(list.carrier.as_str())
        .bind(list.custom_carrier.as_deref())
        .bind(list.po.as_deref())
        .bind(now)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_packing_list", e))?
        .ok_or(StoreError::NotFound)?;

        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| map_sqlx_error("update_packing_list", e))?;
        list.created_at = Some(created_at);
        list.updated_at = Some(now);
        Ok(list)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM packing_lists WHERE code = $1")
            .bind(code)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_packing_list", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PackingList>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PACKING_LIST_COLUMNS} FROM packing_lists ORDER BY created_at DESC, code DESC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_packing_lists", e))?;
        rows.iter().map(packing_list_from_row).collect()
    }

    async fn search(&self, query: &str) -> Result<Vec<PackingList>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PACKING_LIST_COLUMNS} FROM packing_lists WHERE code ILIKE $1 ORDER BY created_at DESC, code DESC"
        ))
        .bind(like_pattern(query))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("search_packing_lists", e))?;
        rows.iter().map(packing_list_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("acme"), "%acme%");
        assert_eq!(like_pattern(" 50%_off\\ "), "%50\\%\\_off\\\\%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn schema_keys_packing_lists_by_code() {
        assert!(SCHEMA[1].contains("code TEXT PRIMARY KEY"));
        assert!(SCHEMA[1].contains("boxes_data JSONB NOT NULL"));
    }
}
