//! MysqlStore - the generic CRUD dispatch
//!
//! One struct owning the injected connection pool, with one method per
//! operation. Every operation validates first, then acquires exactly one
//! pooled connection, runs exactly one statement on it and gives it back on
//! every exit path (the `PoolConnection` guard drops at scope end, on the
//! error path included). No transactions, no retries, no row caching.
//!
//! Statement planning is pure: `plan_insert` / `plan_update` build the SQL
//! text and bind list without touching the pool, which is where all the
//! input validation lives.

use serde_json::Value;
use sqlx::MySqlPool;

use super::error::StoreError;
use super::row::{JsonRow, bind_value, row_to_json};
use super::tables::{id_field_for, rename_for};

/// Driver descriptor for a completed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub last_insert_id: u64,
    pub rows_affected: u64,
}

/// The two wire forms an insert accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertBody {
    /// Explicit column list and value list, already ordered by the caller.
    /// No field normalization is applied in this mode.
    Explicit {
        columns: Vec<String>,
        values: Vec<Value>,
    },
    /// Plain field -> value object; the column list is derived from the
    /// object's own key order, after per-table normalization.
    Row(JsonRow),
}

/// A planned statement: SQL text plus its ordered bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<Value>,
}

#[derive(Clone)]
pub struct MysqlStore {
    pool: MySqlPool,
}

impl MysqlStore {
    pub fn new(pool: MySqlPool) -> MysqlStore {
        Self { pool }
    }

    /// All rows of `table`, no filtering, no pagination.
    pub async fn list(&self, table: &str) -> Result<Vec<JsonRow>, StoreError> {
        let sql = format!("SELECT * FROM {}", quote_ident(table));
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    /// The row whose primary-key column equals `id`.
    ///
    /// # Returns
    /// * `Ok(Some(row))` - row found
    /// * `Ok(None)` - no such row (not an error)
    pub async fn get(&self, table: &str, id: &Value) -> Result<Option<JsonRow>, StoreError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?",
            quote_ident(table),
            quote_ident(id_field_for(table)),
        );
        let mut conn = self.pool.acquire().await?;
        let row = bind_value(sqlx::query(&sql), id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.as_ref().map(row_to_json))
    }

    /// Inserts one row; see [`InsertBody`] for the accepted forms.
    pub async fn insert(&self, table: &str, body: InsertBody) -> Result<WriteOutcome, StoreError> {
        let stmt = plan_insert(table, body)?;
        self.execute(&stmt).await
    }

    /// Updates the one row identified by the primary-key field inside `data`.
    /// The key identifies the row and is never itself rewritten.
    pub async fn update(&self, table: &str, data: JsonRow) -> Result<WriteOutcome, StoreError> {
        let stmt = plan_update(table, data)?;
        self.execute(&stmt).await
    }

    /// Deletes the row whose primary-key column equals `id`. Deleting a
    /// nonexistent id succeeds with zero affected rows.
    pub async fn remove(&self, table: &str, id: &Value) -> Result<WriteOutcome, StoreError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            quote_ident(table),
            quote_ident(id_field_for(table)),
        );
        let mut conn = self.pool.acquire().await?;
        let result = bind_value(sqlx::query(&sql), id)
            .execute(&mut *conn)
            .await?;
        Ok(WriteOutcome {
            last_insert_id: result.last_insert_id(),
            rows_affected: result.rows_affected(),
        })
    }

    /// Raw escape hatch for arbitrary parameterized statements. No
    /// validation layer: callers own the SQL safety of the template.
    pub async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<JsonRow>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_value(query, value);
        }
        let rows = query.fetch_all(&mut *conn).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn execute(&self, stmt: &Statement) -> Result<WriteOutcome, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let mut query = sqlx::query(&stmt.sql);
        for value in &stmt.binds {
            query = bind_value(query, value);
        }
        let result = query.execute(&mut *conn).await?;
        Ok(WriteOutcome {
            last_insert_id: result.last_insert_id(),
            rows_affected: result.rows_affected(),
        })
    }
}

/// Builds the INSERT statement for either wire form. Pure.
pub fn plan_insert(table: &str, body: InsertBody) -> Result<Statement, StoreError> {
    let (columns, values) = match body {
        InsertBody::Explicit { columns, values } => {
            if columns.is_empty() {
                return Err(StoreError::validation("insert: empty column list"));
            }
            if columns.len() != values.len() {
                return Err(StoreError::validation(format!(
                    "insert: {} columns but {} values",
                    columns.len(),
                    values.len(),
                )));
            }
            (columns, values)
        }
        InsertBody::Row(row) => {
            let row = normalize_row(table, row);
            if row.is_empty() {
                return Err(StoreError::validation("insert: empty data object"));
            }
            row.into_iter().unzip()
        }
    };

    let column_list = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; values.len()].join(", ");

    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            column_list,
            placeholders,
        ),
        binds: values,
    })
}

/// Builds the UPDATE statement. Pure.
///
/// `data` must carry the table's primary-key field with a truthy value; the
/// field is stripped from the write-set and used only in the WHERE clause.
pub fn plan_update(table: &str, data: JsonRow) -> Result<Statement, StoreError> {
    let id_field = id_field_for(table);

    let id = match data.get(id_field) {
        Some(value) if is_truthy(value) => value.clone(),
        _ => {
            return Err(StoreError::validation(format!(
                "update: missing primary key '{}' for table '{}'",
                id_field, table,
            )));
        }
    };

    let mut row = normalize_row(table, data);
    row.shift_remove(id_field);

    if row.is_empty() {
        return Err(StoreError::validation("update: no fields to update"));
    }

    let (columns, mut binds): (Vec<String>, Vec<Value>) = row.into_iter().unzip();
    let assignments = columns
        .iter()
        .map(|c| format!("{} = ?", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ");
    binds.push(id);

    Ok(Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = ?",
            quote_ident(table),
            assignments,
            quote_ident(id_field),
        ),
        binds,
    })
}

/// Applies the table's rename rule to a plain-object payload: the legacy
/// field is copied to the real column name when that one is absent, and is
/// always removed.
fn normalize_row(table: &str, mut row: JsonRow) -> JsonRow {
    if let Some(rule) = rename_for(table) {
        if let Some(value) = row.shift_remove(rule.from) {
            if !row.contains_key(rule.to) {
                row.insert(rule.to.to_string(), value);
            }
        }
    }
    row
}

// Truthiness follows the legacy service: null, false, 0 and "" do not count
// as a usable primary-key value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> JsonRow {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn plain_insert_derives_columns_from_key_order() {
        let stmt = plan_insert(
            "items",
            InsertBody::Row(row(json!({"nombre": "caja", "peso": 2}))),
        )
        .unwrap();

        assert_eq!(
            stmt.sql,
            "INSERT INTO `items` (`nombre`, `peso`) VALUES (?, ?)"
        );
        assert_eq!(stmt.binds, vec![json!("caja"), json!(2)]);
    }

    #[test]
    fn bodegas_insert_rewrites_usuario_id() {
        let stmt = plan_insert(
            "bodegas",
            InsertBody::Row(row(json!({"usuario_id": 9, "nombre": "central"}))),
        )
        .unwrap();

        assert!(stmt.sql.contains("`id_usuario`"));
        assert!(!stmt.sql.contains("`usuario_id`"));
        // Rewritten field keeps its value, appended after the untouched ones.
        assert_eq!(stmt.binds, vec![json!("central"), json!(9)]);
    }

    #[test]
    fn bodegas_insert_keeps_existing_id_usuario() {
        let stmt = plan_insert(
            "bodegas",
            InsertBody::Row(row(json!({"usuario_id": 9, "id_usuario": 4}))),
        )
        .unwrap();

        assert_eq!(stmt.sql, "INSERT INTO `bodegas` (`id_usuario`) VALUES (?)");
        assert_eq!(stmt.binds, vec![json!(4)]);
    }

    #[test]
    fn explicit_insert_skips_normalization() {
        let stmt = plan_insert(
            "bodegas",
            InsertBody::Explicit {
                columns: vec!["usuario_id".into(), "nombre".into()],
                values: vec![json!(9), json!("central")],
            },
        )
        .unwrap();

        assert_eq!(
            stmt.sql,
            "INSERT INTO `bodegas` (`usuario_id`, `nombre`) VALUES (?, ?)"
        );
    }

    #[test]
    fn empty_plain_insert_is_rejected() {
        let err = plan_insert("items", InsertBody::Row(row(json!({})))).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn explicit_insert_with_mismatched_lengths_is_rejected() {
        let err = plan_insert(
            "items",
            InsertBody::Explicit {
                columns: vec!["nombre".into()],
                values: vec![json!("a"), json!("b")],
            },
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn update_requires_the_primary_key() {
        let err = plan_update("items", row(json!({"nombre": "caja"}))).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // Present but not truthy counts as missing.
        let err = plan_update("items", row(json!({"id_item": 0, "nombre": "caja"})))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn update_strips_the_primary_key_from_the_write_set() {
        let stmt = plan_update(
            "bodegas",
            row(json!({"id_bodega": 5, "usuario_id": 9, "ciudad": "Quito"})),
        )
        .unwrap();

        assert_eq!(
            stmt.sql,
            "UPDATE `bodegas` SET `ciudad` = ?, `id_usuario` = ? WHERE `id_bodega` = ?"
        );
        assert_eq!(stmt.binds, vec![json!("Quito"), json!(9), json!(5)]);
    }

    #[test]
    fn update_with_nothing_left_to_write_is_rejected() {
        let err = plan_update("items", row(json!({"id_item": 3}))).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // The rename alone cannot save an update that only restates the key.
        let err = plan_update("bodegas", row(json!({"id_bodega": 5}))).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn unknown_tables_use_the_default_key() {
        let stmt = plan_update("otros", row(json!({"id": 7, "nombre": "x"}))).unwrap();
        assert!(stmt.sql.ends_with("WHERE `id` = ?"));
    }

    #[test]
    fn identifiers_are_backtick_quoted() {
        assert_eq!(quote_ident("items"), "`items`");
        assert_eq!(quote_ident("odd`name"), "`odd``name`");
    }
}
