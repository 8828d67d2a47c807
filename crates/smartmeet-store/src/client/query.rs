//! Single-table query surface.
//!
//! [`StoreClient`] is the only component that talks to the backing store,
//! and it deliberately exposes no more than the store's native contract:
//! per-table equality / greater-or-equal / id-in-set filters, one ordering
//! column, and row-level insert/update/delete. Rows travel as JSON object
//! maps; decoding into typed rows happens in [`crate::rows`].
//!
//! Two store-reported conditions are mapped to structured errors here so
//! the adapter can react to them: a missing column becomes
//! [`StoreError::SchemaDrift`], and a UNIQUE violation becomes
//! [`StoreError::Conflict`].

use rusqlite::params_from_iter;
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::Value;

use crate::client::connection::{ConnectionPool, PooledConnection};
use crate::errors::{Result, StoreError};

/// A raw store row: column name → JSON value.
pub type Row = serde_json::Map<String, Value>;

/// Supported single-table predicates.
enum Predicate {
    Eq(String, Value),
    Gte(String, Value),
    InSet(String, Vec<Value>),
}

/// Thin client issuing single-table queries against the backing store.
pub struct StoreClient {
    pool: ConnectionPool,
}

impl StoreClient {
    /// Create a client over the given pool.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool (migrations, maintenance).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Start a SELECT against one table.
    pub fn select(&self, table: &str) -> Select<'_> {
        Select {
            client: self,
            table: table.to_string(),
            predicates: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Insert one row and return it as stored.
    pub fn insert(&self, table: &str, row: Row) -> Result<Row> {
        if row.is_empty() {
            return Err(StoreError::Validation(format!(
                "insert into {table} requires at least one column"
            )));
        }
        let columns: Vec<String> = row.keys().map(|k| format!("\"{k}\"")).collect();
        let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO \"{table}\" ({}) VALUES ({}) RETURNING *",
            columns.join(", "),
            placeholders.join(", ")
        );
        let params: Vec<SqlValue> = row.values().map(json_to_sql).collect();

        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| map_sqlite_error(table, e))?;
        let inserted = stmt
            .query_row(params_from_iter(params), row_to_map)
            .map_err(|e| map_sqlite_error(table, e))?;
        Ok(inserted)
    }

    /// Start an UPDATE against one table.
    pub fn update(&self, table: &str, patch: Row) -> Update<'_> {
        Update {
            client: self,
            table: table.to_string(),
            patch,
            predicates: Vec::new(),
        }
    }

    /// Start a DELETE against one table.
    pub fn delete(&self, table: &str) -> Delete<'_> {
        Delete {
            client: self,
            table: table.to_string(),
            predicates: Vec::new(),
        }
    }
}

/// Builder for a single-table SELECT.
pub struct Select<'c> {
    client: &'c StoreClient,
    table: String,
    predicates: Vec<Predicate>,
    order: Option<(String, bool)>,
    limit: Option<i64>,
}

impl Select<'_> {
    /// Equality filter.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.predicates
            .push(Predicate::Eq(column.to_string(), value.into()));
        self
    }

    /// Greater-or-equal range filter.
    pub fn gte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.predicates
            .push(Predicate::Gte(column.to_string(), value.into()));
        self
    }

    /// Id-in-set filter. An empty set matches nothing.
    pub fn in_set<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.predicates
            .push(Predicate::InSet(column.to_string(), values));
        self
    }

    /// Order ascending by one column.
    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some((column.to_string(), false));
        self
    }

    /// Order descending by one column.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some((column.to_string(), true));
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Execute and return all matching rows.
    pub fn fetch(self) -> Result<Vec<Row>> {
        // An empty IN set can never match; skip the round trip.
        if self
            .predicates
            .iter()
            .any(|p| matches!(p, Predicate::InSet(_, v) if v.is_empty()))
        {
            return Ok(Vec::new());
        }

        let mut sql = format!("SELECT * FROM \"{}\"", self.table);
        let mut params: Vec<SqlValue> = Vec::new();
        let clauses = build_clauses(&self.predicates, &mut params);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if let Some((column, desc)) = &self.order {
            sql.push_str(&format!(
                " ORDER BY \"{column}\" {}",
                if *desc { "DESC" } else { "ASC" }
            ));
        }
        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        let conn = self.client.conn()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| map_sqlite_error(&self.table, e))?;
        let rows = stmt
            .query_map(params_from_iter(params), row_to_map)
            .map_err(|e| map_sqlite_error(&self.table, e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| map_sqlite_error(&self.table, e))?;
        Ok(rows)
    }

    /// Execute and return the first matching row, if any.
    pub fn fetch_one(self) -> Result<Option<Row>> {
        Ok(self.limit(1).fetch()?.into_iter().next())
    }
}

/// Builder for a single-table UPDATE.
pub struct Update<'c> {
    client: &'c StoreClient,
    table: String,
    patch: Row,
    predicates: Vec<Predicate>,
}

impl Update<'_> {
    /// Equality filter on the rows to update.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.predicates
            .push(Predicate::Eq(column.to_string(), value.into()));
        self
    }

    /// Execute, returning the number of affected rows.
    pub fn execute(self) -> Result<usize> {
        if self.patch.is_empty() {
            return Ok(0);
        }
        let mut params: Vec<SqlValue> = Vec::new();
        let assignments: Vec<String> = self
            .patch
            .iter()
            .map(|(column, value)| {
                params.push(json_to_sql(value));
                format!("\"{column}\" = ?{}", params.len())
            })
            .collect();
        let mut sql = format!("UPDATE \"{}\" SET {}", self.table, assignments.join(", "));
        let clauses = build_clauses(&self.predicates, &mut params);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        let conn = self.client.conn()?;
        conn.execute(&sql, params_from_iter(params))
            .map_err(|e| map_sqlite_error(&self.table, e))
    }
}

/// Builder for a single-table DELETE.
pub struct Delete<'c> {
    client: &'c StoreClient,
    table: String,
    predicates: Vec<Predicate>,
}

impl Delete<'_> {
    /// Equality filter on the rows to delete.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.predicates
            .push(Predicate::Eq(column.to_string(), value.into()));
        self
    }

    /// Execute, returning the number of affected rows.
    pub fn execute(self) -> Result<usize> {
        let mut params: Vec<SqlValue> = Vec::new();
        let mut sql = format!("DELETE FROM \"{}\"", self.table);
        let clauses = build_clauses(&self.predicates, &mut params);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        let conn = self.client.conn()?;
        conn.execute(&sql, params_from_iter(params))
            .map_err(|e| map_sqlite_error(&self.table, e))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal
// ─────────────────────────────────────────────────────────────────────────────

fn build_clauses(predicates: &[Predicate], params: &mut Vec<SqlValue>) -> Vec<String> {
    predicates
        .iter()
        .map(|predicate| match predicate {
            Predicate::Eq(column, value) => {
                params.push(json_to_sql(value));
                format!("\"{column}\" = ?{}", params.len())
            }
            Predicate::Gte(column, value) => {
                params.push(json_to_sql(value));
                format!("\"{column}\" >= ?{}", params.len())
            }
            Predicate::InSet(column, values) => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|value| {
                        params.push(json_to_sql(value));
                        format!("?{}", params.len())
                    })
                    .collect();
                format!("\"{column}\" IN ({})", placeholders.join(", "))
            }
        })
        .collect()
}

/// Bind a JSON value as the closest SQLite scalar. Arrays and objects are
/// stored as JSON text, matching how the external store serializes lists.
fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| n.as_f64().map(SqlValue::Real))
            .unwrap_or(SqlValue::Null),
        Value::String(s) => SqlValue::Text(s.clone()),
        composite @ (Value::Array(_) | Value::Object(_)) => SqlValue::Text(composite.to_string()),
    }
}

fn row_to_map(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let statement = row.as_ref();
    let mut map = Row::new();
    for (index, name) in statement.column_names().into_iter().enumerate() {
        let value = match row.get_ref(index)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::from(n),
            ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
            ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
            // The fixed schema has no blob columns.
            ValueRef::Blob(_) => Value::Null,
        };
        let _ = map.insert(name.to_string(), value);
    }
    Ok(map)
}

/// Map store-reported failures the adapter needs to distinguish.
fn map_sqlite_error(table: &str, err: rusqlite::Error) -> StoreError {
    let message = err.to_string();
    if let Some(rest) = message.split("no such column: ").nth(1) {
        return StoreError::SchemaDrift {
            table: table.to_string(),
            column: first_token(rest),
        };
    }
    if let Some(rest) = message.split("has no column named ").nth(1) {
        return StoreError::SchemaDrift {
            table: table.to_string(),
            column: first_token(rest),
        };
    }
    if let Some(rest) = message.split("UNIQUE constraint failed: ").nth(1) {
        return StoreError::Conflict {
            constraint: first_token(rest),
        };
    }
    StoreError::Sqlite(err)
}

fn first_token(s: &str) -> String {
    s.split_whitespace()
        .next()
        .unwrap_or(s)
        .trim_matches(|c: char| c == ',' || c == ')' || c == '"')
        .to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::client::connection::{new_in_memory, ConnectionConfig};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn client() -> StoreClient {
        let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
        pool.get()
            .unwrap()
            .execute_batch(
                "CREATE TABLE things (
                   id    TEXT PRIMARY KEY,
                   name  TEXT NOT NULL,
                   score INTEGER NOT NULL DEFAULT 0,
                   tag   TEXT UNIQUE
                 );",
            )
            .unwrap();
        StoreClient::new(pool)
    }

    fn row(id: &str, name: &str, score: i64) -> Row {
        let Value::Object(map) = json!({"id": id, "name": name, "score": score}) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn insert_returns_stored_row() {
        let client = client();
        let inserted = client.insert("things", row("t1", "alpha", 5)).unwrap();
        assert_eq!(inserted["id"], "t1");
        assert_eq!(inserted["score"], 5);
        // Defaults from the schema come back too.
        assert_eq!(inserted["tag"], Value::Null);
    }

    #[test]
    fn insert_empty_row_is_validation_error() {
        let client = client();
        let err = client.insert("things", Row::new()).unwrap_err();
        assert_matches!(err, StoreError::Validation(_));
    }

    #[test]
    fn select_eq_filters() {
        let client = client();
        client.insert("things", row("t1", "alpha", 1)).unwrap();
        client.insert("things", row("t2", "beta", 2)).unwrap();

        let rows = client.select("things").eq("name", "beta").fetch().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "t2");
    }

    #[test]
    fn select_gte_and_order() {
        let client = client();
        client.insert("things", row("t1", "a", 1)).unwrap();
        client.insert("things", row("t2", "b", 5)).unwrap();
        client.insert("things", row("t3", "c", 3)).unwrap();

        let rows = client
            .select("things")
            .gte("score", 3)
            .order_desc("score")
            .fetch()
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["t2", "t3"]);
    }

    #[test]
    fn select_in_set() {
        let client = client();
        client.insert("things", row("t1", "a", 1)).unwrap();
        client.insert("things", row("t2", "b", 2)).unwrap();
        client.insert("things", row("t3", "c", 3)).unwrap();

        let rows = client
            .select("things")
            .in_set("id", ["t1", "t3"])
            .order_asc("id")
            .fetch()
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn select_empty_in_set_short_circuits() {
        let client = client();
        client.insert("things", row("t1", "a", 1)).unwrap();
        let rows = client
            .select("things")
            .in_set("id", Vec::<String>::new())
            .fetch()
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn fetch_one_returns_first_or_none() {
        let client = client();
        client.insert("things", row("t1", "a", 1)).unwrap();

        let found = client.select("things").eq("id", "t1").fetch_one().unwrap();
        assert!(found.is_some());

        let missing = client.select("things").eq("id", "zz").fetch_one().unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn update_patches_matching_rows() {
        let client = client();
        client.insert("things", row("t1", "a", 1)).unwrap();

        let mut patch = Row::new();
        patch.insert("score".into(), json!(9));
        let changed = client.update("things", patch).eq("id", "t1").execute().unwrap();
        assert_eq!(changed, 1);

        let refreshed = client
            .select("things")
            .eq("id", "t1")
            .fetch_one()
            .unwrap()
            .unwrap();
        assert_eq!(refreshed["score"], 9);
    }

    #[test]
    fn update_empty_patch_is_noop() {
        let client = client();
        client.insert("things", row("t1", "a", 1)).unwrap();
        let changed = client
            .update("things", Row::new())
            .eq("id", "t1")
            .execute()
            .unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn delete_reports_affected_rows() {
        let client = client();
        client.insert("things", row("t1", "a", 1)).unwrap();

        assert_eq!(client.delete("things").eq("id", "t1").execute().unwrap(), 1);
        assert_eq!(client.delete("things").eq("id", "t1").execute().unwrap(), 0);
    }

    #[test]
    fn missing_column_maps_to_schema_drift() {
        let client = client();
        let err = client
            .select("things")
            .eq("no_such_field", 1)
            .fetch()
            .unwrap_err();
        assert_matches!(err, StoreError::SchemaDrift { ref table, ref column }
            if table == "things" && column == "no_such_field");
    }

    #[test]
    fn missing_insert_column_maps_to_schema_drift() {
        let client = client();
        let Value::Object(bad) = json!({"id": "t9", "name": "x", "bogus": 1}) else {
            unreachable!()
        };
        let err = client.insert("things", bad).unwrap_err();
        assert_matches!(err, StoreError::SchemaDrift { ref column, .. } if column == "bogus");
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let client = client();
        let Value::Object(first) = json!({"id": "t1", "name": "a", "tag": "dup"}) else {
            unreachable!()
        };
        let Value::Object(second) = json!({"id": "t2", "name": "b", "tag": "dup"}) else {
            unreachable!()
        };
        client.insert("things", first).unwrap();
        let err = client.insert("things", second).unwrap_err();
        assert_matches!(err, StoreError::Conflict { ref constraint } if constraint == "things.tag");
    }

    #[test]
    fn arrays_round_trip_as_json_text() {
        let client = client();
        let Value::Object(with_list) = json!({"id": "t1", "name": "a", "tag": ["x", "y"]}) else {
            unreachable!()
        };
        let inserted = client.insert("things", with_list).unwrap();
        assert_eq!(inserted["tag"], json!(r#"["x","y"]"#));
    }
}
