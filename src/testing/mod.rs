//! In-memory storage and request helpers for router-level tests.
//!
//! Rows are stored per `FROM` clause and keyed by the same expressions the
//! resources declare (`sp.display_name`, `bl.id`, ...), so composed queries
//! evaluate against them without a database.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use crate::database::models::NewBaseline;
use crate::database::{BaselineWriter, DatabaseError, ListStore};
use crate::handlers::baselines::list::SYSTEMS_COUNT_EXPR;
use crate::list::{CompareOp, Condition, Limit, ListQuery, SortDirection};
use crate::middleware::ACCOUNT_HEADER;
use crate::router::app;
use crate::state::{AppState, Resources};

pub const BASELINES: &str = "baseline AS bl";
pub const SYSTEMS: &str = "system_platform AS sp";

pub const HOST_1: &str = "00000000-0000-0000-0000-000000000001";
pub const HOST_2: &str = "00000000-0000-0000-0000-000000000002";
pub const HOST_3: &str = "00000000-0000-0000-0000-000000000003";
pub const HOST_4: &str = "00000000-0000-0000-0000-000000000004";
pub const HOST_5: &str = "00000000-0000-0000-0000-000000000005";

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<&'static str, Vec<Map<String, Value>>>>,
    last_baseline_id: AtomicI64,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, table: &'static str, row: Value) {
        if let Value::Object(row) = row {
            if table == BASELINES {
                if let Some(id) = row.get("bl.id").and_then(Value::as_i64) {
                    self.last_baseline_id.fetch_max(id, AtomicOrdering::SeqCst);
                }
            }
            self.tables.lock().unwrap().entry(table).or_default().push(row);
        }
    }

    /// Makes every subsequent read fail.
    pub fn fail_queries(&self) {
        self.failing.store(true, AtomicOrdering::SeqCst);
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.failing.load(AtomicOrdering::SeqCst) {
            return Err(DatabaseError::RowDecode("memory store failure".to_string()));
        }
        Ok(())
    }

    fn rows(&self, table: &str) -> Vec<Map<String, Value>> {
        let tables = self.tables.lock().unwrap();
        let mut rows = tables.get(table).cloned().unwrap_or_default();
        if table == BASELINES {
            let systems = tables.get(SYSTEMS).cloned().unwrap_or_default();
            for row in rows.iter_mut() {
                let attached = systems
                    .iter()
                    .filter(|sp| {
                        sp.get("sp.baseline_id") == row.get("bl.id")
                            && sp.get("sp.rh_account_id") == row.get("bl.rh_account_id")
                            && sp.get("sp.stale") == Some(&Value::Bool(false))
                    })
                    .count();
                row.insert(SYSTEMS_COUNT_EXPR.to_string(), json!(attached));
            }
        }
        rows
    }

    fn matching(&self, query: &ListQuery) -> Vec<Map<String, Value>> {
        self.rows(query.from())
            .into_iter()
            .filter(|row| query.conditions().all(|c| matches(row, c)))
            .collect()
    }
}

fn field<'a>(row: &'a Map<String, Value>, expr: &str) -> &'a Value {
    row.get(expr).unwrap_or(&Value::Null)
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn matches(row: &Map<String, Value>, condition: &Condition) -> bool {
    match condition {
        Condition::Compare { expr, op, value } => {
            let ordering = compare(field(row, expr), &value.to_json());
            match op {
                CompareOp::Eq => ordering == Some(Ordering::Equal),
                CompareOp::Neq => matches!(ordering, Some(o) if o != Ordering::Equal),
                CompareOp::Gt => ordering == Some(Ordering::Greater),
                CompareOp::Lt => ordering == Some(Ordering::Less),
            }
        }
        Condition::In { expr, values } => values
            .iter()
            .any(|v| compare(field(row, expr), &v.to_json()) == Some(Ordering::Equal)),
        Condition::Contains { expr, needle } => {
            let haystack = match field(row, expr) {
                Value::Null => return false,
                Value::String(s) => s.to_lowercase(),
                other => other.to_string().to_lowercase(),
            };
            haystack.contains(&needle.to_lowercase())
        }
        Condition::AnyOf(conditions) => conditions.iter().any(|c| matches(row, c)),
    }
}

/// Nulls sort after every value ascending, as in Postgres.
fn sort_key_cmp(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare(a, b).unwrap_or(Ordering::Equal),
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn fetch(&self, query: &ListQuery) -> Result<Vec<Map<String, Value>>, DatabaseError> {
        self.check()?;
        let mut rows = self.matching(query);

        rows.sort_by(|a, b| {
            query
                .order()
                .iter()
                .map(|spec| {
                    let ordering = sort_key_cmp(field(a, spec.field.expr), field(b, spec.field.expr));
                    match spec.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let window = query.window();
        let take = match window.limit {
            Limit::Bounded(limit) => limit as usize,
            Limit::Unbounded => usize::MAX,
        };

        Ok(rows
            .into_iter()
            .skip(window.offset as usize)
            .take(take)
            .map(|row| {
                query
                    .select()
                    .iter()
                    .map(|(name, expr)| (name.to_string(), field(&row, expr).clone()))
                    .collect()
            })
            .collect())
    }

    async fn count(&self, query: &ListQuery) -> Result<i64, DatabaseError> {
        self.check()?;
        Ok(self.matching(query).len() as i64)
    }
}

#[async_trait]
impl BaselineWriter for MemoryStore {
    async fn create_baseline(&self, account: i32, baseline: &NewBaseline) -> Result<i64, DatabaseError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();

        let taken = tables.get(BASELINES).into_iter().flatten().any(|bl| {
            bl.get("bl.rh_account_id") == Some(&json!(account)) && bl.get("bl.name") == Some(&json!(baseline.name))
        });
        if taken {
            return Err(DatabaseError::UniqueViolation("baseline_rh_account_id_name_key".to_string()));
        }

        let id = self.last_baseline_id.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        let row = json!({
            "bl.id": id,
            "bl.rh_account_id": account,
            "bl.name": baseline.name,
            "bl.description": baseline.description,
            "bl.config": baseline.config,
        });
        if let Value::Object(row) = row {
            tables.entry(BASELINES).or_default().push(row);
        }

        for sp in tables.entry(SYSTEMS).or_default().iter_mut() {
            let attach = sp.get("sp.rh_account_id") == Some(&json!(account))
                && baseline
                    .inventory_ids
                    .iter()
                    .any(|id| sp.get("sp.inventory_id") == Some(&json!(id.to_string())));
            if attach {
                sp.insert("sp.baseline_id".to_string(), json!(id));
            }
        }
        Ok(id)
    }
}

pub fn system(account: i32, inventory_id: &str, display_name: &str, baseline_id: Option<i64>, stale: bool) -> Value {
    json!({
        "sp.rh_account_id": account,
        "sp.inventory_id": inventory_id,
        "sp.display_name": display_name,
        "sp.baseline_id": baseline_id,
        "sp.stale": stale,
    })
}

/// Two accounts: account 1 owns baselines 1 (two live systems) and 2 (one
/// stale system); account 2 owns baseline 3.
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.insert(
        BASELINES,
        json!({"bl.id": 1, "bl.rh_account_id": 1, "bl.name": "baseline_1-1", "bl.description": "first baseline"}),
    );
    store.insert(
        BASELINES,
        json!({"bl.id": 2, "bl.rh_account_id": 1, "bl.name": "baseline_1-2", "bl.description": null}),
    );
    store.insert(
        BASELINES,
        json!({"bl.id": 3, "bl.rh_account_id": 2, "bl.name": "baseline_2-1", "bl.description": null}),
    );

    store.insert(SYSTEMS, system(1, HOST_1, "host1", Some(1), false));
    store.insert(SYSTEMS, system(1, HOST_2, "host2", Some(1), false));
    store.insert(SYSTEMS, system(1, HOST_3, "host3", None, false));
    store.insert(SYSTEMS, system(1, HOST_4, "host4", Some(2), true));
    store.insert(SYSTEMS, system(2, HOST_5, "host5", Some(3), false));
    Arc::new(store)
}

pub fn test_app(store: Arc<MemoryStore>) -> Router {
    let resources = Resources::build().expect("resource declarations are valid");
    app(AppState::new(store, resources))
}

pub async fn send(app: &Router, method: Method, uri: &str, account: Option<i32>, body: Body) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(account) = account {
        request = request.header(ACCOUNT_HEADER, account.to_string());
    }
    let request = request
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, account: Option<i32>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, account, Body::empty()).await
}

pub async fn put(app: &Router, uri: &str, account: Option<i32>, body: String) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, account, Body::from(body)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let app = test_app(seeded_store());
        let (status, body) = get(&app, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found_without_account() {
        let app = test_app(seeded_store());
        let (status, _) = get(&app, "/api/patch/v1/unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_account_header_is_unauthorized() {
        let app = test_app(seeded_store());
        let request = Request::builder()
            .uri("/api/patch/v1/baselines")
            .header(ACCOUNT_HEADER, "not-a-number")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
