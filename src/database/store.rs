use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::list::ListQuery;

use super::manager::DatabaseError;
use super::models::NewBaseline;

/// Read seam the listing engine runs against.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Executes the composed query, one JSON object per row keyed by attribute name.
    async fn fetch(&self, query: &ListQuery) -> Result<Vec<Map<String, Value>>, DatabaseError>;

    /// Counts rows matching the query's predicates, ignoring order and window.
    async fn count(&self, query: &ListQuery) -> Result<i64, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
pub trait BaselineWriter: Send + Sync {
    /// Inserts a baseline for `account`, attaches the listed systems and
    /// returns the new id.
    async fn create_baseline(&self, account: i32, baseline: &NewBaseline) -> Result<i64, DatabaseError>;
}
