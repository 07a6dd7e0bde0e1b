use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time window configuration stored with a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    pub to_time: DateTime<FixedOffset>,
}

/// Validated baseline ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBaseline {
    pub name: String,
    pub description: Option<String>,
    pub config: Option<BaselineConfig>,
    pub inventory_ids: Vec<Uuid>,
}
