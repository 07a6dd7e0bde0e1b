use axum::{
    body::Bytes,
    extract::{Extension, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{BaselineConfig, NewBaseline};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{Account, ApiResponse, ApiResult};
use crate::state::AppState;

pub const MISSING_NAME: &str = "missing required parameter 'name'";
pub const NAME_EXISTS: &str = "baseline name already exists";

#[derive(Debug, Deserialize)]
pub struct CreateBaselineRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inventory_ids: Vec<Uuid>,
    #[serde(default)]
    pub config: Option<BaselineConfig>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBaselineResponse {
    pub baseline_id: i64,
}

impl CreateBaselineRequest {
    fn validate(self) -> Result<NewBaseline, ApiError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::bad_request(MISSING_NAME))?;

        let description = self.description.filter(|d| !d.trim().is_empty());

        let mut inventory_ids = Vec::with_capacity(self.inventory_ids.len());
        for id in self.inventory_ids {
            if !inventory_ids.contains(&id) {
                inventory_ids.push(id);
            }
        }

        Ok(NewBaseline { name, description, config: self.config, inventory_ids })
    }
}

/// PUT /api/patch/v1/baselines - create a baseline and attach systems to it
pub async fn create(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    body: Bytes,
) -> ApiResult<CreateBaselineResponse> {
    let request: CreateBaselineRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let baseline = request.validate()?;

    let baseline_id = state
        .baselines
        .create_baseline(account.0, &baseline)
        .await
        .map_err(|e| match e {
            DatabaseError::UniqueViolation(_) => ApiError::bad_request(NAME_EXISTS),
            other => ApiError::from(other),
        })?;

    tracing::info!(
        account = account.0,
        baseline_id,
        systems = baseline.inventory_ids.len(),
        "Created baseline"
    );
    Ok(ApiResponse::success(CreateBaselineResponse { baseline_id }))
}
