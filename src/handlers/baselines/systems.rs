use axum::extract::{Extension, Path, RawQuery, State};
use serde::{Deserialize, Serialize};

use crate::database::ListStore;
use crate::error::ApiError;
use crate::list::{
    count_rows, list_common, Attribute, BaseQuery, ListError, ListOptions, ListParams, ListRequest, ListResponse,
    ListRow, RegistryError,
};
use crate::middleware::{Account, ApiResponse, ApiResult};
use crate::router::API_PREFIX;
use crate::state::AppState;

pub const BASELINE_SYSTEMS_TYPE: &str = "baseline_systems";

pub const BASELINE_SYSTEM_FIELDS: &[Attribute] = &[
    Attribute::uuid("id", "sp.inventory_id"),
    Attribute::text("display_name", "sp.display_name"),
    Attribute::boolean("stale", "sp.stale").internal(),
];

pub fn options() -> Result<ListOptions, RegistryError> {
    ListOptions::builder(BASELINE_SYSTEM_FIELDS)
        .default_filter("stale", "false")
        .default_sort("-display_name")
        .tie_break("id")
        .search_fields(&["display_name"])
        .total(count_rows)
        .build()
}

#[derive(Debug, Deserialize)]
pub struct BaselineSystemRow {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineSystemAttributes {
    pub display_name: String,
}

impl ListRow for BaselineSystemRow {
    type Attributes = BaselineSystemAttributes;

    fn into_item(self) -> (String, BaselineSystemAttributes) {
        (self.id, BaselineSystemAttributes { display_name: self.display_name })
    }
}

fn base_query(account: Account, baseline_id: i64) -> BaseQuery {
    BaseQuery::new("system_platform AS sp")
        .join("JOIN inventory.hosts ih ON ih.id = sp.inventory_id")
        .scope_eq("sp.rh_account_id", account.0)
        .scope_eq("sp.baseline_id", baseline_id)
}

async fn ensure_baseline_exists(store: &dyn ListStore, account: Account, baseline_id: i64) -> Result<(), ListError> {
    let query = BaseQuery::new("baseline AS bl")
        .scope_eq("bl.id", baseline_id)
        .scope_eq("bl.rh_account_id", account.0)
        .into_query();

    if store.count(&query).await? == 0 {
        return Err(ListError::ParentResourceNotFound("baseline not found".to_string()));
    }
    Ok(())
}

/// GET /api/patch/v1/baselines/:baseline_id/systems - systems attached to a baseline
pub async fn list(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(baseline_id): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<ListResponse<BaselineSystemAttributes>> {
    let baseline_id: i64 = baseline_id
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid baseline_id: {}", baseline_id)))?;

    // Reject bad parameters before touching storage
    let options = &state.resources.baseline_systems;
    let params = ListParams::parse(query.as_deref());
    let request = ListRequest::resolve(&params, options)?;

    ensure_baseline_exists(state.lists.as_ref(), account, baseline_id).await?;

    let path = format!("{}/baselines/{}/systems", API_PREFIX, baseline_id);
    let response = list_common::<BaselineSystemRow>(
        state.lists.as_ref(),
        &request,
        base_query(account, baseline_id),
        options,
        &path,
        BASELINE_SYSTEMS_TYPE,
    )
    .await?;

    Ok(ApiResponse::success(response))
}
