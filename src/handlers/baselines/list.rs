use axum::extract::{Extension, RawQuery, State};
use serde::{Deserialize, Serialize};

use crate::list::{count_rows, list_common, Attribute, BaseQuery, ListOptions, ListParams, ListRequest, ListResponse, ListRow, RegistryError};
use crate::middleware::{Account, ApiResponse, ApiResult};
use crate::router::API_PREFIX;
use crate::state::AppState;

pub const BASELINES_TYPE: &str = "baseline";

/// Non-stale systems currently attached to the baseline.
pub const SYSTEMS_COUNT_EXPR: &str = "(SELECT COUNT(*) FROM system_platform sp \
     WHERE sp.baseline_id = bl.id AND sp.rh_account_id = bl.rh_account_id AND sp.stale = false)";

pub const BASELINE_FIELDS: &[Attribute] = &[
    Attribute::integer("id", "bl.id"),
    Attribute::text("name", "bl.name"),
    Attribute::text("description", "bl.description"),
    Attribute::integer("systems", SYSTEMS_COUNT_EXPR),
];

pub fn options() -> Result<ListOptions, RegistryError> {
    ListOptions::builder(BASELINE_FIELDS)
        .default_sort("name")
        .tie_break("id")
        .search_fields(&["name", "description"])
        .total(count_rows)
        .build()
}

#[derive(Debug, Deserialize)]
pub struct BaselineRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub systems: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineAttributes {
    pub name: String,
    pub description: Option<String>,
    pub systems: i64,
}

impl ListRow for BaselineRow {
    type Attributes = BaselineAttributes;

    fn into_item(self) -> (String, BaselineAttributes) {
        let attributes = BaselineAttributes {
            name: self.name,
            description: self.description,
            systems: self.systems,
        };
        (self.id.to_string(), attributes)
    }
}

fn base_query(account: Account) -> BaseQuery {
    BaseQuery::new("baseline AS bl").scope_eq("bl.rh_account_id", account.0)
}

/// GET /api/patch/v1/baselines - baselines of the calling account
pub async fn list(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    RawQuery(query): RawQuery,
) -> ApiResult<ListResponse<BaselineAttributes>> {
    let options = &state.resources.baselines;
    let params = ListParams::parse(query.as_deref());
    let request = ListRequest::resolve(&params, options)?;

    let path = format!("{}/baselines", API_PREFIX);
    let response = list_common::<BaselineRow>(
        state.lists.as_ref(),
        &request,
        base_query(account),
        options,
        &path,
        BASELINES_TYPE,
    )
    .await?;

    Ok(ApiResponse::success(response))
}
