use serde_json::Value;

use crate::config;
use crate::database::{DatabaseError, ListStore};

use super::envelope::{build_envelope, ListRow, ListResponse};
use super::error::ListError;
use super::list_filter::ListFilter;
use super::list_order::ListOrder;
use super::list_query::{BaseQuery, ListQuery};
use super::list_search::ListSearch;
use super::options::ListOptions;
use super::params::ListParams;
use super::types::{Condition, FilterClause, PageWindow, SortSpec};

/// Validated list request. Resolving touches no storage, so a bad request is
/// rejected before any query runs.
#[derive(Debug, Clone)]
pub struct ListRequest {
    filters: Vec<FilterClause>,
    search: Option<Condition>,
    order: Vec<SortSpec>,
    window: PageWindow,
    carried: Vec<(String, String)>,
}

impl ListRequest {
    pub fn resolve(params: &ListParams, options: &ListOptions) -> Result<Self, ListError> {
        let filters = ListFilter::resolve(params, options)?;
        let order = ListOrder::resolve(params.get("sort"), options)?;
        let search = ListSearch::resolve(params.get("search"), options);
        let window = PageWindow::resolve(params, options.default_limit())?;
        let carried = params
            .carried()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Ok(Self { filters, search, order, window, carried })
    }

    /// Base query AND filter clauses AND the search group.
    pub fn compose(&self, base: BaseQuery, options: &ListOptions) -> ListQuery {
        let mut conditions: Vec<Condition> = self.filters.iter().map(FilterClause::to_condition).collect();
        conditions.extend(self.search.clone());
        ListQuery::compose(
            base,
            options.registry().select_expressions(),
            conditions,
            self.order.clone(),
            self.window,
        )
    }
}

/// Runs a resolved list request against `store` and wraps the rows into the
/// standard envelope. Count and fetch are independent reads and run together.
pub async fn list_common<R: ListRow>(
    store: &dyn ListStore,
    request: &ListRequest,
    base: BaseQuery,
    options: &ListOptions,
    path: &str,
    resource_type: &'static str,
) -> Result<ListResponse<R::Attributes>, ListError> {
    let query = request.compose(base, options);
    if config::config().list.debug_logging {
        tracing::debug!(resource = resource_type, sql = %query.to_sql().query, "composed list query");
    }

    let counter = options.total_counter();
    let (total, rows) = tokio::try_join!(counter(store, &query), store.fetch(&query))?;

    let rows = rows
        .into_iter()
        .map(|row| {
            serde_json::from_value::<R>(Value::Object(row)).map_err(|e| DatabaseError::RowDecode(e.to_string()))
        })
        .collect::<Result<Vec<R>, _>>()?;

    let carried: Vec<(&str, &str)> = request.carried.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let links = request.window.links(total, path, &carried);
    let meta = request.window.meta(total);
    Ok(build_envelope(rows, resource_type, links, meta))
}
