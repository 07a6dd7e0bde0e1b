use std::fmt;

use futures::future::BoxFuture;

use crate::config;
use crate::database::{DatabaseError, ListStore};

use super::attributes::AttributeRegistry;
use super::error::RegistryError;
use super::list_filter::ListFilter;
use super::list_order::ListOrder;
use super::list_query::ListQuery;
use super::types::{AttrKind, Attribute, FilterClause, SortSpec};

/// Strategy a resource uses to count the rows matching a composed query.
/// It receives the filtered query; any page window on it must be ignored.
pub type TotalCounter =
    for<'a> fn(&'a dyn ListStore, &'a ListQuery) -> BoxFuture<'a, Result<i64, DatabaseError>>;

/// Plain `COUNT(*)` over the filtered query.
pub fn count_rows<'a>(
    store: &'a dyn ListStore,
    query: &'a ListQuery,
) -> BoxFuture<'a, Result<i64, DatabaseError>> {
    store.count(query)
}

/// Per-resource listing configuration. Owned by the resource and only ever
/// read by the engine.
pub struct ListOptions {
    registry: AttributeRegistry,
    default_filters: Vec<FilterClause>,
    default_sort: Vec<SortSpec>,
    tie_break: Attribute,
    search_fields: Vec<Attribute>,
    default_limit: Option<i64>,
    total: TotalCounter,
}

impl ListOptions {
    pub fn builder(fields: &'static [Attribute]) -> ListOptionsBuilder {
        ListOptionsBuilder {
            fields,
            default_filters: vec![],
            default_sort: "",
            tie_break: "id",
            search_fields: vec![],
            default_limit: None,
            total: count_rows,
        }
    }

    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    pub fn default_filters(&self) -> &[FilterClause] {
        &self.default_filters
    }

    pub fn default_sort(&self) -> &[SortSpec] {
        &self.default_sort
    }

    pub fn tie_break(&self) -> &Attribute {
        &self.tie_break
    }

    pub fn search_fields(&self) -> &[Attribute] {
        &self.search_fields
    }

    pub fn default_limit(&self) -> i64 {
        self.default_limit.unwrap_or(config::config().list.default_limit)
    }

    pub fn total_counter(&self) -> TotalCounter {
        self.total
    }
}

impl fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListOptions")
            .field("registry", &self.registry)
            .field("default_filters", &self.default_filters)
            .field("default_sort", &self.default_sort)
            .field("tie_break", &self.tie_break.name)
            .field("search_fields", &self.search_fields)
            .field("default_limit", &self.default_limit)
            .finish_non_exhaustive()
    }
}

pub struct ListOptionsBuilder {
    fields: &'static [Attribute],
    default_filters: Vec<(&'static str, &'static str)>,
    default_sort: &'static str,
    tie_break: &'static str,
    search_fields: Vec<&'static str>,
    default_limit: Option<i64>,
    total: TotalCounter,
}

impl ListOptionsBuilder {
    /// Always-applied filter, written in the same grammar as `filter[name]=value`.
    pub fn default_filter(mut self, name: &'static str, value: &'static str) -> Self {
        self.default_filters.push((name, value));
        self
    }

    pub fn default_sort(mut self, sort: &'static str) -> Self {
        self.default_sort = sort;
        self
    }

    pub fn tie_break(mut self, name: &'static str) -> Self {
        self.tie_break = name;
        self
    }

    pub fn search_fields(mut self, names: &[&'static str]) -> Self {
        self.search_fields = names.to_vec();
        self
    }

    pub fn default_limit(mut self, limit: i64) -> Self {
        self.default_limit = Some(limit);
        self
    }

    pub fn total(mut self, counter: TotalCounter) -> Self {
        self.total = counter;
        self
    }

    pub fn build(self) -> Result<ListOptions, RegistryError> {
        let registry = AttributeRegistry::new(self.fields)?;

        let mut default_filters = Vec::with_capacity(self.default_filters.len());
        for (name, raw) in self.default_filters {
            let attr = registry
                .lookup(name)
                .ok_or_else(|| RegistryError::UnknownAttribute { context: "default filter", name: name.to_string() })?;
            let clause = ListFilter::parse_clause(attr, &[raw])
                .map_err(|e| RegistryError::InvalidDefaultFilter { field: name, reason: e.to_string() })?;
            default_filters.push(clause);
        }

        for key in self.default_sort.split(',').map(str::trim).filter(|k| !k.is_empty()) {
            let name = key.strip_prefix('-').unwrap_or(key);
            if registry.lookup(name).is_none() {
                return Err(RegistryError::UnknownAttribute { context: "default sort", name: name.to_string() });
            }
        }
        let default_sort = ListOrder::parse(self.default_sort, &registry)
            .map_err(|_| RegistryError::NotSortable(self.default_sort.to_string()))?;

        let tie_break = registry
            .lookup(self.tie_break)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownAttribute { context: "tie-break", name: self.tie_break.to_string() })?;

        let mut search_fields = Vec::with_capacity(self.search_fields.len());
        for name in self.search_fields {
            let attr = registry
                .lookup(name)
                .ok_or_else(|| RegistryError::UnknownAttribute { context: "search", name: name.to_string() })?;
            if attr.kind != AttrKind::Text {
                return Err(RegistryError::NotSearchable(name));
            }
            search_fields.push(attr.clone());
        }

        Ok(ListOptions {
            registry,
            default_filters,
            default_sort,
            tie_break,
            search_fields,
            default_limit: self.default_limit,
            total: self.total,
        })
    }
}
