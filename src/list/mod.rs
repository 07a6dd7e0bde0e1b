//! Declarative resource listing: turns `filter[...]`, `sort`, `search`,
//! `limit` and `offset` parameters into a validated query and a
//! `{data, links, meta}` response.

pub mod attributes;
pub mod envelope;
pub mod error;
pub mod list_common;
pub mod list_filter;
pub mod list_order;
pub mod list_page;
pub mod list_query;
pub mod list_search;
pub mod options;
pub mod params;
pub mod types;

pub use attributes::AttributeRegistry;
pub use envelope::{build_envelope, Item, ListResponse, ListRow};
pub use error::{ListError, RegistryError};
pub use list_common::{list_common, ListRequest};
pub use list_query::{BaseQuery, ListQuery};
pub use options::{count_rows, ListOptions, TotalCounter};
pub use params::ListParams;
pub use types::*;
