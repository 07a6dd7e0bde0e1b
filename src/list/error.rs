use thiserror::Error;

use crate::database::DatabaseError;

/// Failures raised while turning request parameters into a list response.
///
/// The first violation found aborts query construction; nothing is accumulated.
#[derive(Error, Debug)]
pub enum ListError {
    #[error("unknown filter field: {0}")]
    UnknownFilterField(String),

    #[error("invalid value for filter[{field}]: {reason}")]
    InvalidFilterValue { field: String, reason: String },

    #[error("invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("{0}")]
    ParentResourceNotFound(String),

    #[error("storage failure: {0}")]
    StorageFailure(#[from] DatabaseError),
}

impl ListError {
    pub(crate) fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        ListError::InvalidFilterValue { field: field.to_string(), reason: reason.into() }
    }
}

/// Malformed resource declarations. These are programming errors and are
/// reported once at start-up, never per request.
#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("duplicate attribute name: {0}")]
    DuplicateAttribute(&'static str),

    #[error("invalid attribute name: {0}")]
    InvalidAttributeName(&'static str),

    #[error("unknown attribute referenced in {context}: {name}")]
    UnknownAttribute { context: &'static str, name: String },

    #[error("attribute {0} cannot be used for sorting")]
    NotSortable(String),

    #[error("search field {0} must be a text attribute")]
    NotSearchable(&'static str),

    #[error("invalid default filter on {field}: {reason}")]
    InvalidDefaultFilter { field: &'static str, reason: String },
}
