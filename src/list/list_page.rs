use url::form_urlencoded;

use super::error::ListError;
use super::params::ListParams;
use super::types::{Limit, Links, ListMeta, PageWindow};

/// Sentinel `limit` value requesting every matching row.
pub const UNBOUNDED_LIMIT: i64 = -1;

impl PageWindow {
    /// Reads `limit` and `offset`. Values are never clamped: anything out of
    /// range is rejected.
    pub fn resolve(params: &ListParams, default_limit: i64) -> Result<Self, ListError> {
        let limit = match params.get("limit") {
            Some(raw) => Self::parse_int("limit", raw)?,
            None => default_limit,
        };
        let limit = match limit {
            UNBOUNDED_LIMIT => Limit::Unbounded,
            l if l >= 0 => Limit::Bounded(l),
            l => return Err(ListError::InvalidPagination(format!("limit must be >= 0 or -1, got {}", l))),
        };

        let offset = match params.get("offset") {
            Some(raw) => Self::parse_int("offset", raw)?,
            None => 0,
        };
        if offset < 0 {
            return Err(ListError::InvalidPagination(format!("offset must be >= 0, got {}", offset)));
        }

        Ok(Self { limit, offset })
    }

    fn parse_int(name: &str, raw: &str) -> Result<i64, ListError> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| ListError::InvalidPagination(format!("{} must be an integer, got '{}'", name, raw)))
    }

    pub fn meta(&self, total: i64) -> ListMeta {
        ListMeta { total, limit: self.limit.as_param(), offset: self.offset }
    }

    /// Page links for `path`, carrying the request's filter, sort and search
    /// parameters.
    pub fn links(&self, total: i64, path: &str, carried: &[(&str, &str)]) -> Links {
        let link = |offset: i64| Self::link(path, carried, offset, self.limit.as_param());
        match self.limit {
            Limit::Unbounded => Links { first: Some(link(0)), last: None, next: None, previous: None },
            Limit::Bounded(0) => Links { first: Some(link(0)), last: Some(link(0)), next: None, previous: None },
            Limit::Bounded(limit) => {
                let last = if total > 0 { ((total - 1) / limit) * limit } else { 0 };
                let next = self.offset.checked_add(limit).filter(|n| *n < total);
                let previous = self.offset - limit;
                Links {
                    first: Some(link(0)),
                    last: Some(link(last)),
                    next: next.map(link),
                    previous: (previous >= 0).then(|| link(previous)),
                }
            }
        }
    }

    fn link(path: &str, carried: &[(&str, &str)], offset: i64, limit: i64) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in carried {
            query.append_pair(key, value);
        }
        query.append_pair("offset", &offset.to_string());
        query.append_pair("limit", &limit.to_string());
        format!("{}?{}", path, query.finish())
    }
}
