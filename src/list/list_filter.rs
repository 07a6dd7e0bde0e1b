use uuid::Uuid;

use super::error::ListError;
use super::options::ListOptions;
use super::params::ListParams;
use super::types::{AttrKind, Attribute, CompareOp, FilterClause, FilterOp, FilterValue, Literal};

/// Resolves `filter[field]=value` parameters against a resource's registry.
///
/// Grammar of one field's values:
/// - optional operator prefix `eq:`, `neq:`, `gt:`, `lt:`, `in:`
/// - repeated keys and comma-separated values are merged into one list;
///   several values mean `in`, one value means `eq`
/// - `*text*` is a case-insensitive substring match on text fields
pub struct ListFilter;

impl ListFilter {
    /// Default filters first, then request filters grouped by field in the order
    /// the fields first appear. All clauses are ANDed.
    pub fn resolve(params: &ListParams, options: &ListOptions) -> Result<Vec<FilterClause>, ListError> {
        let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
        for (key, value) in params.filter_entries() {
            let name = Self::field_name(key)?;
            match grouped.iter_mut().find(|(n, _)| *n == name) {
                Some((_, values)) => values.push(value),
                None => grouped.push((name, vec![value])),
            }
        }

        let mut clauses = options.default_filters().to_vec();
        for (name, raws) in grouped {
            let attr = options
                .registry()
                .lookup(name)
                .filter(|a| a.filterable)
                .ok_or_else(|| ListError::UnknownFilterField(name.to_string()))?;
            clauses.push(Self::parse_clause(attr, &raws)?);
        }
        Ok(clauses)
    }

    fn field_name(key: &str) -> Result<&str, ListError> {
        key.strip_prefix("filter[")
            .and_then(|rest| rest.strip_suffix(']'))
            .filter(|name| !name.is_empty() && !name.contains(|c| c == '[' || c == ']'))
            .ok_or_else(|| ListError::UnknownFilterField(key.to_string()))
    }

    /// Builds one clause from every raw value given for `attr`.
    pub(crate) fn parse_clause(attr: &Attribute, raws: &[&str]) -> Result<FilterClause, ListError> {
        let field = attr.name;
        let mut explicit: Option<FilterOp> = None;
        let mut bodies = Vec::with_capacity(raws.len());
        for raw in raws {
            let (op, body) = Self::split_operator(raw);
            if let Some(op) = op {
                if explicit.is_some_and(|prev| prev != op) {
                    return Err(ListError::invalid_value(field, "conflicting operators"));
                }
                explicit = Some(op);
            }
            bodies.push(body);
        }

        if explicit.is_none() && bodies.len() == 1 && !bodies[0].contains(',') {
            if let Some(needle) = Self::wildcard(bodies[0]) {
                if attr.kind != AttrKind::Text {
                    return Err(ListError::invalid_value(field, "substring match is only supported on text fields"));
                }
                if needle.is_empty() {
                    return Err(ListError::invalid_value(field, "empty substring"));
                }
                return Ok(FilterClause { field: attr.clone(), value: FilterValue::Contains(needle.to_string()) });
            }
        }

        let mut values: Vec<Literal> = Vec::new();
        for body in bodies {
            for piece in body.split(',') {
                let piece = piece.trim();
                if piece.is_empty() {
                    return Err(ListError::invalid_value(field, "empty value"));
                }
                if Self::wildcard(piece).is_some() {
                    return Err(ListError::invalid_value(field, "substring match takes a single value and no operator"));
                }
                let literal = Self::parse_literal(attr, piece)?;
                if !values.contains(&literal) {
                    values.push(literal);
                }
            }
        }

        let op = explicit.unwrap_or(if values.len() > 1 { FilterOp::In } else { FilterOp::Eq });
        let value = match op {
            FilterOp::In => FilterValue::In(values),
            FilterOp::Contains => return Err(ListError::invalid_value(field, "unsupported operator")),
            FilterOp::Eq | FilterOp::Neq | FilterOp::Gt | FilterOp::Lt => {
                if values.len() != 1 {
                    return Err(ListError::invalid_value(field, "operator accepts a single value"));
                }
                let ordered = matches!(op, FilterOp::Gt | FilterOp::Lt);
                if ordered && matches!(attr.kind, AttrKind::Boolean | AttrKind::Uuid) {
                    return Err(ListError::invalid_value(field, "ordering comparison is not supported on this field"));
                }
                let cmp = match op {
                    FilterOp::Neq => CompareOp::Neq,
                    FilterOp::Gt => CompareOp::Gt,
                    FilterOp::Lt => CompareOp::Lt,
                    _ => CompareOp::Eq,
                };
                let literal = values.into_iter().next().ok_or_else(|| ListError::invalid_value(field, "empty value"))?;
                FilterValue::Compare(cmp, literal)
            }
        };
        Ok(FilterClause { field: attr.clone(), value })
    }

    fn split_operator(raw: &str) -> (Option<FilterOp>, &str) {
        match raw.split_once(':') {
            Some((prefix, rest)) => match FilterOp::from_prefix(prefix) {
                Some(op) => (Some(op), rest),
                None => (None, raw),
            },
            None => (None, raw),
        }
    }

    fn wildcard(body: &str) -> Option<&str> {
        body.strip_prefix('*').and_then(|b| b.strip_suffix('*'))
    }

    fn parse_literal(attr: &Attribute, piece: &str) -> Result<Literal, ListError> {
        match attr.kind {
            AttrKind::Text => Ok(Literal::Text(piece.to_string())),
            AttrKind::Integer => piece
                .parse::<i64>()
                .map(Literal::Integer)
                .map_err(|_| ListError::invalid_value(attr.name, format!("'{}' is not an integer", piece))),
            AttrKind::Boolean => match piece.to_ascii_lowercase().as_str() {
                "true" => Ok(Literal::Boolean(true)),
                "false" => Ok(Literal::Boolean(false)),
                _ => Err(ListError::invalid_value(attr.name, format!("'{}' is not a boolean", piece))),
            },
            AttrKind::Uuid => Uuid::parse_str(piece)
                .map(Literal::Uuid)
                .map_err(|_| ListError::invalid_value(attr.name, format!("'{}' is not a valid UUID", piece))),
        }
    }
}
