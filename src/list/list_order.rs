use super::attributes::AttributeRegistry;
use super::error::ListError;
use super::options::ListOptions;
use super::types::{Attribute, SortDirection, SortSpec};

/// Resolves the `sort` parameter: comma-separated keys, each an attribute name
/// with an optional leading `-` for descending order.
pub struct ListOrder;

impl ListOrder {
    /// Requested (or default) ordering followed by the resource's tie-break key,
    /// so pages stay reproducible when the primary key has duplicates.
    pub fn resolve(raw: Option<&str>, options: &ListOptions) -> Result<Vec<SortSpec>, ListError> {
        let requested = match raw.map(str::trim) {
            Some(s) if !s.is_empty() => Self::parse(s, options.registry())?,
            _ => options.default_sort().to_vec(),
        };
        Ok(Self::with_tie_break(requested, options.tie_break()))
    }

    pub(crate) fn parse(raw: &str, registry: &AttributeRegistry) -> Result<Vec<SortSpec>, ListError> {
        let mut specs: Vec<SortSpec> = Vec::new();
        for part in raw.split(',') {
            let key = part.trim();
            if key.is_empty() {
                continue;
            }
            let (name, direction) = match key.strip_prefix('-') {
                Some(rest) => (rest, SortDirection::Desc),
                None => (key, SortDirection::Asc),
            };
            let field = registry
                .lookup(name)
                .filter(|a| a.sortable)
                .ok_or_else(|| ListError::InvalidSortField(name.to_string()))?;
            if specs.iter().any(|s| s.field.name == field.name) {
                return Err(ListError::InvalidSortField(format!("{} (repeated)", name)));
            }
            specs.push(SortSpec { field: field.clone(), direction });
        }
        Ok(specs)
    }

    fn with_tie_break(mut specs: Vec<SortSpec>, tie_break: &Attribute) -> Vec<SortSpec> {
        if !specs.iter().any(|s| s.field.name == tie_break.name) {
            specs.push(SortSpec { field: tie_break.clone(), direction: SortDirection::Asc });
        }
        specs
    }
}
