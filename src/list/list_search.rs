use super::options::ListOptions;
use super::types::Condition;

/// Turns `search=text` into one OR-group of case-insensitive substring matches
/// over the resource's search fields. Empty text contributes nothing.
pub struct ListSearch;

impl ListSearch {
    pub fn resolve(raw: Option<&str>, options: &ListOptions) -> Option<Condition> {
        let text = raw.map(str::trim).filter(|s| !s.is_empty())?;
        if options.search_fields().is_empty() {
            return None;
        }
        let group = options
            .search_fields()
            .iter()
            .map(|attr| Condition::Contains { expr: attr.expr, needle: text.to_string() })
            .collect();
        Some(Condition::AnyOf(group))
    }
}
