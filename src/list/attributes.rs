use std::collections::HashSet;

use super::error::RegistryError;
use super::types::Attribute;

/// Immutable table of the attributes a resource exposes to listing.
///
/// Built once at start-up from static declarations; lookups are read-only and
/// safe to share across request workers.
#[derive(Debug, Clone)]
pub struct AttributeRegistry {
    attrs: Vec<Attribute>,
}

impl AttributeRegistry {
    pub fn new(fields: &[Attribute]) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for field in fields {
            Self::validate_name(field.name)?;
            if !seen.insert(field.name) {
                return Err(RegistryError::DuplicateAttribute(field.name));
            }
        }
        Ok(Self { attrs: fields.to_vec() })
    }

    pub fn lookup(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// `(name, expr)` pairs in declaration order, used to build the select list.
    pub fn select_expressions(&self) -> Vec<(&'static str, &'static str)> {
        self.attrs.iter().map(|a| (a.name, a.expr)).collect()
    }

    // Names end up quoted as JSON keys in generated SQL.
    fn validate_name(name: &'static str) -> Result<(), RegistryError> {
        let mut chars = name.chars();
        let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(RegistryError::InvalidAttributeName(name));
        }
        Ok(())
    }
}
