use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Value kind of an attribute; drives how filter values are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Text,
    Integer,
    Boolean,
    Uuid,
}

/// Maps an externally visible field name to its pre-declared query expression.
///
/// Both strings are `'static`: descriptors only ever come from declarations in
/// the code, never from request input.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: &'static str,
    pub expr: &'static str,
    pub kind: AttrKind,
    pub sortable: bool,
    pub filterable: bool,
}

impl Attribute {
    const fn new(name: &'static str, expr: &'static str, kind: AttrKind) -> Self {
        Self { name, expr, kind, sortable: true, filterable: true }
    }

    pub const fn text(name: &'static str, expr: &'static str) -> Self {
        Self::new(name, expr, AttrKind::Text)
    }

    pub const fn integer(name: &'static str, expr: &'static str) -> Self {
        Self::new(name, expr, AttrKind::Integer)
    }

    pub const fn boolean(name: &'static str, expr: &'static str) -> Self {
        Self::new(name, expr, AttrKind::Boolean)
    }

    pub const fn uuid(name: &'static str, expr: &'static str) -> Self {
        Self::new(name, expr, AttrKind::Uuid)
    }

    pub const fn unsortable(self) -> Self {
        Self { sortable: false, ..self }
    }

    /// Selected and usable in default filters, but hidden from request filters and sorting.
    pub const fn internal(self) -> Self {
        Self { sortable: false, filterable: false, ..self }
    }
}

/// Typed literal bound as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Uuid(Uuid),
}

impl Literal {
    pub fn to_json(&self) -> Value {
        match self {
            Literal::Text(s) => Value::String(s.clone()),
            Literal::Integer(i) => Value::from(*i),
            Literal::Boolean(b) => Value::Bool(*b),
            Literal::Uuid(u) => Value::String(u.hyphenated().to_string()),
        }
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Integer(v.into())
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Integer(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Boolean(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Text(v.to_string())
    }
}

impl From<Uuid> for Literal {
    fn from(v: Uuid) -> Self {
        Literal::Uuid(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Lt,
    In,
    Contains,
}

impl FilterOp {
    /// Explicit operator prefixes accepted in `filter[field]=op:value`.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "eq" => Some(FilterOp::Eq),
            "neq" => Some(FilterOp::Neq),
            "gt" => Some(FilterOp::Gt),
            "lt" => Some(FilterOp::Lt),
            "in" => Some(FilterOp::In),
            _ => None,
        }
    }
}

/// Operator and typed value(s) of a filter clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Compare(CompareOp, Literal),
    In(Vec<Literal>),
    Contains(String),
}

/// A validated filter on one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub field: Attribute,
    pub value: FilterValue,
}

impl FilterClause {
    pub fn op(&self) -> FilterOp {
        match &self.value {
            FilterValue::Compare(CompareOp::Eq, _) => FilterOp::Eq,
            FilterValue::Compare(CompareOp::Neq, _) => FilterOp::Neq,
            FilterValue::Compare(CompareOp::Gt, _) => FilterOp::Gt,
            FilterValue::Compare(CompareOp::Lt, _) => FilterOp::Lt,
            FilterValue::In(_) => FilterOp::In,
            FilterValue::Contains(_) => FilterOp::Contains,
        }
    }

    pub fn to_condition(&self) -> Condition {
        let expr = self.field.expr;
        match &self.value {
            FilterValue::Compare(op, value) => Condition::Compare { expr, op: *op, value: value.clone() },
            FilterValue::In(values) => Condition::In { expr, values: values.clone() },
            FilterValue::Contains(needle) => Condition::Contains { expr, needle: needle.clone() },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Lt,
}

impl CompareOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "<>",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }
}

/// Storage-independent predicate. Every `expr` is a declared attribute or
/// scoping expression; user input only ever appears in the literals.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare { expr: &'static str, op: CompareOp, value: Literal },
    In { expr: &'static str, values: Vec<Literal> },
    /// Case-insensitive substring match.
    Contains { expr: &'static str, needle: String },
    AnyOf(Vec<Condition>),
}

impl Condition {
    pub fn eq(expr: &'static str, value: impl Into<Literal>) -> Self {
        Condition::Compare { expr, op: CompareOp::Eq, value: value.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: Attribute,
    pub direction: SortDirection,
}

/// Upper bound of a page; `Unbounded` is requested with `limit=-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Bounded(i64),
    Unbounded,
}

impl Limit {
    pub fn as_param(&self) -> i64 {
        match self {
            Limit::Bounded(l) => *l,
            Limit::Unbounded => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: Limit,
    pub offset: i64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self { limit: Limit::Unbounded, offset: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Links {
    pub first: Option<String>,
    pub last: Option<String>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Literal>,
}
