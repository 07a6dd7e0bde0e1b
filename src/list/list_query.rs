use super::types::{Condition, Limit, Literal, PageWindow, SortSpec, SqlResult};

/// Resource base query supplied by a controller: source table, joins and the
/// mandatory scoping predicates (tenant, parent resource).
#[derive(Debug, Clone)]
pub struct BaseQuery {
    from: &'static str,
    joins: Vec<&'static str>,
    scope: Vec<Condition>,
}

impl BaseQuery {
    pub fn new(from: &'static str) -> Self {
        Self { from, joins: vec![], scope: vec![] }
    }

    pub fn join(mut self, join: &'static str) -> Self {
        self.joins.push(join);
        self
    }

    pub fn scope(mut self, condition: Condition) -> Self {
        self.scope.push(condition);
        self
    }

    pub fn scope_eq(self, expr: &'static str, value: impl Into<Literal>) -> Self {
        self.scope(Condition::eq(expr, value))
    }

    /// Unordered, unbounded query with no select list; enough for counting.
    pub fn into_query(self) -> ListQuery {
        ListQuery {
            base: self,
            select: vec![],
            filters: vec![],
            order: vec![],
            window: PageWindow::default(),
        }
    }
}

/// Fully composed list query: base query AND filters AND search, ordered and
/// windowed. Storage backends render or evaluate it; it never carries raw
/// request text outside of literals.
#[derive(Debug, Clone)]
pub struct ListQuery {
    base: BaseQuery,
    select: Vec<(&'static str, &'static str)>,
    filters: Vec<Condition>,
    order: Vec<SortSpec>,
    window: PageWindow,
}

impl ListQuery {
    pub fn compose(
        base: BaseQuery,
        select: Vec<(&'static str, &'static str)>,
        filters: Vec<Condition>,
        order: Vec<SortSpec>,
        window: PageWindow,
    ) -> Self {
        Self { base, select, filters, order, window }
    }

    pub fn from(&self) -> &'static str {
        self.base.from
    }

    pub fn select(&self) -> &[(&'static str, &'static str)] {
        &self.select
    }

    /// Scoping predicates followed by filter and search predicates.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.base.scope.iter().chain(self.filters.iter())
    }

    pub fn order(&self) -> &[SortSpec] {
        &self.order
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Rows as one `jsonb` object each, keyed by attribute name.
    pub fn to_sql(&self) -> SqlResult {
        let mut writer = SqlWriter::default();
        let mut parts = vec![
            format!("SELECT {} AS row", self.build_select()),
            self.build_from(),
        ];
        if let Some(where_clause) = self.build_where(&mut writer) {
            parts.push(format!("WHERE {}", where_clause));
        }
        if !self.order.is_empty() {
            let order: Vec<String> = self
                .order
                .iter()
                .map(|s| format!("{} {}", s.field.expr, s.direction.to_sql()))
                .collect();
            parts.push(format!("ORDER BY {}", order.join(", ")));
        }
        if let Limit::Bounded(limit) = self.window.limit {
            let p = writer.param(Literal::Integer(limit));
            parts.push(format!("LIMIT {}", p));
        }
        if self.window.offset > 0 {
            let p = writer.param(Literal::Integer(self.window.offset));
            parts.push(format!("OFFSET {}", p));
        }
        SqlResult { query: parts.join(" "), params: writer.params }
    }

    /// Same predicates as `to_sql`, without ordering or window.
    pub fn to_count_sql(&self) -> SqlResult {
        let mut writer = SqlWriter::default();
        let mut query = format!("SELECT COUNT(*) AS count {}", self.build_from());
        if let Some(where_clause) = self.build_where(&mut writer) {
            query.push_str(&format!(" WHERE {}", where_clause));
        }
        SqlResult { query, params: writer.params }
    }

    fn build_select(&self) -> String {
        let pairs: Vec<String> = self
            .select
            .iter()
            .map(|(name, expr)| format!("'{}', {}", name, expr))
            .collect();
        format!("jsonb_build_object({})", pairs.join(", "))
    }

    fn build_from(&self) -> String {
        let mut from = format!("FROM {}", self.base.from);
        for join in &self.base.joins {
            from.push(' ');
            from.push_str(join);
        }
        from
    }

    fn build_where(&self, writer: &mut SqlWriter) -> Option<String> {
        let conditions: Vec<String> = self.conditions().map(|c| writer.condition(c)).collect();
        if conditions.is_empty() {
            None
        } else {
            Some(conditions.join(" AND "))
        }
    }
}

/// Accumulates positional parameters while rendering predicates.
#[derive(Default)]
struct SqlWriter {
    params: Vec<Literal>,
}

impl SqlWriter {
    fn param(&mut self, value: Literal) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    fn condition(&mut self, condition: &Condition) -> String {
        match condition {
            Condition::Compare { expr, op, value } => {
                format!("{} {} {}", expr, op.to_sql(), self.param(value.clone()))
            }
            Condition::In { expr, values } => {
                if values.is_empty() {
                    return "1=0".to_string();
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                format!("{} IN ({})", expr, params.join(", "))
            }
            Condition::Contains { expr, needle } => {
                let pattern = format!("%{}%", escape_like(needle));
                format!("{}::text ILIKE {}", expr, self.param(Literal::Text(pattern)))
            }
            Condition::AnyOf(group) => {
                if group.is_empty() {
                    return "1=0".to_string();
                }
                let parts: Vec<String> = group.iter().map(|c| self.condition(c)).collect();
                format!("({})", parts.join(" OR "))
            }
        }
    }
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
