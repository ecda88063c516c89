//! Renders a [`PredicateSet`] into a PostgreSQL WHERE clause.
//!
//! Placeholders are numbered `$1..$n` in predicate order and the bind values
//! are kept in that same order, so a query built from [`SqlFilter`] can be
//! bound with [`SqlFilter::bind_query_as`] / [`SqlFilter::bind_scalar`]
//! followed by any trailing parameters (`LIMIT`, `OFFSET`) starting at
//! [`SqlFilter::next_index`].

use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;
use todolist_core::criteria::{CriterionValue, Operator, PredicateSet, TodoField};
use todolist_core::pagination::{Direction, Sort};
use todolist_core::types::Date;

/// Typed bind value for dynamically-built queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Int(i32),
    Text(String),
    Date(Date),
}

/// WHERE clause and bind values for one predicate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFilter {
    where_clause: String,
    binds: Vec<BindValue>,
    next_index: u32,
}

impl SqlFilter {
    /// Build the WHERE clause for `set`.
    ///
    /// The clause is empty when the set has no predicates, otherwise it
    /// starts with `WHERE ` and joins every predicate with `AND`.
    pub fn from_predicates(set: &PredicateSet) -> Self {
        let mut conditions: Vec<String> = Vec::with_capacity(set.len());
        let mut binds: Vec<BindValue> = Vec::with_capacity(set.len());
        let mut bind_idx = 1u32;

        for predicate in set.predicates() {
            let column = predicate.field.column();
            let condition = match predicate.op {
                Operator::Eq => format!("{column} = ${bind_idx}"),
                Operator::Gte => format!("{column} >= ${bind_idx}"),
                Operator::Lte => format!("{column} <= ${bind_idx}"),
                Operator::Contains => format!("{column} LIKE ${bind_idx} ESCAPE '\\'"),
            };
            conditions.push(condition);
            bind_idx += 1;

            let value = match (&predicate.op, &predicate.value) {
                (Operator::Contains, CriterionValue::Text(s)) => {
                    BindValue::Text(format!("%{}%", escape_like(s)))
                }
                (_, CriterionValue::Int(v)) => BindValue::Int(*v),
                (_, CriterionValue::Text(s)) => BindValue::Text(s.clone()),
                (_, CriterionValue::Date(d)) => BindValue::Date(*d),
            };
            binds.push(value);
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        Self {
            where_clause,
            binds,
            next_index: bind_idx,
        }
    }

    pub fn where_clause(&self) -> &str {
        &self.where_clause
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    /// Placeholder index for the first parameter after the filter values.
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Bind the filter values to a `QueryAs`.
    pub fn bind_query_as<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for val in &self.binds {
            match val {
                BindValue::Int(v) => q = q.bind(*v),
                BindValue::Text(v) => q = q.bind(v.as_str()),
                BindValue::Date(v) => q = q.bind(*v),
            }
        }
        q
    }

    /// Bind the filter values to a `QueryScalar`.
    pub fn bind_scalar<'q, O>(
        &'q self,
        mut q: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> QueryScalar<'q, Postgres, O, PgArguments> {
        for val in &self.binds {
            match val {
                BindValue::Int(v) => q = q.bind(*v),
                BindValue::Text(v) => q = q.bind(v.as_str()),
                BindValue::Date(v) => q = q.bind(*v),
            }
        }
        q
    }
}

/// ORDER BY body for a sort, with `id ASC` as tie-breaker for stable paging.
pub fn order_by(sort: Sort) -> String {
    let primary = format!("{} {}", sort.field.column(), sort.direction.as_sql());
    if sort.field == TodoField::Id {
        primary
    } else {
        format!("{primary}, id {}", Direction::Asc.as_sql())
    }
}

/// Escape `LIKE` metacharacters so the value matches literally.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
