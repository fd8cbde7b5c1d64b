//! SQL assembly for the mapper
//!
//! Statements are built as text with positional `?` placeholders and an
//! argument list in placeholder order. Only identifiers derived from schema
//! names and caller-supplied clause fragments are spliced into the text;
//! values always travel as arguments.

use crate::{database::plan::ColumnPlan, value::Value};

/// Kind of a registered join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    LeftOuter,
}

impl JoinKind {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
        }
    }
}

/// One additional table brought into a SELECT
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    /// Relation field on the base entity the joined row is hydrated into
    pub relation: &'static str,
    pub table: String,
    /// Column present on both tables
    pub join_column: String,
    /// Extra condition appended to the ON clause with `AND`
    pub clause: Option<String>,
    pub args: Vec<Value>,
}

impl Join {
    fn write_sql(&self, base_table: &str, sql: &mut String) {
        sql.push(' ');
        sql.push_str(self.kind.as_sql());
        sql.push(' ');
        sql.push_str(&self.table);
        sql.push_str(&format!(
            " ON {base_table}.{col} = {table}.{col}",
            col = self.join_column,
            table = self.table
        ));
        if let Some(clause) = &self.clause {
            sql.push_str(" AND ");
            sql.push_str(clause);
        }
    }
}

/// Equality conditions rendered as a WHERE clause
///
/// A null value renders as `COLUMN IS NULL` and takes no argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    conditions: Vec<(String, Value)>,
}

impl ConditionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: String, value: Value) {
        self.conditions.push((column, value));
    }

    #[must_use]
    pub fn as_slice(&self) -> &[(String, Value)] {
        &self.conditions
    }

    /// Render as clause text and its arguments; `None` when there are no
    /// conditions
    #[must_use]
    pub fn to_clause(&self) -> Option<(String, Vec<Value>)> {
        if self.conditions.is_empty() {
            return None;
        }

        let mut parts = Vec::with_capacity(self.conditions.len());
        let mut args = Vec::new();
        for (column, value) in &self.conditions {
            if value.is_null() {
                parts.push(format!("{column} IS NULL"));
            } else {
                parts.push(format!("{column} = ?"));
                args.push(value.clone());
            }
        }
        Some((parts.join(" AND "), args))
    }
}

/// A complete SELECT, ready to run
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Parts of a SELECT other than the projection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectClauses {
    pub where_clause: Option<(String, Vec<Value>)>,
    pub group_by: Option<String>,
    pub having: Option<String>,
    pub order_by: Option<String>,
}

fn non_empty(clause: Option<&str>) -> Option<&str> {
    clause.filter(|c| !c.is_empty())
}

/// Assemble a SELECT from a column plan and its joins
///
/// Join arguments precede WHERE arguments, matching their position in the
/// statement text. HAVING is only written together with GROUP BY. An empty
/// clause counts as unset; an empty WHERE drops its arguments too.
#[must_use]
pub fn build_select(
    base_table: &str,
    plan: &ColumnPlan,
    joins: &[Join],
    clauses: &SelectClauses,
) -> SelectStatement {
    let mut from = base_table.to_string();
    let mut args = Vec::new();
    for join in joins {
        join.write_sql(base_table, &mut from);
        args.extend(join.args.iter().cloned());
    }

    let mut sql = format!("SELECT {} FROM {from}", plan.projection());

    let where_clause = clauses.where_clause.as_ref().filter(|(c, _)| !c.is_empty());
    if let Some((clause, where_args)) = where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
        args.extend(where_args.iter().cloned());
    }
    if let Some(group_by) = non_empty(clauses.group_by.as_deref()) {
        sql.push_str(" GROUP BY ");
        sql.push_str(group_by);
        if let Some(having) = non_empty(clauses.having.as_deref()) {
            sql.push_str(" HAVING ");
            sql.push_str(having);
        }
    }
    if let Some(order_by) = non_empty(clauses.order_by.as_deref()) {
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
    }

    SelectStatement { sql, args }
}

/// `INSERT INTO T (A, B) VALUES (?, ?)`
#[must_use]
pub fn build_insert(table: &str, values: &[(String, Value)]) -> String {
    let columns: Vec<&str> = values.iter().map(|(c, _)| c.as_str()).collect();
    let placeholders = vec!["?"; values.len()];
    format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// `UPDATE T SET A = ?, B = ?` with an optional WHERE clause
#[must_use]
pub fn build_update(table: &str, values: &[(String, Value)], where_clause: Option<&str>) -> String {
    let assignments: Vec<String> = values.iter().map(|(c, _)| format!("{c} = ?")).collect();
    let mut sql = format!("UPDATE {table} SET {}", assignments.join(", "));
    if let Some(clause) = where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }
    sql
}

/// `DELETE FROM T WHERE ...`
#[must_use]
pub fn build_delete(table: &str, where_clause: &str) -> String {
    format!("DELETE FROM {table} WHERE {where_clause}")
}
