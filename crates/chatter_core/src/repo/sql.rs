//! Compilation of entity-space filters into SQL WHERE clauses.
//!
//! # Invariants
//! - Every captured value becomes a bound parameter; field names are the only
//!   text interpolated, and they come from validated field maps.
//! - Input filters must already be translated to entity column names.

use crate::filter::{CmpOp, Filter, Scalar};
use rusqlite::types::Value;

/// Returns the WHERE clause body and its bind values, in order.
pub(crate) fn compile(filter: &Filter) -> (String, Vec<Value>) {
    let mut clause = String::new();
    let mut binds = Vec::new();
    emit(filter, &mut clause, &mut binds);
    (clause, binds)
}

fn emit(filter: &Filter, clause: &mut String, binds: &mut Vec<Value>) {
    match filter {
        Filter::All => clause.push_str("1 = 1"),
        Filter::Cmp { field, op, value } => {
            clause.push_str(field);
            clause.push_str(match op {
                CmpOp::Eq => " = ?",
                CmpOp::Ne => " <> ?",
                CmpOp::Lt => " < ?",
                CmpOp::Le => " <= ?",
                CmpOp::Gt => " > ?",
                CmpOp::Ge => " >= ?",
            });
            binds.push(scalar_value(value));
        }
        Filter::Contains { field, needle } => {
            clause.push_str(field);
            clause.push_str(" LIKE ? ESCAPE '\\'");
            binds.push(Value::Text(format!("%{}%", escape_like(needle))));
        }
        Filter::And(lhs, rhs) => {
            clause.push('(');
            emit(lhs, clause, binds);
            clause.push_str(" AND ");
            emit(rhs, clause, binds);
            clause.push(')');
        }
        Filter::Or(lhs, rhs) => {
            clause.push('(');
            emit(lhs, clause, binds);
            clause.push_str(" OR ");
            emit(rhs, clause, binds);
            clause.push(')');
        }
        Filter::Not(inner) => {
            clause.push_str("(NOT ");
            emit(inner, clause, binds);
            clause.push(')');
        }
    }
}

fn scalar_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Int(value) => Value::Integer(*value),
        Scalar::Text(value) => Value::Text(value.clone()),
        Scalar::Bool(value) => Value::Integer(i64::from(*value)),
        Scalar::Guid(value) => Value::Text(value.to_string()),
    }
}

fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
