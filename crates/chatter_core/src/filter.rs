//! Storage-agnostic filter predicates over domain models.
//!
//! # Responsibility
//! - Represent boolean conditions as explicit (field, operator, value) trees
//!   so they can be rewritten from domain terms to entity terms and then
//!   compiled by a storage backend.
//!
//! # Invariants
//! - Field names reference domain model members until translated by a mapper.
//! - `Filter::All` is the identity element for `and` and the absorbing
//!   element for `or`.

use uuid::Uuid;

/// Captured comparison value inside a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Text(String),
    Bool(bool),
    Guid(Uuid),
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Uuid> for Scalar {
    fn from(value: Uuid) -> Self {
        Self::Guid(value)
    }
}

/// Comparison operator for field predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Boolean condition tree over named fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every record; used as the base query for search pipelines.
    All,
    /// Field/operator/value comparison.
    Cmp {
        field: String,
        op: CmpOp,
        value: Scalar,
    },
    /// Substring containment test on a text field.
    Contains { field: String, needle: String },
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(field, CmpOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(field, CmpOp::Ne, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(field, CmpOp::Lt, value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(field, CmpOp::Le, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(field, CmpOp::Gt, value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(field, CmpOp::Ge, value)
    }

    pub fn cmp(field: impl Into<String>, op: CmpOp, value: impl Into<Scalar>) -> Self {
        Self::Cmp {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Substring test. Case sensitivity is decided by the storage backend's
    /// text collation; the SQLite backend compiles this to `LIKE`, which
    /// folds ASCII case, so any equivalence with in-memory filtering must
    /// fold case on both sides. Callers needing case-insensitive search
    /// normalize the needle first (see the search pipeline contract).
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            needle: needle.into(),
        }
    }

    /// Conjunction. `All` is the identity so conditional narrowing steps can
    /// fold onto a base query without degenerate clauses.
    pub fn and(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::All, filter) | (filter, Filter::All) => filter,
            (lhs, rhs) => Filter::And(Box::new(lhs), Box::new(rhs)),
        }
    }

    /// Disjunction. `All` absorbs: widening past "everything" is a no-op.
    pub fn or(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::All, _) | (_, Filter::All) => Filter::All,
            (lhs, rhs) => Filter::Or(Box::new(lhs), Box::new(rhs)),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Filter {
        Filter::Not(Box::new(self))
    }
}
