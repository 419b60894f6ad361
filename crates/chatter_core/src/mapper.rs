//! Domain/entity boundary: model conversion and predicate translation.
//!
//! # Responsibility
//! - Convert between one domain model type and its persistence entity type.
//! - Rewrite domain-space filters into entity-space filters through a
//!   declared field-correspondence table.
//!
//! # Invariants
//! - Translation preserves boolean structure, operators and captured values;
//!   only field names change.
//! - A domain member with no declared entity column fails with
//!   [`TranslationError`] naming the member (integrator error, fail fast).

use crate::filter::Filter;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A declared entity column is not a plain SQL identifier.
///
/// Field maps are static wiring; this surfaces when a repository is
/// constructed, before any query runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapError {
    pub member: String,
    pub column: String,
}

impl Display for FieldMapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "entity column `{}` for member `{}` is not a valid identifier",
            self.column, self.member
        )
    }
}

impl Error for FieldMapError {}

/// A domain filter referenced a member with no mapped entity column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationError {
    pub member: String,
}

impl Display for TranslationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "domain member `{}` has no mapped entity column",
            self.member
        )
    }
}

impl Error for TranslationError {}

/// Declared correspondence from domain member names to entity column names.
///
/// Built once per mapper as static configuration. Members are identity-mapped
/// by default and renamed where the entity schema diverges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    columns: BTreeMap<String, String>,
}

impl FieldMap {
    /// Declares members whose entity column carries the same name.
    pub fn identity(members: &[&str]) -> Self {
        let mut map = Self::default();
        for member in members {
            map = map.rename(member, member);
        }
        map
    }

    /// Declares one member whose entity column carries a different name.
    pub fn rename(mut self, member: &str, column: &str) -> Self {
        self.columns.insert(member.to_string(), column.to_string());
        self
    }

    /// Checks every declared column is a plain SQL identifier.
    ///
    /// Called by repository constructors so misdeclared wiring fails at
    /// startup, not inside a query.
    pub fn validate(&self) -> Result<(), FieldMapError> {
        for (member, column) in &self.columns {
            if !is_sql_identifier(column) {
                return Err(FieldMapError {
                    member: member.clone(),
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns the entity column for a domain member, if declared.
    pub fn column(&self, member: &str) -> Option<&str> {
        self.columns.get(member).map(String::as_str)
    }

    /// Rewrites a domain-space filter into entity-space.
    pub fn translate(&self, filter: &Filter) -> Result<Filter, TranslationError> {
        Ok(match filter {
            Filter::All => Filter::All,
            Filter::Cmp { field, op, value } => Filter::Cmp {
                field: self.require(field)?.to_string(),
                op: *op,
                value: value.clone(),
            },
            Filter::Contains { field, needle } => Filter::Contains {
                field: self.require(field)?.to_string(),
                needle: needle.clone(),
            },
            Filter::And(lhs, rhs) => Filter::And(
                Box::new(self.translate(lhs)?),
                Box::new(self.translate(rhs)?),
            ),
            Filter::Or(lhs, rhs) => Filter::Or(
                Box::new(self.translate(lhs)?),
                Box::new(self.translate(rhs)?),
            ),
            Filter::Not(inner) => Filter::Not(Box::new(self.translate(inner)?)),
        })
    }

    fn require(&self, member: &str) -> Result<&str, TranslationError> {
        self.column(member).ok_or_else(|| TranslationError {
            member: member.to_string(),
        })
    }
}

/// Bidirectional conversion between one domain model and its entity type.
///
/// Implementations own the field-by-field copy in both directions and declare
/// the correspondence table used for predicate translation. One mapper type
/// exists per (domain, entity) pair.
pub trait EntityMapper {
    type Model;
    type Entity;

    fn to_entity(&self, model: &Self::Model) -> Self::Entity;
    fn to_domain(&self, entity: &Self::Entity) -> Self::Model;
    fn field_map(&self) -> &FieldMap;

    /// Rewrites a domain-space filter into entity-space using the declared
    /// field map. Selected-set semantics are preserved exactly.
    fn translate(&self, filter: &Filter) -> Result<Filter, TranslationError> {
        self.field_map().translate(filter)
    }
}

fn is_sql_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::{FieldMap, TranslationError};
    use crate::filter::Filter;

    fn map() -> FieldMap {
        FieldMap::identity(&["channel_id", "user_id"]).rename("text", "body")
    }

    #[test]
    fn identity_members_keep_their_name() {
        let translated = map().translate(&Filter::eq("channel_id", 1)).unwrap();
        assert_eq!(translated, Filter::eq("channel_id", 1));
    }

    #[test]
    fn renamed_member_becomes_entity_column() {
        let translated = map().translate(&Filter::contains("text", "two")).unwrap();
        assert_eq!(translated, Filter::contains("body", "two"));
    }

    #[test]
    fn translation_preserves_boolean_structure_and_values() {
        let filter = Filter::eq("channel_id", 1)
            .and(Filter::contains("text", "hello").or(Filter::eq("user_id", 7).not()));
        let translated = map().translate(&filter).unwrap();
        let expected = Filter::eq("channel_id", 1)
            .and(Filter::contains("body", "hello").or(Filter::eq("user_id", 7).not()));
        assert_eq!(translated, expected);
    }

    #[test]
    fn unmapped_member_fails_naming_the_member() {
        let err = map().translate(&Filter::eq("no_such_field", 1)).unwrap_err();
        assert_eq!(
            err,
            TranslationError {
                member: "no_such_field".to_string()
            }
        );
    }

    #[test]
    fn unmapped_member_inside_nested_tree_is_still_caught() {
        let filter = Filter::eq("channel_id", 1).and(Filter::eq("ghost", 2).not());
        let err = map().translate(&filter).unwrap_err();
        assert_eq!(err.member, "ghost");
    }

    #[test]
    fn validate_rejects_non_identifier_columns() {
        let map = FieldMap::identity(&["channel_id"]).rename("text", "body; DROP TABLE x");
        let err = map.validate().unwrap_err();
        assert_eq!(err.member, "text");
        assert_eq!(err.column, "body; DROP TABLE x");
    }

    #[test]
    fn validate_accepts_identifier_columns() {
        assert!(map().validate().is_ok());
    }
}
