//! Field-dependency domain types.
//!
//! This crate is the data layer of the field-dependency engine: selection
//! fields and their values, dependency rules, the indexed [`RuleSet`], and
//! the [`Schema`] registry that binds fields and rules together. The
//! sibling `fieldbind-engine` crate implements the resolver that operates
//! over these types.
//!
//! Rules declare *legal* combinations only. A rule never forbids anything
//! directly: an observed (source value, target value) pair is legal exactly
//! when the rule set contains it, and a field pair with no rules at all is
//! unconstrained.

pub mod errors;
pub mod field;
pub mod rule;
pub mod schema;

// Re-export main types
pub use errors::{FieldError, FieldResult};
pub use field::{FieldId, SelectionField, SelectionValue, ValueId};
pub use rule::{Rule, RuleRecord, RuleSet};
pub use schema::{FieldSpec, Schema, SchemaId};
