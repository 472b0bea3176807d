//! Dependency resolver runtime for selection-field documents.
//!
//! The engine keeps a document's selection fields mutually consistent
//! according to its schema's dependency rule table. It does two things:
//!
//! - [`Document`] — the in-memory store of one document's live field
//!   values over a shared [`Schema`](fieldbind_types::Schema).
//! - [`DependencyResolver`] — the stateless algorithm that detects
//!   inconsistent fields and narrows an inconsistent field's candidate
//!   set down to a single legal value, iterating to a fixed point under
//!   a bounded round budget.
//!
//! # Key Principle
//!
//! **Inconsistency is data, not an error.** The resolver reports it as a
//! set of field ids and a boolean per autocompletion attempt; the only
//! hard failure is a field id outside the document's schema.
//!
//! # Example
//!
//! ```rust
//! use fieldbind_engine::{DependencyResolver, Document};
//! use fieldbind_types::{FieldId, FieldSpec, RuleRecord, Schema, SchemaId, ValueId};
//! use std::sync::Arc;
//!
//! let fields = vec![
//!     FieldSpec::new(FieldId(1), "impact").with_option(ValueId(10), "low"),
//!     FieldSpec::new(FieldId(2), "severity").with_option(ValueId(20), "minor"),
//! ];
//! let records = vec![RuleRecord {
//!     source_field_id: FieldId(1),
//!     source_value_id: ValueId(10),
//!     target_field_id: FieldId(2),
//!     target_value_id: ValueId(20),
//! }];
//! let schema = Arc::new(Schema::new(SchemaId(1), fields, records).unwrap());
//!
//! let mut doc = Document::new(schema.clone());
//! doc.select(FieldId(1), ValueId(10)).unwrap();
//!
//! let resolver = DependencyResolver::new(schema.rules());
//! assert!(!resolver.check_dependencies(&doc).unwrap().is_empty());
//!
//! resolver.autocomplete_fields(&mut doc).unwrap();
//! assert!(resolver.check_dependencies(&doc).unwrap().is_empty());
//! assert_eq!(doc.selected_values(FieldId(2)).unwrap(), vec![ValueId(20)]);
//! ```

#![deny(unsafe_code)]

pub mod document;
pub mod resolver;

// Re-export main types
pub use document::Document;
pub use resolver::{DependencyReport, DependencyResolver, MAX_AUTOCOMPLETE_ROUNDS};
