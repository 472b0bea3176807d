//! Error types for the field-dependency engine.

use crate::{FieldId, ValueId};
use thiserror::Error;

/// Errors that can occur while working with schemas, fields, and rules.
///
/// Inconsistency between fields is *not* an error — it is reported as data
/// by the resolver. These variants cover contract violations only: asking
/// for something the active schema does not declare.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A field id outside the active schema.
    #[error("field {0} not found in schema")]
    UnknownField(FieldId),

    /// A field name outside the active schema.
    #[error("field '{0}' not found in schema")]
    UnknownFieldName(String),

    /// A value id that is not among the field's declared options.
    #[error("value {value} not declared for field {field}")]
    UnknownValue { field: FieldId, value: ValueId },

    /// A label that is not among the field's declared options.
    #[error("label '{label}' not declared for field {field}")]
    UnknownLabel { field: FieldId, label: String },

    /// Two field declarations in one schema share an id or a name.
    #[error("duplicate field declaration: {0}")]
    DuplicateField(FieldId),
}

/// Result type for field-dependency operations.
pub type FieldResult<T> = Result<T, FieldError>;
