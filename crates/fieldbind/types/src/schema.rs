//! Schema: the per-tracker registry of selection fields and their
//! dependency rule table.
//!
//! A schema is built once from declarative data and is read-only
//! afterwards; documents share it behind an `Arc`. Construction validates
//! the rule table: every record must reference declared fields, and its
//! value ids must be declared options of those fields (or the empty
//! sentinel).

use crate::{
    FieldError, FieldId, FieldResult, RuleRecord, RuleSet, SelectionField, SelectionValue, ValueId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaId(pub u32);

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Field Spec ───────────────────────────────────────────────────────

/// Declaration of one selection field: its id, name, and option set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: FieldId,
    pub name: String,
    #[serde(default)]
    pub options: Vec<SelectionValue>,
}

impl FieldSpec {
    pub fn new(id: FieldId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, id: ValueId, label: impl Into<String>) -> Self {
        self.options.push(SelectionValue::new(id, label));
        self
    }

    /// Whether a value id is selectable on this field. The empty sentinel
    /// is always selectable.
    pub fn has_option(&self, value: ValueId) -> bool {
        value.is_empty() || self.options.iter().any(|o| o.id == value)
    }

    /// Instantiate an empty selection field from this spec.
    pub fn instantiate(&self) -> SelectionField {
        SelectionField::new(self.id, self.name.clone(), self.options.clone())
    }
}

// ── Schema ───────────────────────────────────────────────────────────

/// The per-schema registry of fields plus the indexed rule table.
#[derive(Clone, Debug)]
pub struct Schema {
    id: SchemaId,
    /// Field specs in declaration order.
    fields: Vec<FieldSpec>,
    by_id: HashMap<FieldId, usize>,
    by_name: HashMap<String, usize>,
    rules: RuleSet,
}

impl Schema {
    /// Build a schema from field declarations and the raw rule table.
    pub fn new(
        id: SchemaId,
        fields: Vec<FieldSpec>,
        records: Vec<RuleRecord>,
    ) -> FieldResult<Self> {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        for (idx, spec) in fields.iter().enumerate() {
            if by_id.insert(spec.id, idx).is_some() {
                return Err(FieldError::DuplicateField(spec.id));
            }
            if by_name.insert(spec.name.clone(), idx).is_some() {
                return Err(FieldError::DuplicateField(spec.id));
            }
        }

        let mut rules = RuleSet::new();
        for record in records {
            let source = by_id
                .get(&record.source_field_id)
                .map(|&idx| &fields[idx])
                .ok_or(FieldError::UnknownField(record.source_field_id))?;
            if !source.has_option(record.source_value_id) {
                return Err(FieldError::UnknownValue {
                    field: source.id,
                    value: record.source_value_id,
                });
            }
            let target = by_id
                .get(&record.target_field_id)
                .map(|&idx| &fields[idx])
                .ok_or(FieldError::UnknownField(record.target_field_id))?;
            if !target.has_option(record.target_value_id) {
                return Err(FieldError::UnknownValue {
                    field: target.id,
                    value: record.target_value_id,
                });
            }
            rules.add_rule(record.into());
        }

        Ok(Self {
            id,
            fields,
            by_id,
            by_name,
            rules,
        })
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Field spec by id.
    pub fn field(&self, id: FieldId) -> FieldResult<&FieldSpec> {
        self.by_id
            .get(&id)
            .map(|&idx| &self.fields[idx])
            .ok_or(FieldError::UnknownField(id))
    }

    /// Field spec by name.
    pub fn field_by_name(&self, name: &str) -> FieldResult<&FieldSpec> {
        self.by_name
            .get(name)
            .map(|&idx| &self.fields[idx])
            .ok_or_else(|| FieldError::UnknownFieldName(name.to_string()))
    }

    pub fn field_exists(&self, id: FieldId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn name_of(&self, id: FieldId) -> FieldResult<&str> {
        self.field(id).map(|spec| spec.name.as_str())
    }

    pub fn id_of(&self, name: &str) -> FieldResult<FieldId> {
        self.field_by_name(name).map(|spec| spec.id)
    }

    /// Field specs in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// The schema's dependency rule table.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Whether the field participates in any dependency rule.
    pub fn is_dependent(&self, id: FieldId) -> bool {
        self.rules.source_field_ids().contains(&id) || self.rules.target_field_ids().contains(&id)
    }
}
