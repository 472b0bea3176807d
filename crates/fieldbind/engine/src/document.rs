//! In-memory document: the owning store of a schema's selection fields.
//!
//! The document is the collaborator the resolver reads and writes. Fields
//! materialize lazily from their schema spec the first time they are
//! mutated; reading a field that was never touched observes the empty
//! selection without materializing anything, so validation passes leave
//! the document untouched. All mutation goes through explicit commands
//! (`select`, `replace_selection`, ...) — the resolver never holds
//! aliased mutable references into the field map.

use fieldbind_types::{FieldError, FieldId, FieldResult, Schema, SelectionField, ValueId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// One document's live selection-field values over a shared schema.
#[derive(Clone, Debug)]
pub struct Document {
    schema: Arc<Schema>,
    fields: BTreeMap<FieldId, SelectionField>,
}

impl Document {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            fields: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    // ── Read path ────────────────────────────────────────────────────

    /// Current selection of a field, sentinel-inclusive. A declared field
    /// that was never touched reads as the empty selection.
    pub fn selected_values(&self, id: FieldId) -> FieldResult<Vec<ValueId>> {
        match self.fields.get(&id) {
            Some(field) => Ok(field.selected_ids()),
            None => {
                self.schema.field(id)?;
                Ok(vec![ValueId::EMPTY])
            }
        }
    }

    /// Borrow a field read-only, if it has been materialized.
    pub fn field(&self, id: FieldId) -> Option<&SelectionField> {
        self.fields.get(&id)
    }

    /// Whether the field has been materialized in this document.
    pub fn contains_field(&self, id: FieldId) -> bool {
        self.fields.contains_key(&id)
    }

    /// Whether the field participates in any dependency rule.
    pub fn is_dependent(&self, id: FieldId) -> bool {
        self.schema.is_dependent(id)
    }

    /// Ids of fields mutated since materialization.
    pub fn updated_field_ids(&self) -> Vec<FieldId> {
        self.fields
            .values()
            .filter(|f| f.is_updated())
            .map(|f| f.id())
            .collect()
    }

    // ── Write path ───────────────────────────────────────────────────

    /// Borrow a field mutably, materializing it from its spec if needed.
    pub fn field_mut(&mut self, id: FieldId) -> FieldResult<&mut SelectionField> {
        if !self.fields.contains_key(&id) {
            let field = self.schema.field(id)?.instantiate();
            debug!(field = %id, name = field.name(), "field materialized");
            self.fields.insert(id, field);
        }
        self.fields.get_mut(&id).ok_or(FieldError::UnknownField(id))
    }

    /// Borrow a field mutably by its schema name.
    pub fn field_mut_by_name(&mut self, name: &str) -> FieldResult<&mut SelectionField> {
        let id = self.schema.id_of(name)?;
        self.field_mut(id)
    }

    /// Select one value on a field (clears the sentinel if present).
    pub fn select(&mut self, id: FieldId, value: ValueId) -> FieldResult<()> {
        self.field_mut(id)?.select(value)
    }

    /// Select one value on a field by its display label.
    pub fn select_label(&mut self, id: FieldId, label: &str) -> FieldResult<()> {
        self.field_mut(id)?.select_label(label)
    }

    /// Drop every selected value of a field, leaving the empty sentinel.
    pub fn clear_selection(&mut self, id: FieldId) -> FieldResult<()> {
        self.field_mut(id)?.clear();
        Ok(())
    }

    /// Replace the whole selection with a single value. This is the
    /// command the resolver issues when autocompletion succeeds.
    pub fn replace_selection(&mut self, id: FieldId, value: ValueId) -> FieldResult<()> {
        let field = self.field_mut(id)?;
        field.clear();
        field.select(value)
    }
}
