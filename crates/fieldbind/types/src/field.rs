//! Selection fields and their values.
//!
//! A selection field holds one or more chosen values from a fixed option
//! set. The reserved empty value stands in when nothing is chosen: a
//! field's value set is never truly empty, only "empty-sentinel", and the
//! sentinel never coexists with a real value.

use crate::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Identifiers ──────────────────────────────────────────────────────

/// Stable identifier of a selection field within a schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldId(pub u32);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a selectable value within a field's option set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValueId(pub u32);

impl ValueId {
    /// The reserved bind value meaning "nothing selected". Never a real
    /// schema value; always compared through [`ValueId::is_empty`].
    pub const EMPTY: ValueId = ValueId(100);

    /// Whether this id is the reserved empty sentinel.
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Selection Value ──────────────────────────────────────────────────

/// One selectable option: an opaque value id plus its display label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionValue {
    pub id: ValueId,
    pub label: String,
}

impl SelectionValue {
    pub fn new(id: ValueId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// The reserved empty selection.
    pub fn empty() -> Self {
        Self {
            id: ValueId::EMPTY,
            label: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl fmt::Display for SelectionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}

// ── Selection Field ──────────────────────────────────────────────────

/// A document attribute holding one or more chosen values from a fixed
/// enumerated option set.
///
/// Invariant: the value set is never empty. When nothing is chosen it
/// holds exactly the empty sentinel; selecting any real value clears the
/// sentinel, and selecting the sentinel clears everything else.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionField {
    id: FieldId,
    name: String,
    /// Declared options; label resolution goes through this set.
    options: Vec<SelectionValue>,
    /// Current selection, in selection order.
    values: Vec<SelectionValue>,
    /// Set by any mutation; cleared with [`SelectionField::mark_clean`].
    updated: bool,
}

impl SelectionField {
    /// Create a field with nothing selected.
    pub fn new(id: FieldId, name: impl Into<String>, options: Vec<SelectionValue>) -> Self {
        Self {
            id,
            name: name.into(),
            options,
            values: vec![SelectionValue::empty()],
            updated: false,
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared option set.
    pub fn options(&self) -> &[SelectionValue] {
        &self.options
    }

    // ── Option lookup ────────────────────────────────────────────────

    /// Label of a declared value id; the sentinel resolves to "".
    pub fn label_of(&self, id: ValueId) -> Option<&str> {
        if id.is_empty() {
            return Some("");
        }
        self.options
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
    }

    /// Value id of a declared label; "" resolves to the sentinel.
    pub fn id_of_label(&self, label: &str) -> Option<ValueId> {
        if label.is_empty() {
            return Some(ValueId::EMPTY);
        }
        self.options.iter().find(|o| o.label == label).map(|o| o.id)
    }

    // ── Selection commands ───────────────────────────────────────────

    /// Add one value to the selection, upholding sentinel exclusivity.
    /// Selecting the sentinel clears the field; selecting a real value
    /// drops the sentinel. Already-selected values are no-ops.
    pub fn select_value(&mut self, value: SelectionValue) {
        if value.is_empty() {
            self.clear();
            return;
        }
        if self.is_empty() {
            self.values.clear();
        }
        if !self.values.iter().any(|v| v.id == value.id) {
            self.values.push(value);
            self.updated = true;
        }
    }

    /// Select a value by id, resolving its label from the option set.
    pub fn select(&mut self, id: ValueId) -> FieldResult<()> {
        let label = self
            .label_of(id)
            .ok_or(FieldError::UnknownValue {
                field: self.id,
                value: id,
            })?
            .to_string();
        self.select_value(SelectionValue::new(id, label));
        Ok(())
    }

    /// Select a value by its display label.
    pub fn select_label(&mut self, label: &str) -> FieldResult<()> {
        let id = self.id_of_label(label).ok_or_else(|| FieldError::UnknownLabel {
            field: self.id,
            label: label.to_string(),
        })?;
        self.select(id)
    }

    /// Select several values by id.
    pub fn select_all<I: IntoIterator<Item = ValueId>>(&mut self, ids: I) -> FieldResult<()> {
        for id in ids {
            self.select(id)?;
        }
        Ok(())
    }

    /// Remove one value; an emptied field falls back to the sentinel.
    pub fn deselect(&mut self, id: ValueId) {
        let before = self.values.len();
        self.values.retain(|v| v.id != id);
        if self.values.len() != before {
            if self.values.is_empty() {
                self.values.push(SelectionValue::empty());
            }
            self.updated = true;
        }
    }

    /// Drop every selected value, leaving the empty sentinel.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        self.values = vec![SelectionValue::empty()];
        self.updated = true;
    }

    /// Replace the whole selection with a single value.
    pub fn set(&mut self, id: ValueId) -> FieldResult<()> {
        if self.label_of(id).is_none() {
            return Err(FieldError::UnknownValue {
                field: self.id,
                value: id,
            });
        }
        self.clear();
        self.select(id)
    }

    /// Select a value only when nothing is currently chosen.
    pub fn fill_if_empty(&mut self, id: ValueId) -> FieldResult<()> {
        if self.is_empty() {
            self.select(id)?;
        }
        Ok(())
    }

    // ── Selection queries ────────────────────────────────────────────

    /// True when only the sentinel is held.
    pub fn is_empty(&self) -> bool {
        self.values.len() == 1 && self.values[0].is_empty()
    }

    pub fn is_selected(&self, id: ValueId) -> bool {
        self.values.iter().any(|v| v.id == id)
    }

    /// Currently selected value ids, sentinel-inclusive.
    pub fn selected_ids(&self) -> Vec<ValueId> {
        self.values.iter().map(|v| v.id).collect()
    }

    /// Currently selected value ids with the sentinel filtered out.
    pub fn selected_concrete_ids(&self) -> Vec<ValueId> {
        self.values
            .iter()
            .map(|v| v.id)
            .filter(|id| !id.is_empty())
            .collect()
    }

    /// Labels of the current selection.
    pub fn selected_labels(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.label.as_str()).collect()
    }

    // ── Dirty tracking ───────────────────────────────────────────────

    /// Whether any mutation happened since construction or the last
    /// [`SelectionField::mark_clean`].
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    pub fn mark_clean(&mut self) {
        self.updated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_field() -> SelectionField {
        SelectionField::new(
            FieldId(3),
            "severity",
            vec![
                SelectionValue::new(ValueId(20), "minor"),
                SelectionValue::new(ValueId(21), "major"),
                SelectionValue::new(ValueId(22), "critical"),
            ],
        )
    }

    #[test]
    fn starts_with_sentinel_only() {
        let field = make_field();
        assert!(field.is_empty());
        assert_eq!(field.selected_ids(), vec![ValueId::EMPTY]);
        assert!(field.selected_concrete_ids().is_empty());
        assert!(!field.is_updated());
    }

    #[test]
    fn selecting_real_value_clears_sentinel() {
        let mut field = make_field();
        field.select(ValueId(20)).unwrap();
        assert_eq!(field.selected_ids(), vec![ValueId(20)]);
        assert!(!field.is_selected(ValueId::EMPTY));
        assert!(field.is_updated());
    }

    #[test]
    fn selecting_sentinel_clears_everything() {
        let mut field = make_field();
        field.select_all([ValueId(20), ValueId(21)]).unwrap();
        field.select(ValueId::EMPTY).unwrap();
        assert!(field.is_empty());
        assert_eq!(field.selected_ids(), vec![ValueId::EMPTY]);
    }

    #[test]
    fn duplicate_selection_is_noop() {
        let mut field = make_field();
        field.select(ValueId(21)).unwrap();
        field.mark_clean();
        field.select(ValueId(21)).unwrap();
        assert_eq!(field.selected_ids(), vec![ValueId(21)]);
        assert!(!field.is_updated());
    }

    #[test]
    fn select_unknown_value_fails_untouched() {
        let mut field = make_field();
        let result = field.select(ValueId(99));
        assert_eq!(
            result,
            Err(FieldError::UnknownValue {
                field: FieldId(3),
                value: ValueId(99),
            })
        );
        assert!(field.is_empty());
        assert!(!field.is_updated());
    }

    #[test]
    fn select_by_label() {
        let mut field = make_field();
        field.select_label("major").unwrap();
        assert_eq!(field.selected_ids(), vec![ValueId(21)]);
        assert_eq!(field.selected_labels(), vec!["major"]);

        let result = field.select_label("bogus");
        assert!(matches!(result, Err(FieldError::UnknownLabel { .. })));
    }

    #[test]
    fn empty_label_resolves_to_sentinel() {
        let field = make_field();
        assert_eq!(field.id_of_label(""), Some(ValueId::EMPTY));
        assert_eq!(field.label_of(ValueId::EMPTY), Some(""));
    }

    #[test]
    fn set_is_single_select() {
        let mut field = make_field();
        field.select_all([ValueId(20), ValueId(21)]).unwrap();
        field.set(ValueId(22)).unwrap();
        assert_eq!(field.selected_ids(), vec![ValueId(22)]);

        // A failed set leaves the selection alone.
        assert!(field.set(ValueId(99)).is_err());
        assert_eq!(field.selected_ids(), vec![ValueId(22)]);
    }

    #[test]
    fn deselect_falls_back_to_sentinel() {
        let mut field = make_field();
        field.select(ValueId(20)).unwrap();
        field.deselect(ValueId(20));
        assert!(field.is_empty());
    }

    #[test]
    fn fill_if_empty_only_fills_empty() {
        let mut field = make_field();
        field.fill_if_empty(ValueId(20)).unwrap();
        assert_eq!(field.selected_ids(), vec![ValueId(20)]);
        field.fill_if_empty(ValueId(21)).unwrap();
        assert_eq!(field.selected_ids(), vec![ValueId(20)]);
    }

    #[test]
    fn clear_on_empty_field_stays_clean() {
        let mut field = make_field();
        field.clear();
        assert!(!field.is_updated());
    }

    #[test]
    fn sentinel_never_coexists_with_real_values() {
        let mut field = make_field();
        field.select(ValueId(20)).unwrap();
        field.select(ValueId(21)).unwrap();
        let ids = field.selected_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids.iter().all(|id| !id.is_empty()));
    }
}
