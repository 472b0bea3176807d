//! Dependency rules and the indexed rule set.
//!
//! A rule declares one legal (source value, target value) pairing between
//! two selection fields. Legality of an observed pair is set membership
//! over all rules sharing that field pair. The [`RuleSet`] is append-only:
//! rules may be added while merging schema revisions, never removed or
//! mutated in place.

use crate::{FieldId, ValueId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

// ── Rule ─────────────────────────────────────────────────────────────

/// Raw declarative rule record, as supplied by a schema's rule table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub source_field_id: FieldId,
    pub source_value_id: ValueId,
    pub target_field_id: FieldId,
    pub target_value_id: ValueId,
}

/// A declared-legal combination: "source field holds source value AND
/// target field holds target value". Equality is structural over all four
/// components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub source_field_id: FieldId,
    pub source_value_id: ValueId,
    pub target_field_id: FieldId,
    pub target_value_id: ValueId,
}

impl Rule {
    pub fn new(
        source_field_id: FieldId,
        source_value_id: ValueId,
        target_field_id: FieldId,
        target_value_id: ValueId,
    ) -> Self {
        Self {
            source_field_id,
            source_value_id,
            target_field_id,
            target_value_id,
        }
    }
}

impl From<RuleRecord> for Rule {
    fn from(record: RuleRecord) -> Self {
        Self {
            source_field_id: record.source_field_id,
            source_value_id: record.source_value_id,
            target_field_id: record.target_field_id,
            target_value_id: record.target_value_id,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} -> {}/{}",
            self.source_field_id, self.source_value_id, self.target_field_id, self.target_value_id
        )
    }
}

// ── Rule Set ─────────────────────────────────────────────────────────

/// The indexed collection of all dependency rules for one schema.
///
/// Holds a flat list in first-insertion order (downstream tie-breaking
/// depends on it) plus a forward index answering source-anchored lookups
/// without a scan. Invariant: list and index never diverge — `add_rule`
/// is the only mutator and keeps them in lockstep.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    /// Every distinct rule, in first-insertion order.
    rules: Vec<Rule>,
    /// source field -> source value -> target field -> target values.
    forward: HashMap<FieldId, HashMap<ValueId, HashMap<FieldId, Vec<ValueId>>>>,
    /// Field ids playing the source role in at least one rule.
    source_fields: BTreeSet<FieldId>,
    /// Field ids playing the target role in at least one rule.
    target_fields: BTreeSet<FieldId>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule set from raw records. Duplicate tuples collapse.
    pub fn from_records<I: IntoIterator<Item = RuleRecord>>(records: I) -> Self {
        let mut set = Self::new();
        for record in records {
            set.add_rule(record.into());
        }
        set
    }

    /// Insert a rule. A duplicate tuple is a no-op.
    pub fn add_rule(&mut self, rule: Rule) {
        if self.is_valid(
            rule.source_field_id,
            rule.source_value_id,
            rule.target_field_id,
            rule.target_value_id,
        ) {
            return;
        }
        self.rules.push(rule);
        self.source_fields.insert(rule.source_field_id);
        self.target_fields.insert(rule.target_field_id);
        self.forward
            .entry(rule.source_field_id)
            .or_default()
            .entry(rule.source_value_id)
            .or_default()
            .entry(rule.target_field_id)
            .or_default()
            .push(rule.target_value_id);
    }

    /// Exact membership test for one (source, target) combination.
    pub fn is_valid(
        &self,
        src_fid: FieldId,
        src_vid: ValueId,
        tgt_fid: FieldId,
        tgt_vid: ValueId,
    ) -> bool {
        self.forward
            .get(&src_fid)
            .and_then(|by_value| by_value.get(&src_vid))
            .and_then(|by_target| by_target.get(&tgt_fid))
            .is_some_and(|vids| vids.contains(&tgt_vid))
    }

    pub fn contains(&self, rule: &Rule) -> bool {
        self.is_valid(
            rule.source_field_id,
            rule.source_value_id,
            rule.target_field_id,
            rule.target_value_id,
        )
    }

    /// All rules whose source side matches `(src_fid, src_vid)`,
    /// optionally narrowed to one target field. Insertion order.
    pub fn target_options(
        &self,
        src_fid: FieldId,
        src_vid: ValueId,
        tgt_fid: Option<FieldId>,
    ) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|r| {
                r.source_field_id == src_fid
                    && r.source_value_id == src_vid
                    && tgt_fid.map_or(true, |t| r.target_field_id == t)
            })
            .collect()
    }

    /// Source values that legally produce the target, grouped by source
    /// field. `None` unions over every target value of the field. Value
    /// ids are deduplicated within each group.
    pub fn source_rules(
        &self,
        tgt_fid: FieldId,
        tgt_vid: Option<ValueId>,
    ) -> BTreeMap<FieldId, Vec<ValueId>> {
        let mut result: BTreeMap<FieldId, Vec<ValueId>> = BTreeMap::new();
        for rule in &self.rules {
            if rule.target_field_id == tgt_fid
                && tgt_vid.map_or(true, |v| rule.target_value_id == v)
            {
                let group = result.entry(rule.source_field_id).or_default();
                if !group.contains(&rule.source_value_id) {
                    group.push(rule.source_value_id);
                }
            }
        }
        result
    }

    /// Target values implied by one source value, grouped by target
    /// field. The source-anchored mirror of [`RuleSet::source_rules`].
    pub fn target_rules(&self, src_fid: FieldId, src_vid: ValueId) -> BTreeMap<FieldId, Vec<ValueId>> {
        let mut result: BTreeMap<FieldId, Vec<ValueId>> = BTreeMap::new();
        for rule in &self.rules {
            if rule.source_field_id == src_fid && rule.source_value_id == src_vid {
                let group = result.entry(rule.target_field_id).or_default();
                if !group.contains(&rule.target_value_id) {
                    group.push(rule.target_value_id);
                }
            }
        }
        result
    }

    /// Every field id that appears as a source or target in any rule.
    pub fn dependent_field_ids(&self) -> BTreeSet<FieldId> {
        self.source_fields
            .union(&self.target_fields)
            .copied()
            .collect()
    }

    /// Field ids appearing as a source in at least one rule. A field may
    /// play both roles across different rules.
    pub fn source_field_ids(&self) -> &BTreeSet<FieldId> {
        &self.source_fields
    }

    /// Field ids appearing as a target in at least one rule.
    pub fn target_field_ids(&self) -> &BTreeSet<FieldId> {
        &self.target_fields
    }

    pub fn all_rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule_at(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
