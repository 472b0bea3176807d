//! Dependency resolution: consistency checking and autocompletion.
//!
//! The resolver is stateless. It borrows a rule set and walks one
//! document's live field values: a two-pass scan flags target fields
//! whose selection is unjustified or contradicted, and autocompletion
//! tries to collapse a flagged field's candidate set to a single legal
//! value, iterating to a fixed point under a bounded round budget.
//!
//! Source fields are ground truth: the scan may find a source whose
//! value supports nothing, but only target fields are ever corrected.

use crate::Document;
use fieldbind_types::{FieldId, FieldResult, Rule, RuleSet};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Upper bound on autocompletion rounds. Rule tables may form cycles or
/// mutually contradictory chains that never converge; the cap guarantees
/// termination and the caller re-checks for residue.
pub const MAX_AUTOCOMPLETE_ROUNDS: usize = 10;

/// Outcome of a full two-pass consistency scan.
///
/// `invalid_targets` is the actionable set. `invalid_sources` records
/// source fields whose current value supports no current target value —
/// diagnostic only, never fed back into autocompletion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub invalid_targets: BTreeSet<FieldId>,
    pub invalid_sources: BTreeSet<FieldId>,
}

impl DependencyReport {
    /// True when no target-side field needs correction.
    pub fn is_consistent(&self) -> bool {
        self.invalid_targets.is_empty()
    }
}

/// Stateless resolver over one schema's rule set.
#[derive(Clone, Copy, Debug)]
pub struct DependencyResolver<'a> {
    rules: &'a RuleSet,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Target-playing fields currently in an inconsistent state.
    ///
    /// Reads the document without mutating it: calling this twice with no
    /// intervening edit returns identical sets.
    pub fn check_dependencies(&self, doc: &Document) -> FieldResult<BTreeSet<FieldId>> {
        Ok(self.diagnose(doc)?.invalid_targets)
    }

    /// Full two-pass consistency scan, including the diagnostic
    /// source-side view that [`DependencyResolver::check_dependencies`]
    /// withholds.
    pub fn diagnose(&self, doc: &Document) -> FieldResult<DependencyReport> {
        let mut report = DependencyReport::default();

        // Target-anchored pass: every selected target value must be
        // justified by each source field that constrains it.
        for &tgt_fid in self.rules.target_field_ids() {
            let mut valid = true;
            for tgt_vid in doc.selected_values(tgt_fid)? {
                for (src_fid, legal_vids) in self.rules.source_rules(tgt_fid, Some(tgt_vid)) {
                    let selected = doc.selected_values(src_fid)?;
                    if !selected.iter().any(|v| legal_vids.contains(v)) {
                        report.invalid_sources.insert(src_fid);
                        valid = false;
                    }
                }
            }
            if !valid {
                report.invalid_targets.insert(tgt_fid);
            }
        }

        // Source-anchored pass: every selected source value implies
        // per-target legal sets; a target sharing none of them is
        // flagged.
        for &src_fid in self.rules.source_field_ids() {
            let mut valid = true;
            for src_vid in doc.selected_values(src_fid)? {
                for (tgt_fid, implied_vids) in self.rules.target_rules(src_fid, src_vid) {
                    let selected = doc.selected_values(tgt_fid)?;
                    if !selected.iter().any(|v| implied_vids.contains(v)) {
                        report.invalid_targets.insert(tgt_fid);
                        valid = false;
                    }
                }
            }
            if !valid {
                report.invalid_sources.insert(src_fid);
            }
        }

        if !report.invalid_targets.is_empty() {
            debug!(invalid = ?report.invalid_targets, "inconsistent target fields");
        }
        Ok(report)
    }

    /// Try to collapse one target field to a single legal value.
    ///
    /// Candidates are the rules matching each source value that is both
    /// currently selected and itself legal for this target. Candidates
    /// are counted as rules, not distinct target values: two source
    /// fields agreeing on one value still yield two candidates. Returns
    /// true when the field was rewritten; on false the field is left
    /// untouched.
    pub fn autocomplete_field(
        &self,
        doc: &mut Document,
        target: FieldId,
        prefer_not_empty: bool,
    ) -> FieldResult<bool> {
        let source_rules = self.rules.source_rules(target, None);

        let mut candidates: Vec<Rule> = Vec::new();
        for (src_fid, legal_vids) in &source_rules {
            for vid in doc.selected_values(*src_fid)? {
                if legal_vids.contains(&vid) {
                    candidates.extend(
                        self.rules
                            .target_options(*src_fid, vid, Some(target))
                            .into_iter()
                            .copied(),
                    );
                }
            }
        }

        let empty_candidates = candidates
            .iter()
            .filter(|r| r.target_value_id.is_empty())
            .count();
        if prefer_not_empty && candidates.len() == 2 {
            // Exactly one real alternative beside "empty": take the real one.
            candidates.retain(|r| !r.target_value_id.is_empty());
        } else if candidates.len() > 2 && empty_candidates > 0 {
            // Ambiguity among several real values collapses to "empty"
            // rather than guessing.
            candidates.retain(|r| r.target_value_id.is_empty());
        }

        if candidates.len() == 1 {
            let value = candidates[0].target_value_id;
            doc.replace_selection(target, value)?;
            info!(field = %target, value = %value, "field autocompleted");
            return Ok(true);
        }

        debug!(
            field = %target,
            candidates = candidates.len(),
            "autocompletion left field untouched"
        );
        Ok(false)
    }

    /// Fixed-point driver: repeatedly autocomplete every inconsistent
    /// field until the set drains or the round budget is exhausted. The
    /// caller re-runs [`DependencyResolver::check_dependencies`] to learn
    /// of residual inconsistency.
    pub fn autocomplete_fields(&self, doc: &mut Document) -> FieldResult<()> {
        let mut invalid = self.check_dependencies(doc)?;
        let mut rounds = 0;
        while rounds < MAX_AUTOCOMPLETE_ROUNDS && !invalid.is_empty() {
            for &fid in &invalid {
                self.autocomplete_field(doc, fid, false)?;
            }
            invalid = self.check_dependencies(doc)?;
            rounds += 1;
        }
        if !invalid.is_empty() {
            warn!(remaining = ?invalid, rounds, "autocompletion did not converge");
        }
        Ok(())
    }

    /// Validate-and-autocomplete gate: runs the bounded fixed point and
    /// returns the field ids still inconsistent afterwards. An empty set
    /// means the document is safe to accept.
    pub fn resolve(&self, doc: &mut Document) -> FieldResult<BTreeSet<FieldId>> {
        self.autocomplete_fields(doc)?;
        self.check_dependencies(doc)
    }
}
