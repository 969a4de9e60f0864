use std::collections::BTreeSet;

use super::model::PlotMode;

/// A hard-coded exception keyed on a CIP code.
///
/// When `trigger_cip` is among the selected codes, level choices shrink to
/// `allowed_levels` and the plot mode is pinned to `forced_mode`.
#[derive(Debug, Clone, Copy)]
pub struct OverrideRule {
    pub trigger_cip: &'static str,
    pub allowed_levels: &'static [&'static str],
    pub forced_mode: Option<PlotMode>,
    /// Caption shown under the mode selector while the rule is active.
    pub note: &'static str,
}

/// Exceptions for the degree-conferred page.
pub const CONFERRED_OVERRIDES: &[OverrideRule] = &[OverrideRule {
    trigger_cip: "30.52",
    allowed_levels: &["B.A.", "M.A."],
    forced_mode: Some(PlotMode::Counts),
    note: "Digital Humanities (CIP 30.52): counts only (no % change).",
}];

/// Combined effect of every rule triggered by a selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restriction {
    /// `None` means every level is allowed.
    pub allowed_levels: Option<BTreeSet<String>>,
    pub forced_mode: Option<PlotMode>,
    pub notes: Vec<&'static str>,
}

impl Restriction {
    /// Fold every rule whose trigger is in `selected_cips`. Level sets intersect.
    pub fn resolve(rules: &[OverrideRule], selected_cips: &BTreeSet<String>) -> Self {
        let mut restriction = Restriction::default();
        for rule in rules
            .iter()
            .filter(|r| selected_cips.contains(r.trigger_cip))
        {
            let allowed: BTreeSet<String> =
                rule.allowed_levels.iter().map(|l| l.to_string()).collect();
            restriction.allowed_levels = Some(match restriction.allowed_levels.take() {
                Some(current) => current.intersection(&allowed).cloned().collect(),
                None => allowed,
            });
            if rule.forced_mode.is_some() {
                restriction.forced_mode = rule.forced_mode;
            }
            restriction.notes.push(rule.note);
        }
        restriction
    }

    pub fn permits_level(&self, level: &str) -> bool {
        self.allowed_levels
            .as_ref()
            .map_or(true, |allowed| allowed.contains(level))
    }

    pub fn is_active(&self) -> bool {
        !self.notes.is_empty()
    }
}
