//! Failure class codes and their human-readable labels

use crate::models::FailureLabel;

/// Class codes emitted by the failure-type classifier, as fixed at training
/// time. Code 0 is deliberately absent: the multiclass model is only invoked
/// after the binary gate reports a failure, so 0 resolves to the unknown
/// sentinel like any other unmapped code.
pub const FAILURE_LABELS: [(i64, FailureLabel); 5] = [
    (1, FailureLabel::Overstrain),
    (2, FailureLabel::Power),
    (3, FailureLabel::Random),
    (4, FailureLabel::ToolWear),
    (5, FailureLabel::HeatDissipation),
];

/// Resolve a classifier code to its label, falling back to the unknown
/// sentinel for anything outside the table. Resolution never fails.
pub fn resolve_failure_label(code: i64) -> FailureLabel {
    FAILURE_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(FailureLabel::Unknown)
}
