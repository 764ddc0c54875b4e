//! Publish-readiness checks.

use crate::models::{Basics, Pricing, Section};

/// Evaluates the draft against the publish bar and returns human-readable
/// violations in a fixed order. An empty list means the course may be
/// published. Saving a draft never consults this.
pub fn publish_checks(basics: &Basics, sections: &[Section], pricing: &Pricing) -> Vec<String> {
    let mut errs = Vec::new();

    if basics.course_name.trim().is_empty() {
        errs.push("Course name required".to_string());
    }
    if basics.board.is_empty() {
        errs.push("Board required".to_string());
    }
    if basics.klass.is_empty() {
        errs.push("Class/Level required".to_string());
    }
    if basics.subject.trim().is_empty() {
        errs.push("Subject required".to_string());
    }
    if pricing.price < 0.0 {
        errs.push("Price cannot be negative".to_string());
    }

    // Quality bar, not a backend constraint.
    let total_lectures: usize = sections.iter().map(|s| s.lectures.len()).sum();
    if total_lectures < 5 {
        errs.push("Minimum 5 lectures recommended".to_string());
    }

    let any_uploaded = sections
        .iter()
        .any(|s| s.lectures.iter().any(|l| l.has_resolved_video()));
    if !any_uploaded {
        errs.push("Upload at least one lecture video".to_string());
    }

    errs
}
