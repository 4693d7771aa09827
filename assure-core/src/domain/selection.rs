// assure-core/src/domain/selection.rs

use crate::domain::assessment::{Assessment, AssessmentStatus};

/// Preference rank of an assessment when picking the one a document row shows.
/// Finished beats running beats anything else.
///
/// `reviewed` is a completed assessment that a consultant has since signed off,
/// so it ranks with `completed` rather than falling to the "any" tier.
fn rank(status: AssessmentStatus) -> u8 {
    match status {
        AssessmentStatus::Completed | AssessmentStatus::Reviewed => 2,
        AssessmentStatus::InProgress => 1,
        AssessmentStatus::Pending | AssessmentStatus::Failed | AssessmentStatus::Unknown => 0,
    }
}

/// Picks the current assessment of a document.
///
/// Within the best tier the most recently created one wins; undated assessments
/// keep server order (first wins).
pub fn select_current_assessment(assessments: &[Assessment]) -> Option<&Assessment> {
    let best = assessments.iter().map(|a| rank(a.status)).max()?;
    assessments
        .iter()
        .filter(|a| rank(a.status) == best)
        .fold(None, |current: Option<&Assessment>, candidate| match current {
            None => Some(candidate),
            Some(c) => match (c.created_at, candidate.created_at) {
                (Some(old), Some(new)) if new > old => Some(candidate),
                (None, Some(_)) => Some(candidate),
                _ => Some(c),
            },
        })
}
