//! Severity → verdict reduction.

use knowledge::Severity;

use crate::types::SafetyLevel;

/// Reduce the severities of every match in a scan to a single verdict.
///
/// Precedence is `High > Moderate > Low > none`. Flare mode only touches the
/// Moderate tier, escalating it from `Caution` to `Avoid`.
pub fn compute_status<I>(severities: I, flare_mode: bool) -> SafetyLevel
where
    I: IntoIterator<Item = Severity>,
{
    match severities.into_iter().max() {
        None => SafetyLevel::NotFound,
        Some(Severity::High) => SafetyLevel::Avoid,
        Some(Severity::Moderate) if flare_mode => SafetyLevel::Avoid,
        Some(Severity::Moderate) => SafetyLevel::Caution,
        Some(Severity::Low) => SafetyLevel::Safe,
    }
}
