//! Status icons for CLI output

use crate::domain::provision::IntentOutcome;

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Resource created
    pub const SUCCESS: &'static str = "✓";

    /// Skipped because a dependency failed
    pub const WARNING: &'static str = "⚠";

    /// Provider call failed
    pub const ERROR: &'static str = "✗";

    /// Planned, not yet applied
    pub const PENDING: &'static str = "⏳";

    /// Never started
    pub const CANCELLED: &'static str = "⊘";

    pub fn for_outcome(outcome: &IntentOutcome) -> &'static str {
        match outcome {
            IntentOutcome::Succeeded { .. } => Self::SUCCESS,
            IntentOutcome::Failed { .. } => Self::ERROR,
            IntentOutcome::SkippedDueToDependencyFailure { .. } => Self::WARNING,
            IntentOutcome::Cancelled => Self::CANCELLED,
        }
    }

    /// Get status text for an outcome
    pub fn get_status_text(outcome: &IntentOutcome) -> &'static str {
        match outcome {
            IntentOutcome::Succeeded { .. } => "Created",
            IntentOutcome::Failed { .. } => "Failed",
            IntentOutcome::SkippedDueToDependencyFailure { .. } => "Skipped",
            IntentOutcome::Cancelled => "Cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::{DependencyError, ProviderError};
    use std::time::Duration;

    #[test]
    fn test_icon_per_outcome() {
        let ok = IntentOutcome::Succeeded {
            identity: "c1".to_string(),
        };
        let timed_out = IntentOutcome::Failed {
            error: ProviderError::timeout("cluster/c1", Duration::from_secs(1)),
        };
        let skipped = IntentOutcome::SkippedDueToDependencyFailure {
            error: DependencyError::new("node_pool/c1preemptible", "cluster/c1"),
        };
        assert_eq!(StatusIcon::for_outcome(&ok), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::for_outcome(&timed_out), StatusIcon::ERROR);
        assert_eq!(StatusIcon::for_outcome(&skipped), StatusIcon::WARNING);
        assert_eq!(
            StatusIcon::for_outcome(&IntentOutcome::Cancelled),
            StatusIcon::CANCELLED
        );
    }

    #[test]
    fn test_get_status_text() {
        assert_eq!(StatusIcon::get_status_text(&IntentOutcome::Cancelled), "Cancelled");
        let skipped = IntentOutcome::SkippedDueToDependencyFailure {
            error: DependencyError::new("node_pool/a", "cluster/a"),
        };
        assert_eq!(StatusIcon::get_status_text(&skipped), "Skipped");
    }
}
