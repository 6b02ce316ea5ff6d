//! Color theme for CLI output

use crate::domain::intent::ResourceKind;
use crate::domain::provision::IntentOutcome;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for an intent outcome
    pub fn outcome_color(&self, outcome: &IntentOutcome) -> TableColor {
        match outcome {
            IntentOutcome::Succeeded { .. } => self.success,
            IntentOutcome::Failed { .. } => self.error,
            IntentOutcome::SkippedDueToDependencyFailure { .. } => self.warning,
            IntentOutcome::Cancelled => self.muted,
        }
    }

    pub fn kind_color(&self, kind: ResourceKind) -> TableColor {
        match kind {
            ResourceKind::NodePool => self.muted,
            _ => self.info,
        }
    }
}

/// Convert comfy_table::Color to colored::Color string representation
pub fn table_color_to_colored_str(color: TableColor) -> &'static str {
    match color {
        TableColor::Green => "green",
        TableColor::Yellow => "yellow",
        TableColor::Red => "red",
        TableColor::Cyan => "cyan",
        TableColor::DarkGrey => "bright black",
        _ => "white",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::ProviderError;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_outcome_color() {
        let theme = ColorTheme::default();
        let ok = IntentOutcome::Succeeded {
            identity: "gs://logs".to_string(),
        };
        let failed = IntentOutcome::Failed {
            error: ProviderError::api("bucket/logs", "denied"),
        };
        assert_eq!(theme.outcome_color(&ok), TableColor::Green);
        assert_eq!(theme.outcome_color(&failed), TableColor::Red);
        assert_eq!(theme.outcome_color(&IntentOutcome::Cancelled), TableColor::DarkGrey);
    }

    #[test]
    fn test_colored_names() {
        assert_eq!(table_color_to_colored_str(TableColor::DarkGrey), "bright black");
        assert_eq!(table_color_to_colored_str(TableColor::Magenta), "white");
    }
}
