//! Layout configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SintegraError};

/// Width of the `90` + CNPJ + IE prefix of every totalizer line.
pub const TRAILER_PREFIX_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Total width of a standard line, trailer lines included.
    #[serde(default = "default_line_width")]
    pub line_width: usize,
    /// Characters of a trailer line available to prefix and slots.
    #[serde(default = "default_trailer_budget")]
    pub trailer_budget: usize,
    /// Digits of the zero-padded count inside a trailer slot.
    #[serde(default = "default_count_width")]
    pub count_width: usize,
    #[serde(default = "default_line_terminator")]
    pub line_terminator: String,
}

fn default_line_width() -> usize { 126 }
fn default_trailer_budget() -> usize { 125 }
fn default_count_width() -> usize { 8 }
fn default_line_terminator() -> String { "\r\n".to_string() }

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_width: default_line_width(),
            trailer_budget: default_trailer_budget(),
            count_width: default_count_width(),
            line_terminator: default_line_terminator(),
        }
    }
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Code plus zero-padded count.
    pub fn slot_width(&self) -> usize {
        2 + self.count_width
    }

    pub fn slots_per_line(&self) -> usize {
        self.trailer_budget.saturating_sub(TRAILER_PREFIX_WIDTH) / self.slot_width()
    }

    pub fn validate(&self) -> Result<()> {
        if self.count_width == 0 {
            return Err(SintegraError::Config("countWidth must be positive".into()));
        }
        if self.trailer_budget >= self.line_width {
            return Err(SintegraError::Config(format!(
                "trailerBudget {} must leave room in lineWidth {} for the line count",
                self.trailer_budget, self.line_width
            )));
        }
        if self.slots_per_line() == 0 {
            return Err(SintegraError::Config(format!(
                "trailerBudget {} leaves no room for a {}-char slot after the prefix",
                self.trailer_budget,
                self.slot_width()
            )));
        }
        if self.line_terminator.is_empty() {
            return Err(SintegraError::Config("lineTerminator must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.slot_width(), 10);
        assert_eq!(config.slots_per_line(), 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LayoutConfig::from_json(r#"{"lineTerminator": "\n"}"#).unwrap();
        assert_eq!(config.line_terminator, "\n");
        assert_eq!(config.line_width, 126);
    }

    #[test]
    fn test_rejects_budget_without_slot_room() {
        let err = LayoutConfig::from_json(r#"{"trailerBudget": 35}"#).unwrap_err();
        assert!(matches!(err, SintegraError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = LayoutConfig::from_json("{").unwrap_err();
        assert!(matches!(err, SintegraError::Serialization(_)));
    }
}
