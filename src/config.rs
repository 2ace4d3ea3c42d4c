use crate::position::{CharPositions, SourcePosition};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse parser config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid parser config: {0}")]
    Invalid(String),
}

/// Controls how positions are tracked over character input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Columns a tab advances.
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// Start a new line at `first_column` instead of carrying the column over.
    #[serde(default)]
    pub reset_column_on_newline: bool,

    #[serde(default = "default_first_line")]
    pub first_line: usize,

    #[serde(default = "default_first_column")]
    pub first_column: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            reset_column_on_newline: false,
            first_line: default_first_line(),
            first_column: default_first_column(),
        }
    }
}

impl ParserConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_width == 0 {
            return Err(ConfigError::Invalid("tab_width must be at least 1".to_string()));
        }
        if self.first_line == 0 || self.first_column == 0 {
            return Err(ConfigError::Invalid(
                "first_line and first_column are 1-based".to_string(),
            ));
        }
        Ok(())
    }

    pub fn start_position(&self) -> SourcePosition {
        SourcePosition::new(self.first_line, self.first_column)
    }

    pub fn char_positions(&self) -> CharPositions {
        CharPositions {
            tab_width: self.tab_width,
            reset_column_on_newline: self.reset_column_on_newline,
            first_column: self.first_column,
        }
    }
}

fn default_tab_width() -> usize {
    4
}

fn default_first_line() -> usize {
    1
}

fn default_first_column() -> usize {
    1
}
