//! Parser and scoring configuration.
//!
//! Every field has a default reproducing the stock behavior, so an empty
//! TOML document is a valid configuration:
//!
//! ```toml
//! [parser]
//! section_delimiter = "---"
//! statement_markers = ["Moi", "Nous"]
//! drop_trailing_block = true
//! strict_ranges = true
//! matcher = "substring"
//!
//! [score]
//! mitigation_weight = 1
//! desaccord_weight = 2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::block::DEFAULT_STATEMENT_MARKERS;
use crate::errors::ConfigError;
use crate::matching::MatcherKind;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DissentConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub score: ScoreConfig,
}

/// Document segmentation and table ingestion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// A line consisting of exactly this text separates sections.
    pub section_delimiter: String,
    /// Words opening an author statement.
    pub statement_markers: Vec<String>,
    /// Drop the closing block of the main body.
    pub drop_trailing_block: bool,
    /// Fail on a malformed range token instead of skipping it.
    pub strict_ranges: bool,
    pub matcher: MatcherKind,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            section_delimiter: "---".to_string(),
            statement_markers: DEFAULT_STATEMENT_MARKERS.iter().map(|m| m.to_string()).collect(),
            drop_trailing_block: true,
            strict_ranges: true,
            matcher: MatcherKind::Substring,
        }
    }
}

/// Weights of the disagreement score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub mitigation_weight: u32,
    pub desaccord_weight: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            mitigation_weight: 1,
            desaccord_weight: 2,
        }
    }
}

impl DissentConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parse from an in-memory TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }
}
