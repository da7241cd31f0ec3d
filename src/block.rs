//! Typed segments of the declaration body.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.").expect("Invalid leading number regex"));

/// Markers that open an individual author statement.
pub const DEFAULT_STATEMENT_MARKERS: &[&str] = &["Moi", "Nous"];

/// Kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Heading, carries no number.
    Titre,
    /// Numbered body text.
    Paragraphe,
    /// An author's "Moi/Nous …" statement embedded in the body.
    Declaration,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Titre => "titre",
            BlockType::Paragraphe => "paragraphe",
            BlockType::Declaration => "declaration",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One segment of the declaration body, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Raw text of the segment.
    pub content: String,
    /// Passage ordinal, absent for headings and most statements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(rename = "type")]
    pub block_type: BlockType,
}

impl Block {
    /// Build a block from raw text using the default statement markers.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self::with_markers(content, DEFAULT_STATEMENT_MARKERS)
    }

    /// Build a block, extracting its number and classifying it.
    pub fn with_markers<S: AsRef<str>>(content: impl Into<String>, markers: &[S]) -> Self {
        let content = content.into();
        let number = leading_number(&content);
        let block_type = if is_statement(&content, markers) {
            BlockType::Declaration
        } else if number.is_some() {
            BlockType::Paragraphe
        } else {
            BlockType::Titre
        };
        Self {
            content,
            number,
            block_type,
        }
    }
}

/// The integer opening `text` when it is immediately followed by a period.
///
/// Only positive values count; `0.` and values overflowing `u32` yield `None`.
pub fn leading_number(text: &str) -> Option<u32> {
    let captures = LEADING_NUMBER.captures(text)?;
    let number: u32 = captures.get(1)?.as_str().parse().ok()?;
    if number == 0 {
        None
    } else {
        Some(number)
    }
}

/// Whether the trimmed `text` opens with one of `markers` as a whole word.
///
/// `"Moi, Jeanne"` and `"Nous soussignés"` match; `"Moitié"` does not.
pub fn is_statement<S: AsRef<str>>(text: &str, markers: &[S]) -> bool {
    let text = text.trim_start();
    markers.iter().any(|marker| {
        let marker = marker.as_ref();
        !marker.is_empty()
            && text.starts_with(marker)
            && text[marker.len()..]
                .chars()
                .next()
                .map_or(true, |next| !next.is_alphanumeric())
    })
}
