//! Plain-text views of scored blocks and author stances.
//!
//! Used for snapshot tests and for eyeballing a scoring pass in a terminal.
//!
//! ```text
//! -    titre       -            1.00  # Déclaration
//! 1    paragraphe  m1 d0 s1     0.00  1. Premier passage.
//! 2    paragraphe  m1 d1 s3     1.00  2. Second passage très…
//! ```

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::author::{Author, Stance};
use crate::score::ScoredBlock;

const DEFAULT_PREVIEW_WIDTH: usize = 40;

/// Shorten the first line of `content` to at most `width` display columns,
/// marking the cut with `…`.
pub fn preview(content: &str, width: usize) -> String {
    let line = content.lines().next().unwrap_or("").trim_end();
    if UnicodeWidthStr::width(line) <= width {
        return line.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for grapheme in line.graphemes(true) {
        let w = UnicodeWidthStr::width(grapheme);
        if used + w + 1 > width {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    let mut out = out.trim_end().to_string();
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(text);
    let mut out = text.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(w)));
    out
}

/// One line per block: number, type, counts, score and a content preview.
pub struct ScoredBlocksDisplay<'a> {
    blocks: &'a [ScoredBlock],
    preview_width: usize,
}

impl<'a> ScoredBlocksDisplay<'a> {
    pub fn new(blocks: &'a [ScoredBlock]) -> Self {
        Self {
            blocks,
            preview_width: DEFAULT_PREVIEW_WIDTH,
        }
    }

    pub fn preview_width(mut self, width: usize) -> Self {
        self.preview_width = width;
        self
    }
}

impl<'a> fmt::Display for ScoredBlocksDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, scored) in self.blocks.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            let number = scored
                .block
                .number
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            let tally = scored.tally.map_or_else(
                || "-".to_string(),
                |t| format!("m{} d{} s{}", t.mitigation, t.desaccord, t.disagreement_score),
            );
            write!(
                f,
                "{:<4} {} {} {:.2}  {}",
                number,
                pad(scored.block.block_type.as_str(), 11),
                pad(&tally, 12),
                scored.score,
                preview(&scored.block.content, self.preview_width)
            )?;
        }
        Ok(())
    }
}

/// One line per author with their stance on the selected passage.
pub struct StancesDisplay<'a> {
    authors: &'a [Author],
    selected: Option<u32>,
}

impl<'a> StancesDisplay<'a> {
    pub fn new(authors: &'a [Author], selected: Option<u32>) -> Self {
        Self { authors, selected }
    }
}

impl<'a> fmt::Display for StancesDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .authors
            .iter()
            .map(|a| UnicodeWidthStr::width(a.display_name().as_str()))
            .max()
            .unwrap_or(0);
        for (idx, author) in self.authors.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            let stance = self
                .selected
                .map(|n| author.stance_on(n))
                .map_or("-", |s: Stance| s.as_str());
            write!(f, "{}  {}", pad(&author.display_name(), width), stance)?;
        }
        Ok(())
    }
}
