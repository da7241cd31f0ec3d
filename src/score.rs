//! Per-passage disagreement scoring.
//!
//! [`score`] is a pure function of the blocks, the authors, a display
//! [`Mode`] and an [`AuthorFilter`]. It counts, for every numbered block,
//! the mitigation and disagreement ranges of the active authors containing
//! the block's number, weighs them into a raw disagreement score and
//! rescales that score onto the range selected by the mode.

use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::author::Author;
use crate::block::Block;
use crate::config::ScoreConfig;
use crate::document::Document;
use crate::scale::{extent, LinearScale};

/// Score assigned to blocks that carry no disagreement score.
pub const UNSCORED: f64 = 1.0;

/// Display intent selecting the output range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Constant range `[1, 1]`: nothing is materialized.
    #[default]
    Original,
    /// Inverted range `[1, 0]`: the least contested passages score highest.
    Accords,
    /// Range `[0, 1]`: the most contested passages score highest.
    Desaccords,
}

impl Mode {
    /// Output range `(value at min score, value at max score)`.
    pub fn target_range(&self) -> (f64, f64) {
        match self {
            Mode::Accords => (1.0, 0.0),
            Mode::Desaccords => (0.0, 1.0),
            Mode::Original => (1.0, 1.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Original => "original",
            Mode::Accords => "accords",
            Mode::Desaccords => "desaccords",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown names fall back to [`Mode::Original`].
impl FromStr for Mode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "accords" => Mode::Accords,
            "desaccords" => Mode::Desaccords,
            "original" => Mode::Original,
            other => {
                warn!(mode = other, "unknown display mode, using original");
                Mode::Original
            }
        })
    }
}

/// Author ids currently selected by the consumer. Empty means everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorFilter {
    ids: BTreeSet<String>,
}

impl AuthorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an author (their panel was opened).
    pub fn open(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    /// Deselect an author (their panel was closed).
    pub fn close(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Flip the selection of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// The selected authors, or all of them when none is selected.
    pub fn active<'a>(&self, authors: &'a [Author]) -> Vec<&'a Author> {
        let selected: Vec<&Author> = authors.iter().filter(|a| self.contains(&a.id)).collect();
        if selected.is_empty() {
            authors.iter().collect()
        } else {
            selected
        }
    }
}

impl<S: Into<String>> FromIterator<S> for AuthorFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Counts for one numbered block over the active authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub mitigation: u32,
    pub desaccord: u32,
    /// `mitigation * mitigation_weight + desaccord * desaccord_weight`,
    /// saturating at `u32::MAX`.
    pub disagreement_score: u32,
}

impl Tally {
    /// Count the ranges of `authors` containing `number`.
    pub fn count(number: u32, authors: &[&Author], weights: &ScoreConfig) -> Self {
        let mitigation = authors.iter().map(|a| a.mitigation_count(number)).sum::<u32>();
        let desaccord = authors.iter().map(|a| a.desaccord_count(number)).sum::<u32>();
        Self {
            mitigation,
            desaccord,
            disagreement_score: mitigation
                .saturating_mul(weights.mitigation_weight)
                .saturating_add(desaccord.saturating_mul(weights.desaccord_weight)),
        }
    }
}

/// A block annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBlock {
    #[serde(flatten)]
    pub block: Block,
    /// Present exactly when the block has a number.
    #[serde(flatten)]
    pub tally: Option<Tally>,
    /// Normalized value in the mode's range; [`UNSCORED`] without a tally.
    pub score: f64,
}

impl ScoredBlock {
    pub fn disagreement_score(&self) -> Option<u32> {
        self.tally.map(|t| t.disagreement_score)
    }
}

/// Score blocks with the default weights.
pub fn score(blocks: &[Block], authors: &[Author], mode: Mode, filter: &AuthorFilter) -> Vec<ScoredBlock> {
    score_with(blocks, authors, mode, filter, &ScoreConfig::default())
}

/// Score blocks with explicit weights.
pub fn score_with(
    blocks: &[Block],
    authors: &[Author],
    mode: Mode,
    filter: &AuthorFilter,
    weights: &ScoreConfig,
) -> Vec<ScoredBlock> {
    let active = filter.active(authors);
    let tallies: Vec<Option<Tally>> = blocks
        .iter()
        .map(|block| block.number.map(|n| Tally::count(n, &active, weights)))
        .collect();

    let (min, max) = extent(tallies.iter().flatten().map(|t| t.disagreement_score));
    let scale = LinearScale::new((min as f64, max as f64), mode.target_range());

    debug!(
        mode = %mode,
        active_authors = active.len(),
        min,
        max,
        "scored blocks"
    );

    blocks
        .iter()
        .zip(tallies)
        .map(|(block, tally)| ScoredBlock {
            block: block.clone(),
            tally,
            score: tally.map_or(UNSCORED, |t| scale.apply(t.disagreement_score as f64)),
        })
        .collect()
}

/// Serialize scored blocks for the presentation layer.
pub fn to_json(blocks: &[ScoredBlock]) -> serde_json::Result<String> {
    serde_json::to_string(blocks)
}

impl Document {
    /// Score this document's blocks with the default weights.
    pub fn score(&self, mode: Mode, filter: &AuthorFilter) -> Vec<ScoredBlock> {
        score(&self.blocks, &self.authors, mode, filter)
    }
}

/// Caches [`score_with`] results per `(mode, filter)` for one document.
#[derive(Debug)]
pub struct MemoScorer<'d> {
    document: &'d Document,
    weights: ScoreConfig,
    cache: HashMap<(Mode, AuthorFilter), Vec<ScoredBlock>>,
}

impl<'d> MemoScorer<'d> {
    pub fn new(document: &'d Document) -> Self {
        Self::with_weights(document, ScoreConfig::default())
    }

    pub fn with_weights(document: &'d Document, weights: ScoreConfig) -> Self {
        Self {
            document,
            weights,
            cache: HashMap::new(),
        }
    }

    pub fn score(&mut self, mode: Mode, filter: &AuthorFilter) -> &[ScoredBlock] {
        let document = self.document;
        let weights = self.weights;
        self.cache
            .entry((mode, filter.clone()))
            .or_insert_with(|| score_with(&document.blocks, &document.authors, mode, filter, &weights))
    }

    /// Number of cached `(mode, filter)` entries.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::PassageRange;

    fn blocks() -> Vec<Block> {
        vec![
            Block::from_content("Titre"),
            Block::from_content("1. Un"),
            Block::from_content("2. Deux"),
            Block::from_content("3. Trois"),
        ]
    }

    fn authors() -> Vec<Author> {
        vec![
            Author::new("Jeanne", "Dupont", vec![PassageRange::new(1, 2)], vec![PassageRange::single(3)]),
            Author::new("Paul", "Martin", vec![], vec![PassageRange::new(2, 3)]),
        ]
    }

    fn scores(scored: &[ScoredBlock]) -> Vec<f64> {
        scored.iter().map(|b| b.score).collect()
    }

    #[test]
    fn test_weighting() {
        let only_mitigation = vec![Author::new("A", "B", vec![PassageRange::single(10)], vec![])];
        let only_desaccord = vec![Author::new("A", "B", vec![], vec![PassageRange::single(10)])];
        let blocks = vec![Block::from_content("10. Dix")];

        let scored = score(&blocks, &only_mitigation, Mode::Original, &AuthorFilter::new());
        assert_eq!(scored[0].disagreement_score(), Some(1));
        let scored = score(&blocks, &only_desaccord, Mode::Original, &AuthorFilter::new());
        assert_eq!(scored[0].tally, Some(Tally { mitigation: 0, desaccord: 1, disagreement_score: 2 }));
    }

    #[test]
    fn test_counts_over_all_authors() {
        let scored = score(&blocks(), &authors(), Mode::Desaccords, &AuthorFilter::new());
        let raw: Vec<_> = scored.iter().map(|b| b.disagreement_score()).collect();
        // 1: one mitigation, 2: one mitigation + one desaccord, 3: two desaccords
        assert_eq!(raw, vec![None, Some(1), Some(3), Some(4)]);
        assert_eq!(scores(&scored), vec![1.0, 0.0, 2.0 / 3.0, 1.0]);
    }

    #[test]
    fn test_filter_restricts_and_falls_back() {
        let filter: AuthorFilter = ["paul martin"].into_iter().collect();
        let scored = score(&blocks(), &authors(), Mode::Desaccords, &filter);
        let raw: Vec<_> = scored.iter().map(|b| b.disagreement_score()).collect();
        assert_eq!(raw, vec![None, Some(0), Some(2), Some(2)]);

        let everyone: AuthorFilter = ["jeanne dupont", "paul martin"].into_iter().collect();
        let unknown: AuthorFilter = ["personne"].into_iter().collect();
        let empty = score(&blocks(), &authors(), Mode::Accords, &AuthorFilter::new());
        assert_eq!(empty, score(&blocks(), &authors(), Mode::Accords, &everyone));
        assert_eq!(empty, score(&blocks(), &authors(), Mode::Accords, &unknown));
    }

    #[test]
    fn test_mode_ranges() {
        let blocks = vec![
            Block::from_content("1. Zéro"),
            Block::from_content("2. Quatre"),
        ];
        let authors = vec![Author::new("A", "B", vec![], vec![PassageRange::single(2), PassageRange::single(2)])];
        let accords = score(&blocks, &authors, Mode::Accords, &AuthorFilter::new());
        assert_eq!(accords[0].disagreement_score(), Some(0));
        assert_eq!(accords[1].disagreement_score(), Some(4));
        assert_eq!(scores(&accords), vec![1.0, 0.0]);
        assert_eq!(scores(&score(&blocks, &authors, Mode::Desaccords, &AuthorFilter::new())), vec![0.0, 1.0]);
        assert_eq!(scores(&score(&blocks, &authors, Mode::Original, &AuthorFilter::new())), vec![1.0, 1.0]);
    }

    #[test]
    fn test_degenerate_extent() {
        let authors = vec![Author::new("A", "B", vec![PassageRange::new(1, 3)], vec![])];
        let scored = score(&blocks(), &authors, Mode::Desaccords, &AuthorFilter::new());
        assert_eq!(scores(&scored), vec![1.0, 0.0, 0.0, 0.0]);
        let scored = score(&blocks(), &authors, Mode::Accords, &AuthorFilter::new());
        assert_eq!(scores(&scored), vec![1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_no_numbered_blocks() {
        let blocks = vec![Block::from_content("Titre"), Block::from_content("Moi, seul.")];
        let scored = score(&blocks, &authors(), Mode::Desaccords, &AuthorFilter::new());
        assert!(scored.iter().all(|b| b.tally.is_none() && b.score == UNSCORED));
        assert!(score(&[], &[], Mode::Accords, &AuthorFilter::new()).is_empty());
    }

    #[test]
    fn test_no_authors() {
        let scored = score(&blocks(), &[], Mode::Desaccords, &AuthorFilter::new());
        assert_eq!(scores(&scored), vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(scored[1].tally.map(|t| t.disagreement_score), Some(0));
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoreConfig { mitigation_weight: 3, desaccord_weight: 1 };
        let scored = score_with(&blocks(), &authors(), Mode::Original, &AuthorFilter::new(), &weights);
        let raw: Vec<_> = scored.iter().map(|b| b.disagreement_score()).collect();
        assert_eq!(raw, vec![None, Some(3), Some(4), Some(2)]);
    }

    #[test]
    fn test_huge_weights_saturate() {
        let config = crate::config::DissentConfig::from_toml_str(
            "[score]\nmitigation_weight = 4000000000\ndesaccord_weight = 4000000000\n",
        )
        .unwrap();
        let authors = vec![
            Author::new("A", "B", vec![PassageRange::single(1)], vec![PassageRange::single(2)]),
            Author::new("C", "D", vec![PassageRange::single(1)], vec![]),
        ];
        let blocks = vec![Block::from_content("1. Un"), Block::from_content("2. Deux"), Block::from_content("3. Trois")];
        let scored = score_with(&blocks, &authors, Mode::Desaccords, &AuthorFilter::new(), &config.score);
        let raw: Vec<_> = scored.iter().map(|b| b.disagreement_score()).collect();
        assert_eq!(raw, vec![Some(u32::MAX), Some(4_000_000_000), Some(0)]);
        assert_eq!(scores(&scored)[0], 1.0);
        assert_eq!(scores(&scored)[2], 0.0);
    }

    #[test]
    fn test_idempotent_and_input_untouched() {
        let blocks = blocks();
        let authors = authors();
        let filter: AuthorFilter = ["jeanne dupont"].into_iter().collect();
        let first = score(&blocks, &authors, Mode::Accords, &filter);
        let second = score(&blocks, &authors, Mode::Accords, &filter);
        assert_eq!(to_json(&first).unwrap(), to_json(&second).unwrap());
        assert_eq!(blocks, self::blocks());
        assert!(first.iter().zip(&blocks).all(|(s, b)| &s.block == b));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("accords".parse::<Mode>().unwrap(), Mode::Accords);
        assert_eq!("desaccords".parse::<Mode>().unwrap(), Mode::Desaccords);
        assert_eq!("original".parse::<Mode>().unwrap(), Mode::Original);
        assert_eq!("taille".parse::<Mode>().unwrap(), Mode::Original);
        assert_eq!(Mode::Accords.to_string(), "accords");
    }

    #[test]
    fn test_filter_toggling() {
        let mut filter = AuthorFilter::new();
        filter.open("jeanne dupont");
        assert!(filter.toggle("paul martin"));
        assert!(!filter.toggle("jeanne dupont"));
        assert_eq!(filter.iter().collect::<Vec<_>>(), vec!["paul martin"]);
        filter.close("paul martin");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let scored = score(&blocks()[..2], &authors(), Mode::Desaccords, &AuthorFilter::new());
        let json: serde_json::Value = serde_json::from_str(&to_json(&scored).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"content": "Titre", "type": "titre", "score": 1.0},
                {
                    "content": "1. Un",
                    "number": 1,
                    "type": "paragraphe",
                    "mitigation": 1,
                    "desaccord": 0,
                    "disagreementScore": 1,
                    "score": 0.0
                }
            ])
        );
    }

    #[test]
    fn test_memo_scorer_matches_score() {
        let document = Document::new(authors(), blocks());
        let filter: AuthorFilter = ["paul martin"].into_iter().collect();
        let mut memo = MemoScorer::new(&document);

        let direct = document.score(Mode::Desaccords, &filter);
        assert_eq!(memo.score(Mode::Desaccords, &filter), direct.as_slice());
        assert_eq!(memo.score(Mode::Desaccords, &filter), direct.as_slice());
        assert_eq!(memo.cached(), 1);

        memo.score(Mode::Accords, &AuthorFilter::new());
        assert_eq!(memo.cached(), 2);
    }
}
