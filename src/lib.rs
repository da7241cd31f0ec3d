#![doc(
    issue_tracker_base_url = "https://github.com/storyscript/layered-dissent/issues/"
)]

//! Disagreement mapping over a collectively signed declaration.
//!
//! Contributors annotate a numbered declaration with the passages they
//! partially endorse (*mitigation*) or reject (*désaccord*). This crate turns
//! the raw declaration text and the annotation table into a [`Document`],
//! then scores every numbered passage so a presentation layer can map the
//! score onto opacity, color or size.
//!
//! ## Pipeline
//!
//! 1. [`parse`] / [`DocumentParser`] - segments the declaration into typed
//!    [`Block`]s and reads [`Author`]s with their [`PassageRange`]s.
//! 2. [`score`] - a pure function of blocks, authors, [`Mode`] and
//!    [`AuthorFilter`], re-run on every mode or filter change.
//!
//! ## Example
//!
//! ```
//! use layered_dissent::{parse, score, AuthorFilter, Mode};
//!
//! let declaration = "# Titre\n\n1. Un.\n\n2. Deux.\n\nFin\n---\nMoi, Jeanne Dupont, je signe.";
//! let table = "prenom,nom,mitigation,desaccord\nJeanne,Dupont,1,2\n";
//!
//! let doc = parse(declaration, table).unwrap();
//! assert_eq!(doc.blocks.len(), 3);
//! assert!(doc.authors[0].declaration.is_some());
//!
//! let scored = score(&doc.blocks, &doc.authors, Mode::Desaccords, &AuthorFilter::new());
//! assert_eq!(scored[1].score, 0.0);
//! assert_eq!(scored[2].score, 1.0);
//! ```

mod author;
mod block;
mod config;
mod display;
mod document;
mod errors;
mod matching;
mod parser;
mod range;
mod scale;
mod score;

pub use author::{author_id, stances, Author, Stance};
pub use block::{is_statement, leading_number, Block, BlockType, DEFAULT_STATEMENT_MARKERS};
pub use config::{DissentConfig, ParserConfig, ScoreConfig};
pub use display::{preview, ScoredBlocksDisplay, StancesDisplay};
pub use document::Document;
pub use errors::{ConfigError, MalformedRangeError, ParseError, ParseResult};
pub use matching::{DeclarationMatcher, MatcherKind, SubstringNameMatcher, WholeNameMatcher};
pub use parser::{parse, DocumentParser, REQUIRED_COLUMNS};
pub use range::{count_containing, decompose, decompose_lenient, parse_token, PassageRange};
pub use scale::{extent, LinearScale};
pub use score::{score, score_with, to_json, AuthorFilter, MemoScorer, Mode, ScoredBlock, Tally, UNSCORED};
