//! Declaration and annotation-table parsing.
//!
//! The declaration is markdown-like text:
//!
//! - a line holding exactly `---` separates sections,
//! - the first section is the main body, split into blocks on blank lines,
//! - every section opening with `Moi` or `Nous` is an author statement.
//!
//! The annotation table is CSV with at least the columns `prenom`, `nom`,
//! `mitigation` and `desaccord`.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::author::Author;
use crate::block::{is_statement, Block};
use crate::config::ParserConfig;
use crate::document::Document;
use crate::errors::{ParseError, ParseResult};
use crate::matching::DeclarationMatcher;
use crate::range::{decompose, decompose_lenient, PassageRange};

/// Columns the annotation table must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["prenom", "nom", "mitigation", "desaccord"];

/// Parse with the default configuration.
pub fn parse(declaration: &str, table: &str) -> ParseResult<Document> {
    DocumentParser::default().parse(declaration, table)
}

/// Turns raw declaration text and an annotation table into a [`Document`].
pub struct DocumentParser {
    config: ParserConfig,
    matcher: Box<dyn DeclarationMatcher + Send + Sync>,
}

impl std::fmt::Debug for DocumentParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentParser")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl DocumentParser {
    /// Create a parser using the matcher named in `config`.
    pub fn new(config: ParserConfig) -> Self {
        let matcher = config.matcher.matcher();
        Self { config, matcher }
    }

    /// Replace the declaration matching strategy.
    pub fn with_matcher(mut self, matcher: impl DeclarationMatcher + Send + Sync + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse both inputs.
    ///
    /// Fails only on the table: a missing required column, an unreadable
    /// CSV record, or (with `strict_ranges`) a malformed range token.
    pub fn parse(&self, declaration: &str, table: &str) -> ParseResult<Document> {
        let sections = self.sections(declaration);
        let statements = self.statements_in(&sections);
        let mut authors = self.parse_table(table)?;
        for author in &mut authors {
            author.declaration = self
                .matcher
                .find(&author.prenom, &author.nom, &statements)
                .map(str::to_string);
        }
        let blocks = self.blocks_in(sections.first().map(String::as_str).unwrap_or(""));

        debug!(
            sections = sections.len(),
            statements = statements.len(),
            authors = authors.len(),
            blocks = blocks.len(),
            "parsed declaration"
        );

        Ok(Document { authors, blocks })
    }

    /// Split on delimiter lines and trim each section.
    pub fn sections(&self, declaration: &str) -> Vec<String> {
        let mut sections = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in declaration.lines() {
            if line.trim_end_matches('\r') == self.config.section_delimiter {
                sections.push(current.join("\n").trim().to_string());
                current.clear();
            } else {
                current.push(line.trim_end_matches('\r'));
            }
        }
        sections.push(current.join("\n").trim().to_string());
        sections
    }

    /// Sections of the whole document that open with a statement marker,
    /// in document order.
    pub fn statements(&self, declaration: &str) -> Vec<String> {
        self.statements_in(&self.sections(declaration))
    }

    fn statements_in(&self, sections: &[String]) -> Vec<String> {
        sections
            .iter()
            .filter(|section| is_statement(section, &self.config.statement_markers[..]))
            .cloned()
            .collect()
    }

    /// Split the main body on blank lines and classify each block.
    pub fn blocks_in(&self, body: &str) -> Vec<Block> {
        let mut chunks = split_blank_lines(body.trim());
        if self.config.drop_trailing_block {
            chunks.pop();
        }
        chunks
            .into_iter()
            .map(|chunk| Block::with_markers(chunk, &self.config.statement_markers[..]))
            .collect()
    }

    /// Read authors from the CSV annotation table.
    pub fn parse_table(&self, table: &str) -> ParseResult<Vec<Author>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(table.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let column = |name: &str| -> ParseResult<usize> {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| ParseError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let [prenom_col, nom_col, mitigation_col, desaccord_col] = [
            column(REQUIRED_COLUMNS[0])?,
            column(REQUIRED_COLUMNS[1])?,
            column(REQUIRED_COLUMNS[2])?,
            column(REQUIRED_COLUMNS[3])?,
        ];

        let mut authors = Vec::new();
        let mut seen = HashSet::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row = index + 1;
            let cell = |col: usize| record.get(col).unwrap_or("");

            let prenom = cell(prenom_col);
            let nom = cell(nom_col);
            if prenom.is_empty() && nom.is_empty() {
                warn!(row, "skipping annotation row without a name");
                continue;
            }

            let mitigation = self.ranges(cell(mitigation_col), row, REQUIRED_COLUMNS[2])?;
            let desaccord = self.ranges(cell(desaccord_col), row, REQUIRED_COLUMNS[3])?;
            let mut author = Author::new(prenom, nom, mitigation, desaccord);

            author.extra = headers
                .iter()
                .enumerate()
                .filter(|(col, header)| {
                    !REQUIRED_COLUMNS.contains(&header.as_str())
                        && !header.is_empty()
                        && record.get(*col).is_some()
                })
                .map(|(col, header)| (header.clone(), cell(col).to_string()))
                .collect::<BTreeMap<_, _>>();

            if !seen.insert(author.id.clone()) {
                warn!(row, id = %author.id, "duplicate author id");
            }
            authors.push(author);
        }

        Ok(authors)
    }

    fn ranges(&self, cell: &str, row: usize, column: &str) -> ParseResult<Vec<PassageRange>> {
        if self.config.strict_ranges {
            return Ok(decompose(cell, row, column)?);
        }
        let (ranges, rejected) = decompose_lenient(cell);
        for token in rejected {
            warn!(row, column, token = %token, "skipping malformed range token");
        }
        Ok(ranges)
    }
}

/// Group lines into chunks separated by whitespace-only lines.
fn split_blank_lines(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                chunks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }
    chunks
}
