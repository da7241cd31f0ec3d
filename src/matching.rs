//! Strategies for associating an author with one of the statements.
//!
//! The parser scans the statement pool in document order and keeps the
//! first statement the matcher accepts.

use serde::{Deserialize, Serialize};

use crate::author::author_id;

/// Decides whether a statement belongs to an author.
pub trait DeclarationMatcher {
    /// `author_id` is the lowercase `"{prenom} {nom}"`.
    fn matches(&self, author_id: &str, statement: &str) -> bool;

    /// The first statement accepted for this author, if any.
    fn find<'s>(&self, prenom: &str, nom: &str, statements: &'s [String]) -> Option<&'s str> {
        let id = author_id(prenom, nom);
        statements
            .iter()
            .map(String::as_str)
            .find(|statement| self.matches(&id, statement))
    }
}

/// Case-insensitive substring search for the full name.
///
/// "anne dupont" also matches a statement signed "Jeanne Dupont".
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringNameMatcher;

impl DeclarationMatcher for SubstringNameMatcher {
    fn matches(&self, author_id: &str, statement: &str) -> bool {
        statement.to_lowercase().contains(author_id)
    }
}

/// Case-insensitive search for the full name bounded by non-alphanumeric
/// characters on both sides.
#[derive(Debug, Default, Clone, Copy)]
pub struct WholeNameMatcher;

impl DeclarationMatcher for WholeNameMatcher {
    fn matches(&self, author_id: &str, statement: &str) -> bool {
        if author_id.is_empty() {
            return false;
        }
        let haystack = statement.to_lowercase();
        haystack.match_indices(author_id).any(|(pos, found)| {
            let before = haystack[..pos].chars().next_back();
            let after = haystack[pos + found.len()..].chars().next();
            before.map_or(true, |c| !c.is_alphanumeric()) && after.map_or(true, |c| !c.is_alphanumeric())
        })
    }
}

/// Matcher selection as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatcherKind {
    #[default]
    Substring,
    WholeName,
}

impl MatcherKind {
    pub fn matcher(&self) -> Box<dyn DeclarationMatcher + Send + Sync> {
        match self {
            MatcherKind::Substring => Box::new(SubstringNameMatcher),
            MatcherKind::WholeName => Box::new(WholeNameMatcher),
        }
    }
}
