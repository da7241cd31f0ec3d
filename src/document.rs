//! The parsed declaration: authors plus the ordered block sequence.

use serde::{Deserialize, Serialize};

use crate::author::{Author, Stance};
use crate::block::Block;

/// Output of the parser. Never mutated by scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub authors: Vec<Author>,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(authors: Vec<Author>, blocks: Vec<Block>) -> Self {
        Self { authors, blocks }
    }

    /// Look up an author by id.
    pub fn author(&self, id: &str) -> Option<&Author> {
        self.authors.iter().find(|author| author.id == id)
    }

    /// The block carrying passage `number`, if any.
    pub fn passage(&self, number: u32) -> Option<&Block> {
        self.blocks.iter().find(|block| block.number == Some(number))
    }

    /// Blocks that carry a passage number.
    pub fn numbered_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|block| block.number.is_some())
    }

    /// Stance of every author on the selected passage.
    ///
    /// See [`crate::author::stances`].
    pub fn stances(&self, selected: Option<u32>) -> Vec<(&str, Option<Stance>)> {
        crate::author::stances(&self.authors, selected)
    }

    /// Authors for whom no statement was found.
    pub fn authors_without_declaration(&self) -> impl Iterator<Item = &Author> {
        self.authors.iter().filter(|author| author.declaration.is_none())
    }
}
