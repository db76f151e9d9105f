//! Accumulated text blocks of one tutoring conversation.
//!
//! The frontend posts blocks one at a time, each under an identifier. A block
//! posted again under the same identifier replaces the earlier one. The agent
//! always sees the blocks ordered by identifier.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// Identifier of a text block.
///
/// Integer identifiers order numerically and before any string identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockId {
    Number(i64),
    Text(String),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Number(n) => write!(f, "{}", n),
            BlockId::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered mapping of block identifier to block. No eviction.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    blocks: BTreeMap<BlockId, Block>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the block stored under `id`.
    pub fn upsert(&mut self, id: BlockId, block: Block) {
        self.blocks.insert(id, block);
    }

    /// Blocks in identifier order.
    pub fn ordered(&self) -> Vec<Block> {
        self.blocks.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
