use std::collections::HashSet;
use std::sync::Arc;

use crate::editing::{patch::BlockPatch, reorder};
use crate::error::EditorError;
use crate::models::{Block, BlockBody, BlockId, BlockKind, HeadingLevel};

/// Immutable view of the block array
///
/// Every mutation produces a fresh array. Blocks that a mutation did not touch
/// are shared by pointer with the previous array, so `Arc::ptr_eq` tells a
/// renderer exactly which blocks need recomputing.
pub type Blocks = Arc<[Arc<Block>]>;

/// Ordered, id-unique list of blocks
#[derive(Debug, Clone)]
pub struct DocumentStore {
    blocks: Blocks,
    /// Incremented on each committed mutation
    version: u64,
    heading_level: HeadingLevel,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self {
            blocks: Arc::from(Vec::new()),
            version: 0,
            heading_level: HeadingLevel::H2,
        }
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a document supplied by the host
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, EditorError> {
        let mut seen = HashSet::with_capacity(blocks.len());
        for block in &blocks {
            if !seen.insert(block.id) {
                return Err(EditorError::DuplicateBlockId(block.id));
            }
        }

        Ok(Self {
            blocks: blocks.into_iter().map(Arc::new).collect(),
            ..Self::default()
        })
    }

    /// Level given to headings created by `insert`
    pub fn with_heading_level(mut self, level: HeadingLevel) -> Self {
        self.heading_level = level;
        self
    }

    pub fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: BlockId) -> Option<&Arc<Block>> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|block| block.id).collect()
    }

    /// Append a new block of `kind`, with `defaults` applied over the type defaults
    pub fn insert(
        &mut self,
        kind: BlockKind,
        defaults: &BlockPatch,
    ) -> Result<Arc<Block>, EditorError> {
        self.insert_at(self.blocks.len(), kind, defaults)
    }

    /// Insert a new block directly below `anchor`
    pub fn insert_after(
        &mut self,
        anchor: BlockId,
        kind: BlockKind,
        defaults: &BlockPatch,
    ) -> Result<Arc<Block>, EditorError> {
        let index = self
            .index_of(anchor)
            .ok_or(EditorError::BlockNotFound(anchor))?;
        self.insert_at(index + 1, kind, defaults)
    }

    pub fn insert_at(
        &mut self,
        index: usize,
        kind: BlockKind,
        defaults: &BlockPatch,
    ) -> Result<Arc<Block>, EditorError> {
        if index > self.blocks.len() {
            return Err(EditorError::OutOfBounds {
                index,
                len: self.blocks.len(),
            });
        }

        let fresh = Block::new(BlockBody::empty(kind, self.heading_level));
        let block = Arc::new(defaults.apply_to(&fresh)?);

        let mut next = self.blocks.to_vec();
        next.insert(index, Arc::clone(&block));
        self.commit(next);
        Ok(block)
    }

    /// Merge `patch` into the block with `id`
    ///
    /// A patch that leaves the block unchanged commits nothing, so the array
    /// and version stay as they were.
    pub fn update(&mut self, id: BlockId, patch: &BlockPatch) -> Result<(), EditorError> {
        let index = self.index_of(id).ok_or(EditorError::BlockNotFound(id))?;
        let current = &self.blocks[index];
        let updated = patch.apply_to(current)?;
        if updated == **current {
            return Ok(());
        }

        let mut next = self.blocks.to_vec();
        next[index] = Arc::new(updated);
        self.commit(next);
        Ok(())
    }

    /// Remove the block with `id`; unknown ids are ignored
    pub fn delete(&mut self, id: BlockId) -> Option<Arc<Block>> {
        let index = self.index_of(id)?;
        let mut next = self.blocks.to_vec();
        let removed = next.remove(index);
        self.commit(next);
        Some(removed)
    }

    /// Move the block at `from` so it ends up at `to`
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        let len = self.blocks.len();
        for index in [from, to] {
            if index >= len {
                return Err(EditorError::OutOfBounds { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let next = reorder::array_move(&self.blocks[..], from, to);
        self.commit(next);
        Ok(())
    }

    fn commit(&mut self, blocks: Vec<Arc<Block>>) {
        self.blocks = Arc::from(blocks);
        self.version += 1;
    }
}
