//! # Document Values
//!
//! A [`Document`] is the ordered block list plus its metadata. Documents are
//! values: every operation here takes `&self` and returns a new document,
//! so any earlier value (a history snapshot, a renderer's copy) stays valid.
//!
//! Blocks are stored behind [`Arc`]. Copying a document copies pointers,
//! and an update clones only the block it touches (`Arc::make_mut`), so
//! snapshots share every block that did not change. Equality is still
//! structural.
//!
//! ## Lifecycle
//!
//! ```text
//! new / from_json → add · update · delete · reorder · duplicate → to_json
//!        ↓                          ↓                               ↓
//!     skeleton                 new values                    collaborator
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::blocks::{Block, BlockId, BlockPatch, BlockType, IdGenerator};
use crate::{EditorError, MutationError};

const COPY_SUFFIX: &str = " (copy)";

/// An ordered collection of blocks plus metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "DocumentData")]
pub struct Document {
    id: String,
    name: String,
    #[serde(default)]
    category: String,
    /// Render order
    #[serde(default)]
    blocks: Vec<Arc<Block>>,
}

/// Wire form before the block ids are checked for uniqueness
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentData {
    id: String,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    blocks: Vec<Arc<Block>>,
}

impl TryFrom<DocumentData> for Document {
    type Error = EditorError;

    fn try_from(data: DocumentData) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for block in &data.blocks {
            if !seen.insert(block.id.as_str()) {
                return Err(EditorError::DuplicateBlockId(block.id.clone()));
            }
        }

        Ok(Self {
            id: data.id,
            name: data.name,
            category: data.category,
            blocks: data.blocks,
        })
    }
}

impl Document {
    /// Fresh, empty document
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), name, category)
    }

    /// Empty document with a known id
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            blocks: Vec::new(),
        }
    }

    /// Parse a document handed over by a loading collaborator.
    ///
    /// Rejects documents whose block ids are not unique.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let data: DocumentData = serde_json::from_str(json)?;
        Document::try_from(data)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in render order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().map(|block| block.as_ref())
    }

    pub fn block_ids(&self) -> Vec<&str> {
        self.blocks.iter().map(|block| block.id.as_str()).collect()
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|block| block.id == id)
            .map(|block| block.as_ref())
    }

    pub fn block_at(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index).map(|block| block.as_ref())
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// True when both documents hold the very same block allocation at
    /// `index`
    pub fn shares_block(&self, other: &Document, index: usize) -> bool {
        match (self.blocks.get(index), other.blocks.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), MutationError> {
        if index < self.blocks.len() {
            Ok(())
        } else {
            Err(MutationError::IndexOutOfRange {
                index,
                len: self.blocks.len(),
            })
        }
    }

    fn require(&self, id: &str) -> Result<usize, MutationError> {
        self.position(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.to_string()))
    }

    /// Draw ids until one is unused in this document
    fn fresh_id(&self, kind: BlockType, ids: &mut dyn IdGenerator) -> BlockId {
        loop {
            let id = ids.next_id(kind);
            if !self.contains(&id) {
                return id;
            }
        }
    }

    fn with_blocks(&self, blocks: Vec<Arc<Block>>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            blocks,
        }
    }

    /// Append a new block of `kind` with default content
    pub fn add_block(&self, kind: BlockType, ids: &mut dyn IdGenerator) -> (Self, BlockId) {
        let block = Block::new(self.fresh_id(kind, ids), kind);
        self.append_block(block, ids)
    }

    /// Append an already built block, re-keying it if its id is taken
    pub fn append_block(&self, mut block: Block, ids: &mut dyn IdGenerator) -> (Self, BlockId) {
        if self.contains(&block.id) {
            block.id = self.fresh_id(block.block_type(), ids);
        }

        let id = block.id.clone();
        let mut blocks = self.blocks.clone();
        blocks.push(Arc::new(block));
        (self.with_blocks(blocks), id)
    }

    /// Merge `patch` into the block with `id`. Only that block is copied.
    pub fn update_block(&self, id: &str, patch: &BlockPatch) -> Result<Self, MutationError> {
        let index = self.require(id)?;

        let mut blocks = self.blocks.clone();
        // The cloned Vec shares the Arc, so make_mut copies this block only
        Arc::make_mut(&mut blocks[index]).apply_patch(patch)?;
        Ok(self.with_blocks(blocks))
    }

    pub fn delete_block(&self, id: &str) -> Result<Self, MutationError> {
        let index = self.require(id)?;

        let mut blocks = self.blocks.clone();
        blocks.remove(index);
        Ok(self.with_blocks(blocks))
    }

    /// Move the block at `from` to `to`, shifting the blocks in between
    pub fn reorder_block(&self, from: usize, to: usize) -> Result<Self, MutationError> {
        self.check_index(from)?;
        self.check_index(to)?;

        let mut blocks = self.blocks.clone();
        if from != to {
            let block = blocks.remove(from);
            blocks.insert(to, block);
        }
        Ok(self.with_blocks(blocks))
    }

    /// Insert a copy of `id` right after it
    pub fn duplicate_block(
        &self,
        id: &str,
        ids: &mut dyn IdGenerator,
    ) -> Result<(Self, BlockId), MutationError> {
        let index = self.require(id)?;
        let source = &self.blocks[index];

        let mut copy = Block::clone(source);
        copy.id = self.fresh_id(source.block_type(), ids);
        copy.title = format!("{}{}", source.title, COPY_SUFFIX);

        let new_id = copy.id.clone();
        let mut blocks = self.blocks.clone();
        blocks.insert(index + 1, Arc::new(copy));
        Ok((self.with_blocks(blocks), new_id))
    }

    pub fn toggle_visibility(&self, id: &str) -> Result<Self, MutationError> {
        let visible = self
            .block(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.to_string()))?
            .visible;
        self.update_block(id, &BlockPatch::new().visible(!visible))
    }

    /// Swap with the previous block; unchanged at the top
    pub fn move_block_up(&self, id: &str) -> Result<Self, MutationError> {
        let index = self.require(id)?;
        match index.checked_sub(1) {
            Some(to) => self.reorder_block(index, to),
            None => Ok(self.clone()),
        }
    }

    /// Swap with the next block; unchanged at the bottom
    pub fn move_block_down(&self, id: &str) -> Result<Self, MutationError> {
        let index = self.require(id)?;
        if index + 1 < self.blocks.len() {
            self.reorder_block(index, index + 1)
        } else {
            Ok(self.clone())
        }
    }

    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn with_category(&self, category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..self.clone()
        }
    }
}
