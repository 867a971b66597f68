//! # Document Mutations
//!
//! Semantic operations on a block document.
//!
//! ## Design Principles
//!
//! 1. **Value-producing**: Applying a mutation never touches the input
//!    document; it returns a new one
//! 2. **Validated**: Unknown ids and out-of-range indices are rejected
//!    before anything is built
//! 3. **Serializable**: Scripts and remote callers send the same enum the
//!    editor session applies
//!
//! ## Mutation Semantics
//!
//! ### ReorderBlock
//! - Remove at `from`, reinsert at `to`, intervening blocks shift by one
//! - `from == to` is a no-op
//!
//! ### DuplicateBlock
//! - Copy lands directly after the source, with a fresh id and a
//!   `" (copy)"` title suffix
//!
//! ### UpdateBlock
//! - Shallow merge of the patch; other blocks keep their shared storage

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blocks::{create_block, BlockId, BlockPatch, BlockType, IdGenerator};
use crate::document::Document;

/// Semantic mutations on a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Append a new block built from its type tag
    AddBlock {
        block_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        overrides: Option<BlockPatch>,
    },

    /// Merge a partial update into one block
    UpdateBlock { block_id: BlockId, patch: BlockPatch },

    DeleteBlock { block_id: BlockId },

    /// Move the block at `from` to `to`
    ReorderBlock { from: usize, to: usize },

    DuplicateBlock { block_id: BlockId },

    ToggleVisibility { block_id: BlockId },

    MoveBlockUp { block_id: BlockId },

    MoveBlockDown { block_id: BlockId },

    RenameDocument { name: String },

    SetCategory { category: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Index {index} out of range for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Content of a {found} block cannot be applied to a {expected} block")]
    VariantMismatch { expected: BlockType, found: BlockType },
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    /// The new document value
    pub document: Document,

    /// Id of the block the mutation created (add, duplicate)
    pub created: Option<BlockId>,
}

impl MutationOutcome {
    fn changed(document: Document) -> Self {
        Self {
            document,
            created: None,
        }
    }

    fn created(document: Document, id: BlockId) -> Self {
        Self {
            document,
            created: Some(id),
        }
    }
}

impl Mutation {
    /// Apply to `doc`, producing a new document
    pub fn apply(
        &self,
        doc: &Document,
        ids: &mut dyn IdGenerator,
    ) -> Result<MutationOutcome, MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::AddBlock {
                block_type,
                overrides,
            } => {
                let block = create_block(block_type, overrides.as_ref(), ids)?;
                let (document, id) = doc.append_block(block, ids);
                Ok(MutationOutcome::created(document, id))
            }

            Mutation::UpdateBlock { block_id, patch } => {
                doc.update_block(block_id, patch).map(MutationOutcome::changed)
            }

            Mutation::DeleteBlock { block_id } => {
                doc.delete_block(block_id).map(MutationOutcome::changed)
            }

            Mutation::ReorderBlock { from, to } => {
                doc.reorder_block(*from, *to).map(MutationOutcome::changed)
            }

            Mutation::DuplicateBlock { block_id } => {
                let (document, id) = doc.duplicate_block(block_id, ids)?;
                Ok(MutationOutcome::created(document, id))
            }

            Mutation::ToggleVisibility { block_id } => {
                doc.toggle_visibility(block_id).map(MutationOutcome::changed)
            }

            Mutation::MoveBlockUp { block_id } => {
                doc.move_block_up(block_id).map(MutationOutcome::changed)
            }

            Mutation::MoveBlockDown { block_id } => {
                doc.move_block_down(block_id).map(MutationOutcome::changed)
            }

            Mutation::RenameDocument { name } => Ok(MutationOutcome::changed(doc.renamed(name))),

            Mutation::SetCategory { category } => {
                Ok(MutationOutcome::changed(doc.with_category(category)))
            }
        }
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> Result<(), MutationError> {
        match self {
            Mutation::AddBlock { block_type, .. } => {
                block_type.parse::<BlockType>()?;
                Ok(())
            }

            Mutation::UpdateBlock { block_id, patch } => {
                let block = doc
                    .block(block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;

                match &patch.content {
                    Some(content) if content.block_type() != block.block_type() => {
                        Err(MutationError::VariantMismatch {
                            expected: block.block_type(),
                            found: content.block_type(),
                        })
                    }
                    _ => Ok(()),
                }
            }

            Mutation::DeleteBlock { block_id }
            | Mutation::DuplicateBlock { block_id }
            | Mutation::ToggleVisibility { block_id }
            | Mutation::MoveBlockUp { block_id }
            | Mutation::MoveBlockDown { block_id } => {
                doc.position(block_id)
                    .map(|_| ())
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))
            }

            Mutation::ReorderBlock { from, to } => {
                doc.check_index(*from)?;
                doc.check_index(*to)
            }

            Mutation::RenameDocument { .. } | Mutation::SetCategory { .. } => Ok(()),
        }
    }

    /// Debug name, used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "addBlock",
            Mutation::UpdateBlock { .. } => "updateBlock",
            Mutation::DeleteBlock { .. } => "deleteBlock",
            Mutation::ReorderBlock { .. } => "reorderBlock",
            Mutation::DuplicateBlock { .. } => "duplicateBlock",
            Mutation::ToggleVisibility { .. } => "toggleVisibility",
            Mutation::MoveBlockUp { .. } => "moveBlockUp",
            Mutation::MoveBlockDown { .. } => "moveBlockDown",
            Mutation::RenameDocument { .. } => "renameDocument",
            Mutation::SetCategory { .. } => "setCategory",
        }
    }

    /// Id of the block this mutation targets, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Mutation::UpdateBlock { block_id, .. }
            | Mutation::DeleteBlock { block_id }
            | Mutation::DuplicateBlock { block_id }
            | Mutation::ToggleVisibility { block_id }
            | Mutation::MoveBlockUp { block_id }
            | Mutation::MoveBlockDown { block_id } => Some(block_id),
            Mutation::AddBlock { .. }
            | Mutation::ReorderBlock { .. }
            | Mutation::RenameDocument { .. }
            | Mutation::SetCategory { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::SequentialIdGenerator;

    fn doc_with(types: &[BlockType]) -> (Document, SequentialIdGenerator) {
        let mut ids = SequentialIdGenerator::new();
        let mut doc = Document::new("Landing", "general");
        for kind in types {
            doc = doc.add_block(*kind, &mut ids).0;
        }
        (doc, ids)
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::UpdateBlock {
            block_id: "text-1".to_string(),
            patch: BlockPatch::new().title("Intro"),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        assert!(json.contains(r#""op":"updateBlock""#));
        assert!(json.contains(r#""blockId":"text-1""#));

        let deserialized: Mutation = serde_json::from_str(&json).unwrap();
        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_add_block_reports_created_id() {
        let (doc, mut ids) = doc_with(&[]);
        let mutation = Mutation::AddBlock {
            block_type: "hero".to_string(),
            overrides: None,
        };

        let outcome = mutation.apply(&doc, &mut ids).unwrap();
        assert_eq!(outcome.created.as_deref(), Some("hero-1"));
        assert_eq!(outcome.document.len(), 1);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_validation_rejects_unknown_type() {
        let (doc, _) = doc_with(&[]);
        let mutation = Mutation::AddBlock {
            block_type: "banner".to_string(),
            overrides: None,
        };

        assert_eq!(
            mutation.validate(&doc),
            Err(MutationError::UnknownBlockType("banner".to_string()))
        );
    }

    #[test]
    fn test_validation_rejects_missing_ids() {
        let (doc, _) = doc_with(&[BlockType::Text]);

        for mutation in [
            Mutation::DeleteBlock {
                block_id: "".to_string(),
            },
            Mutation::DuplicateBlock {
                block_id: "hero-9".to_string(),
            },
            Mutation::ToggleVisibility {
                block_id: "nope".to_string(),
            },
        ] {
            assert!(matches!(
                mutation.validate(&doc),
                Err(MutationError::BlockNotFound(_))
            ));
        }
    }

    #[test]
    fn test_validation_rejects_bad_indices() {
        let (doc, mut ids) = doc_with(&[BlockType::Hero, BlockType::Text]);
        let mutation = Mutation::ReorderBlock { from: 0, to: 2 };

        assert_eq!(
            mutation.apply(&doc, &mut ids).unwrap_err(),
            MutationError::IndexOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn test_update_with_foreign_content_is_rejected() {
        let (doc, mut ids) = doc_with(&[BlockType::Text]);
        let mutation = Mutation::UpdateBlock {
            block_id: "text-1".to_string(),
            patch: BlockPatch::new()
                .content(crate::blocks::BlockContent::default_for(BlockType::Faq)),
        };

        assert!(matches!(
            mutation.apply(&doc, &mut ids),
            Err(MutationError::VariantMismatch { .. })
        ));
    }

    #[test]
    fn test_target_of_block_mutations() {
        let mutation = Mutation::MoveBlockDown {
            block_id: "faq-1".to_string(),
        };
        assert_eq!(mutation.target(), Some("faq-1"));
        assert_eq!(Mutation::ReorderBlock { from: 0, to: 1 }.target(), None);
    }
}
