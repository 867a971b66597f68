//! # Pagesmith Editor
//!
//! Document model and undo/redo core of the Pagesmith block builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: closed set of block variants        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document + mutations: value-producing edits │
//! │  - add / update / delete / reorder / dup    │
//! │  - blocks shared between versions (Arc)     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ history: debounced, bounded, linear undo    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: selection, shortcuts, drag, notify │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Documents are values**: every edit returns a new document, earlier
//!    ones stay valid as snapshots
//! 2. **One entry per burst**: rapid edits coalesce into a single undo step
//! 3. **Undo sees committed state only**: a waiting edit is dropped first
//! 4. **Explicit context**: no global store; the host owns an [`Editor`]
//! 5. **Virtual time**: the debounce reads an injected [`Clock`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagesmith_editor::{BlockPatch, BlockType, Document, Editor, EditorConfig};
//!
//! let mut editor = Editor::new(Document::new("Spring sale", "product"), EditorConfig::default());
//! editor.on_change(|doc| println!("{} blocks", doc.len()));
//!
//! let hero = editor.add_block(BlockType::Hero);
//! editor.update_block(&hero, BlockPatch::new().title("Welcome"))?;
//!
//! // From the host event loop
//! editor.tick();
//!
//! editor.undo();
//! ```

mod blocks;
mod clock;
mod config;
mod document;
mod errors;
mod history;
mod mutations;
mod reorder;
mod session;
mod shortcuts;

pub use blocks::{
    create_block, BenefitsContent, Block, BlockContent, BlockId, BlockPatch, BlockType, Columns,
    CtaContent, FaqContent, FaqItem, FeatureItem, FeaturesContent, GalleryContent, GalleryImage,
    HeroContent, IdGenerator, ImageContent, MediaTextContent, SequentialIdGenerator, SpecRow,
    SpecificationsContent, StyleMap, TextContent, UuidIdGenerator, VideoContent,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EditorConfig, DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_HISTORY};
pub use document::Document;
pub use errors::EditorError;
pub use history::{History, HistoryPhase};
pub use mutations::{Mutation, MutationError, MutationOutcome};
pub use reorder::{crossing_move, DragTracker, HoverEvent, ReorderRequest};
pub use session::{ChangeListener, Editor};
pub use shortcuts::{FocusTarget, Key, KeyInput, Modifiers, Shortcut};
