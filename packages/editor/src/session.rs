//! # Editor Session
//!
//! The one object the builder UI talks to. It owns the history, the
//! current selection, the id source and the drag tracker, and every change
//! from the block library, the panels, the outline, the canvas or the
//! keyboard goes through it.
//!
//! Each edit is applied to the working document (the waiting candidate, or
//! the committed present when nothing is waiting) and handed to the history
//! as the new candidate. The registered change listener hears about every
//! commit, undo, redo and load.

use crate::blocks::{BlockId, BlockPatch, BlockType, IdGenerator, UuidIdGenerator};
use crate::clock::{Clock, SystemClock};
use crate::history::History;
use crate::reorder::{DragTracker, HoverEvent, ReorderRequest};
use crate::shortcuts::{KeyInput, Shortcut};
use crate::{Document, EditorConfig, Mutation, MutationError};

/// Called with the document after each committed change
pub type ChangeListener = Box<dyn FnMut(&Document)>;

/// Editing session over a single document
pub struct Editor {
    history: History,

    /// Block the user is working on, if any
    selected: Option<BlockId>,

    ids: Box<dyn IdGenerator>,

    drag: DragTracker,

    listener: Option<ChangeListener>,
}

impl Editor {
    /// Session on the system clock with uuid block ids
    pub fn new(document: Document, config: EditorConfig) -> Self {
        Self::with_parts(
            document,
            config,
            Box::new(SystemClock::new()),
            Box::new(UuidIdGenerator),
        )
    }

    pub fn with_parts(
        document: Document,
        config: EditorConfig,
        clock: Box<dyn Clock>,
        mut ids: Box<dyn IdGenerator>,
    ) -> Self {
        observe_ids(ids.as_mut(), &document);
        Self {
            history: History::new(document, &config, clock),
            selected: None,
            ids,
            drag: DragTracker::new(),
            listener: None,
        }
    }

    /// Register the collaborator notified after each committed change
    pub fn on_change(&mut self, listener: impl FnMut(&Document) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// What the canvas should render: the latest edit, committed or not
    pub fn document(&self) -> &Document {
        self.history.working()
    }

    /// Last committed document
    pub fn committed(&self) -> &Document {
        self.history.present()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: &str) -> Result<(), MutationError> {
        if !self.document().contains(id) {
            return Err(MutationError::BlockNotFound(id.to_string()));
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Apply `mutation` to the working document and queue the result.
    ///
    /// Returns the id of a block the mutation created.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<Option<BlockId>, MutationError> {
        let outcome = match mutation.apply(self.history.working(), self.ids.as_mut()) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(mutation = mutation.name(), error = %err, "mutation rejected");
                return Err(err);
            }
        };

        if let Mutation::DeleteBlock { block_id } = mutation {
            if self.selected.as_deref() == Some(block_id.as_str()) {
                self.selected = None;
            }
        }
        if let Some(id) = &outcome.created {
            self.selected = Some(id.clone());
        }

        tracing::trace!(mutation = mutation.name(), "mutation applied");
        self.history.record(outcome.document);
        Ok(outcome.created)
    }

    pub fn add_block(&mut self, block_type: BlockType) -> BlockId {
        let (document, id) = self
            .history
            .working()
            .add_block(block_type, self.ids.as_mut());
        self.selected = Some(id.clone());
        self.history.record(document);
        id
    }

    /// Add a block by its wire tag; unknown tags are rejected
    pub fn add_block_by_tag(&mut self, block_type: &str) -> Result<BlockId, MutationError> {
        let created = self.apply(&Mutation::AddBlock {
            block_type: block_type.to_string(),
            overrides: None,
        })?;
        created.ok_or_else(|| MutationError::UnknownBlockType(block_type.to_string()))
    }

    pub fn update_block(&mut self, id: &str, patch: BlockPatch) -> Result<(), MutationError> {
        self.apply(&Mutation::UpdateBlock {
            block_id: id.to_string(),
            patch,
        })
        .map(|_| ())
    }

    pub fn delete_block(&mut self, id: &str) -> Result<(), MutationError> {
        self.apply(&Mutation::DeleteBlock {
            block_id: id.to_string(),
        })
        .map(|_| ())
    }

    pub fn reorder_block(&mut self, from: usize, to: usize) -> Result<(), MutationError> {
        self.apply(&Mutation::ReorderBlock { from, to }).map(|_| ())
    }

    /// Duplicate `id`, returning the copy's id
    pub fn duplicate_block(&mut self, id: &str) -> Result<BlockId, MutationError> {
        let created = self.apply(&Mutation::DuplicateBlock {
            block_id: id.to_string(),
        })?;
        created.ok_or_else(|| MutationError::BlockNotFound(id.to_string()))
    }

    pub fn toggle_visibility(&mut self, id: &str) -> Result<(), MutationError> {
        self.apply(&Mutation::ToggleVisibility {
            block_id: id.to_string(),
        })
        .map(|_| ())
    }

    pub fn move_block_up(&mut self, id: &str) -> Result<(), MutationError> {
        self.apply(&Mutation::MoveBlockUp {
            block_id: id.to_string(),
        })
        .map(|_| ())
    }

    pub fn move_block_down(&mut self, id: &str) -> Result<(), MutationError> {
        self.apply(&Mutation::MoveBlockDown {
            block_id: id.to_string(),
        })
        .map(|_| ())
    }

    /// Drive the debounce; call from the host loop. True when a history
    /// entry was committed.
    pub fn tick(&mut self) -> bool {
        match self.history.tick() {
            Some(document) => {
                if let Some(listener) = self.listener.as_mut() {
                    listener(document);
                }
                true
            }
            None => false,
        }
    }

    /// Commit any waiting edit immediately (before a save, say)
    pub fn flush(&mut self) -> bool {
        match self.history.flush() {
            Some(document) => {
                if let Some(listener) = self.listener.as_mut() {
                    listener(document);
                }
                true
            }
            None => false,
        }
    }

    /// Undo the last committed change. A waiting edit is discarded first.
    ///
    /// Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let discarded = self.history.is_debouncing();
        let moved = self.history.undo().is_some();
        self.after_restore(moved || discarded);
        moved
    }

    /// Redo the last undone change. A waiting edit is discarded first.
    pub fn redo(&mut self) -> bool {
        let discarded = self.history.is_debouncing();
        let moved = self.history.redo().is_some();
        self.after_restore(moved || discarded);
        moved
    }

    /// Switch to another document; history starts over
    pub fn load(&mut self, document: Document) {
        observe_ids(self.ids.as_mut(), &document);
        self.history.reset(document);
        self.drag.end();
        self.after_restore(true);
    }

    fn after_restore(&mut self, changed: bool) {
        if let Some(id) = &self.selected {
            if !self.history.present().contains(id) {
                self.selected = None;
            }
        }

        if changed {
            if let Some(listener) = self.listener.as_mut() {
                listener(self.history.present());
            }
        }
    }

    /// Route a key press. Returns the shortcut that ran, if any.
    pub fn handle_key(&mut self, input: &KeyInput) -> Result<Option<Shortcut>, MutationError> {
        let Some(shortcut) = Shortcut::from_input(input) else {
            return Ok(None);
        };

        match shortcut {
            Shortcut::Undo => {
                self.undo();
            }
            Shortcut::Redo => {
                self.redo();
            }
            Shortcut::DeleteSelected
            | Shortcut::DuplicateSelected
            | Shortcut::MoveSelectedUp
            | Shortcut::MoveSelectedDown => {
                let Some(id) = self.selected.clone() else {
                    return Ok(None);
                };
                match shortcut {
                    Shortcut::DeleteSelected => self.delete_block(&id)?,
                    Shortcut::DuplicateSelected => {
                        self.duplicate_block(&id)?;
                    }
                    Shortcut::MoveSelectedUp => self.move_block_up(&id)?,
                    _ => self.move_block_down(&id)?,
                }
            }
        }

        Ok(Some(shortcut))
    }

    pub fn drag_begin(&mut self, index: usize) {
        self.drag.begin(index);
    }

    /// Feed one hover event; applies at most one reorder
    pub fn drag_hover(
        &mut self,
        event: &HoverEvent,
    ) -> Result<Option<ReorderRequest>, MutationError> {
        let Some(request) = self.drag.next_move(event) else {
            return Ok(None);
        };

        self.reorder_block(request.from, request.to)?;
        self.drag.record_move(request);
        Ok(Some(request))
    }

    pub fn drag_end(&mut self) -> Option<usize> {
        self.drag.end()
    }
}

fn observe_ids(ids: &mut dyn IdGenerator, document: &Document) {
    for block in document.blocks() {
        ids.observe(&block.id);
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("history", &self.history)
            .field("selected", &self.selected)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}
