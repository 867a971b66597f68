//! # Undo/Redo History
//!
//! Linear past/present/future timeline of committed documents.
//!
//! ## Design
//!
//! - Edits arrive as candidate documents via [`History::record`]
//! - A candidate waits out the debounce window; a newer candidate replaces
//!   it and restarts the window, so only the last state of a burst commits
//! - [`History::tick`] commits once the deadline has passed; a candidate
//!   equal to `present` is dropped without creating an entry
//! - Committing clears `future` (no branches) and evicts the oldest `past`
//!   entry beyond `max_history`
//! - Undo, redo and reset discard a waiting candidate before doing anything
//!   else, so they always act on committed state
//!
//! ```text
//!            record              deadline + tick
//!   Idle ─────────────▶ Debouncing ───────────────▶ commit ─▶ Idle
//!                        │    ▲ record (re-arm)
//!                        └────┘
//!   undo / redo / reset: Debouncing ─▶ Idle (candidate dropped)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! let clock = ManualClock::new(0);
//! let mut history = History::new(doc, &EditorConfig::default(), Box::new(clock.clone()));
//!
//! history.record(edited);
//! clock.advance(300);
//! history.tick();          // edited is now present
//!
//! history.undo();          // back to doc
//! history.redo();          // edited again
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use crate::clock::Clock;
use crate::config::EditorConfig;
use crate::document::Document;

/// Where the debounce state machine currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPhase {
    /// No candidate waiting
    Idle,
    /// A candidate is waiting for its deadline
    Debouncing,
}

/// Uncommitted candidate and the clock time it becomes eligible
#[derive(Debug, Clone)]
struct Pending {
    candidate: Document,
    deadline: u64,
}

/// Debounced, bounded, linear history of documents
#[derive(Debug)]
pub struct History {
    /// Committed states before `present` (most recent last)
    past: VecDeque<Document>,

    /// The last committed document
    present: Document,

    /// Undone states (next redo first)
    future: VecDeque<Document>,

    /// At most one outstanding candidate
    pending: Option<Pending>,

    max_history: usize,

    debounce_ms: u64,

    clock: Box<dyn Clock>,
}

impl History {
    pub fn new(initial: Document, config: &EditorConfig, clock: Box<dyn Clock>) -> Self {
        let config = config.clone().with_defaults();
        Self {
            past: VecDeque::new(),
            present: initial,
            future: VecDeque::new(),
            pending: None,
            max_history: config.max_history,
            debounce_ms: config.debounce_ms,
            clock,
        }
    }

    /// Last committed document
    pub fn present(&self) -> &Document {
        &self.present
    }

    /// Waiting candidate if any, else `present`. Edits build on this.
    pub fn working(&self) -> &Document {
        self.pending
            .as_ref()
            .map(|pending| &pending.candidate)
            .unwrap_or(&self.present)
    }

    pub fn phase(&self) -> HistoryPhase {
        if self.pending.is_some() {
            HistoryPhase::Debouncing
        } else {
            HistoryPhase::Idle
        }
    }

    pub fn is_debouncing(&self) -> bool {
        self.pending.is_some()
    }

    /// Clock time at which the waiting candidate becomes committable
    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// How long a host loop should wait before the next [`History::tick`]
    pub fn time_until_commit(&self) -> Option<Duration> {
        let now = self.clock.now_millis();
        self.deadline()
            .map(|deadline| Duration::from_millis(deadline.saturating_sub(now)))
    }

    /// Take `candidate` as the latest edit and (re)start the debounce window
    pub fn record(&mut self, candidate: Document) {
        let deadline = self.clock.now_millis().saturating_add(self.debounce_ms);
        if self.pending.is_some() {
            tracing::trace!(deadline, "debounce re-armed");
        }
        self.pending = Some(Pending {
            candidate,
            deadline,
        });
    }

    /// Commit the waiting candidate if its deadline has passed.
    ///
    /// Returns the new `present` when an entry was created.
    pub fn tick(&mut self) -> Option<&Document> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| self.clock.now_millis() >= pending.deadline);

        if due {
            self.flush()
        } else {
            None
        }
    }

    /// Commit the waiting candidate now, regardless of its deadline
    pub fn flush(&mut self) -> Option<&Document> {
        let pending = self.pending.take()?;
        if self.commit(pending.candidate) {
            Some(&self.present)
        } else {
            None
        }
    }

    /// Drop the waiting candidate without committing it
    pub fn cancel_pending(&mut self) -> Option<Document> {
        let pending = self.pending.take()?;
        tracing::debug!("pending edit discarded");
        Some(pending.candidate)
    }

    fn commit(&mut self, candidate: Document) -> bool {
        if candidate == self.present {
            tracing::debug!("candidate equals present, nothing to commit");
            return false;
        }

        let previous = std::mem::replace(&mut self.present, candidate);
        self.push_past(previous);
        self.future.clear();

        tracing::debug!(
            past = self.past.len(),
            blocks = self.present.len(),
            "history entry committed"
        );
        true
    }

    fn push_past(&mut self, document: Document) {
        self.past.push_back(document);

        // Evict oldest first
        while self.past.len() > self.max_history {
            self.past.pop_front();
        }
    }

    /// Step back one committed state. No-op (besides dropping a waiting
    /// candidate) when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&Document> {
        self.cancel_pending();

        let restored = self.past.pop_back()?;
        let superseded = std::mem::replace(&mut self.present, restored);
        self.future.push_front(superseded);

        tracing::debug!(
            past = self.past.len(),
            future = self.future.len(),
            "undo"
        );
        Some(&self.present)
    }

    /// Step forward one undone state
    pub fn redo(&mut self) -> Option<&Document> {
        self.cancel_pending();

        let restored = self.future.pop_front()?;
        let superseded = std::mem::replace(&mut self.present, restored);
        self.push_past(superseded);

        tracing::debug!(
            past = self.past.len(),
            future = self.future.len(),
            "redo"
        );
        Some(&self.present)
    }

    /// Start over from `document` with an empty timeline
    pub fn reset(&mut self, document: Document) {
        self.pending = None;
        self.past.clear();
        self.future.clear();
        self.present = document;
        tracing::debug!(document = self.present.id(), "history reset");
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Committed states before `present`, oldest first
    pub fn past(&self) -> impl Iterator<Item = &Document> + '_ {
        self.past.iter()
    }

    /// Undone states, next redo first
    pub fn future(&self) -> impl Iterator<Item = &Document> + '_ {
        self.future.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockPatch, BlockType, SequentialIdGenerator};
    use crate::clock::ManualClock;

    fn setup(max_history: usize) -> (History, ManualClock, Document) {
        let clock = ManualClock::new(0);
        let doc = Document::with_id("doc-1", "Test", "general");
        let config = EditorConfig {
            max_history,
            debounce_ms: 300,
        };
        let history = History::new(doc.clone(), &config, Box::new(clock.clone()));
        (history, clock, doc)
    }

    #[test]
    fn test_history_creation() {
        let (history, _, doc) = setup(50);
        assert_eq!(history.present(), &doc);
        assert_eq!(history.phase(), HistoryPhase::Idle);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_commit_waits_for_deadline() {
        let (mut history, clock, doc) = setup(50);
        let mut ids = SequentialIdGenerator::new();
        let (edited, _) = doc.add_block(BlockType::Hero, &mut ids);

        history.record(edited.clone());
        assert_eq!(history.phase(), HistoryPhase::Debouncing);
        assert_eq!(history.working(), &edited);
        assert_eq!(history.present(), &doc);

        clock.advance(299);
        assert!(history.tick().is_none());
        assert_eq!(history.time_until_commit(), Some(Duration::from_millis(1)));

        clock.advance(1);
        assert_eq!(history.tick(), Some(&edited));
        assert_eq!(history.phase(), HistoryPhase::Idle);
        assert_eq!(history.past_len(), 1);
    }

    #[test]
    fn test_record_rearms_deadline() {
        let (mut history, clock, doc) = setup(50);
        let mut ids = SequentialIdGenerator::new();
        let (first, _) = doc.add_block(BlockType::Text, &mut ids);

        history.record(first.clone());
        clock.advance(200);
        history.record(first.renamed("Second"));
        clock.advance(200);

        // 400ms since the first edit, 200ms since the latest
        assert!(history.tick().is_none());

        clock.advance(100);
        assert!(history.tick().is_some());
        assert_eq!(history.present().name(), "Second");
        assert_eq!(history.past_len(), 1);
    }

    #[test]
    fn test_reverted_edit_creates_no_entry() {
        let (mut history, clock, doc) = setup(50);

        history.record(doc.renamed("Temp"));
        history.record(doc.clone());
        clock.advance(300);

        assert!(history.tick().is_none());
        assert_eq!(history.past_len(), 0);
        assert_eq!(history.phase(), HistoryPhase::Idle);
    }

    #[test]
    fn test_commit_clears_future() {
        let (mut history, _, doc) = setup(50);

        history.record(doc.renamed("A"));
        history.flush();
        history.undo();
        assert_eq!(history.future_len(), 1);

        history.record(doc.renamed("B"));
        history.flush();
        assert_eq!(history.future_len(), 0);
    }

    #[test]
    fn test_max_history_enforced() {
        let (mut history, _, doc) = setup(2);

        for i in 0..5 {
            history.record(doc.renamed(format!("v{i}")));
            history.flush();
            assert!(history.past_len() <= 2);
        }

        assert_eq!(history.past_len(), 2);
        // Oldest entries evicted first
        let names: Vec<_> = history.past().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["v2", "v3"]);
    }

    #[test]
    fn test_undo_redo_moves_between_stacks() {
        let (mut history, _, doc) = setup(50);
        history.record(doc.renamed("A"));
        history.flush();
        history.record(doc.renamed("B"));
        history.flush();

        assert_eq!(history.undo().map(|d| d.name()), Some("A"));
        assert_eq!(history.undo().map(|d| d.name()), Some("Test"));
        assert!(history.undo().is_none());
        assert_eq!(history.future_len(), 2);

        assert_eq!(history.redo().map(|d| d.name()), Some("A"));
        assert_eq!(history.redo().map(|d| d.name()), Some("B"));
        assert!(history.redo().is_none());
        assert_eq!(history.past_len(), 2);
    }

    #[test]
    fn test_undo_discards_pending_candidate() {
        let (mut history, clock, doc) = setup(50);
        history.record(doc.renamed("Committed"));
        history.flush();

        history.record(doc.renamed("In flight"));
        assert_eq!(history.undo().map(|d| d.name()), Some("Test"));
        assert!(!history.is_debouncing());

        // The discarded candidate never commits later
        clock.advance(1000);
        assert!(history.tick().is_none());
        assert_eq!(history.future().next().map(|d| d.name()), Some("Committed"));
    }

    #[test]
    fn test_redo_discards_pending_candidate() {
        let (mut history, _, doc) = setup(50);
        history.record(doc.renamed("A"));
        history.flush();
        history.undo();

        history.record(doc.renamed("Typing"));
        assert_eq!(history.redo().map(|d| d.name()), Some("A"));
        assert_eq!(history.working().name(), "A");
    }

    #[test]
    fn test_undo_with_empty_past_still_drops_candidate() {
        let (mut history, _, doc) = setup(50);
        history.record(doc.renamed("Typing"));

        assert!(history.undo().is_none());
        assert_eq!(history.working(), &doc);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut history, clock, doc) = setup(50);
        history.record(doc.renamed("A"));
        history.flush();
        history.undo();
        history.record(doc.renamed("Pending"));

        let other = Document::with_id("doc-2", "Other", "product");
        history.reset(other.clone());

        assert_eq!(history.present(), &other);
        assert_eq!(history.past_len(), 0);
        assert_eq!(history.future_len(), 0);
        clock.advance(1000);
        assert!(history.tick().is_none());
        assert_eq!(history.present(), &other);
    }

    #[test]
    fn test_snapshots_share_unchanged_blocks() {
        let (mut history, _, doc) = setup(50);
        let mut ids = SequentialIdGenerator::new();
        let (doc, _) = doc.add_block(BlockType::Hero, &mut ids);
        let (doc, _) = doc.add_block(BlockType::Text, &mut ids);
        history.reset(doc.clone());

        let edited = doc
            .update_block("text-1", &BlockPatch::new().title("Body"))
            .unwrap();
        history.record(edited);
        history.flush();

        let before = history.past().last().unwrap();
        assert!(history.present().shares_block(before, 0));
        assert!(!history.present().shares_block(before, 1));
    }

    #[test]
    fn test_huge_debounce_saturates_instead_of_wrapping() {
        let clock = ManualClock::new(0);
        let doc = Document::with_id("doc-1", "Test", "general");
        let config = EditorConfig {
            max_history: 50,
            debounce_ms: u64::MAX,
        };
        let mut history = History::new(doc.clone(), &config, Box::new(clock.clone()));
        let mut ids = SequentialIdGenerator::new();
        let (edited, _) = doc.add_block(BlockType::Hero, &mut ids);

        clock.advance(1);
        history.record(edited.clone());
        assert_eq!(history.deadline(), Some(u64::MAX));

        clock.advance(1_000_000);
        assert!(history.tick().is_none());
        assert_eq!(history.present(), &doc);

        assert_eq!(history.flush(), Some(&edited));
    }
}
