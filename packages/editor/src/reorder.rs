//! # Drag Reordering
//!
//! Turns continuous hover feedback from a drag layer into discrete
//! reorder requests.
//!
//! A move fires only once the pointer crosses the vertical midpoint of the
//! hovered block in the direction of travel:
//!
//! ```text
//!  dragging down (drag < hover)        dragging up (drag > hover)
//!  ┌──────────────┐ top                ┌──────────────┐ top
//!  │   no move    │                    │     move     │
//!  ├ ─ ─ ─ ─ ─ ─ ─┤ midpoint           ├ ─ ─ ─ ─ ─ ─ ─┤ midpoint
//!  │     move     │                    │   no move    │
//!  └──────────────┘ bottom             └──────────────┘ bottom
//! ```
//!
//! Without that hysteresis, a pointer resting near a boundary would swap
//! the two blocks back and forth on every event.

/// One hover notification from the drag layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverEvent {
    /// Current index of the dragged block
    pub drag_index: usize,
    /// Index of the block under the pointer
    pub hover_index: usize,
    pub pointer_y: f32,
    /// Vertical bounds of the hovered block, same coordinate space as
    /// `pointer_y`
    pub bounds_top: f32,
    pub bounds_bottom: f32,
}

impl HoverEvent {
    fn pointer_offset(&self) -> f32 {
        self.pointer_y - self.bounds_top
    }

    fn midpoint_offset(&self) -> f32 {
        (self.bounds_bottom - self.bounds_top) / 2.0
    }
}

/// Move the block at `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

/// The reorder `event` asks for, if it crossed the hovered block's midpoint
pub fn crossing_move(event: &HoverEvent) -> Option<ReorderRequest> {
    let (from, to) = (event.drag_index, event.hover_index);
    if from == to {
        return None;
    }

    let offset = event.pointer_offset();
    let midpoint = event.midpoint_offset();

    if from < to && offset < midpoint {
        return None;
    }
    if from > to && offset > midpoint {
        return None;
    }

    Some(ReorderRequest { from, to })
}

/// Follows the dragged block across a drag session.
///
/// After each applied move the dragged block sits at the hovered index;
/// the tracker remembers that so the next event is measured from the
/// block's new position rather than where the drag started.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    current: Option<usize>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, index: usize) {
        self.current = Some(index);
    }

    pub fn is_dragging(&self) -> bool {
        self.current.is_some()
    }

    /// Live index of the dragged block
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The move `event` calls for. The tracked index, when present, wins
    /// over the event's own `drag_index`.
    pub fn next_move(&self, event: &HoverEvent) -> Option<ReorderRequest> {
        let event = HoverEvent {
            drag_index: self.current.unwrap_or(event.drag_index),
            ..*event
        };
        crossing_move(&event)
    }

    /// Note that `request` was applied
    pub fn record_move(&mut self, request: ReorderRequest) {
        if self.current.is_some() {
            self.current = Some(request.to);
        }
    }

    /// Finish the session, returning where the block ended up
    pub fn end(&mut self) -> Option<usize> {
        self.current.take()
    }
}
