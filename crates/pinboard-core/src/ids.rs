//! Identifier allocation for shapes and canvases.

use serde::{Deserialize, Serialize};

/// Identifier of a shape. Unique within a workspace's lifetime.
pub type ShapeId = u64;

/// Identifier of a canvas document.
pub type CanvasId = u64;

/// Monotonic id counter.
///
/// Every call to [`IdAllocator::next`] returns a value strictly greater than
/// anything returned before. Ids are never recycled, even after the thing
/// they named has been deleted, so references held outside the model (a
/// duplicated document, a persisted snapshot) can never collide with live ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    last: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Create an allocator whose first id is `1`.
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Create an allocator whose first id is `max + 1`.
    pub fn seeded_above(max: u64) -> Self {
        Self { last: max }
    }

    /// Issue the next id.
    pub fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Raise the floor so later ids are greater than `id`. Never lowers it.
    pub fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }

    /// The most recently issued (or observed) id, `0` if none.
    pub fn last_issued(&self) -> u64 {
        self.last
    }
}
