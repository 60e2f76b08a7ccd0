//! Linear undo/redo over whole-collection snapshots.

use crate::element::Element;

/// A full copy of the element collection.
pub type Snapshot = Vec<Element>;

/// Ordered snapshots plus a cursor into them.
///
/// Committing after an undo discards every snapshot past the cursor.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl History {
    /// Start a history at an initial snapshot.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// The active snapshot.
    pub fn current(&self) -> &[Element] {
        &self.snapshots[self.cursor]
    }

    /// Mutable access to the active snapshot for transient flags only.
    pub(crate) fn current_mut(&mut self) -> &mut Snapshot {
        &mut self.snapshots[self.cursor]
    }

    /// Truncate the future, append `next`, and advance the cursor.
    pub fn commit(&mut self, next: Snapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(next);
        self.cursor += 1;
        log::debug!("Committed snapshot {} of {}", self.cursor, self.snapshots.len());
    }

    /// Step back one snapshot. Returns `None` when already at the start.
    pub fn undo(&mut self) -> Option<&[Element]> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        log::debug!("Undo to snapshot {}", self.cursor);
        Some(self.current())
    }

    /// Step forward one snapshot. Returns `None` when already at the end.
    pub fn redo(&mut self) -> Option<&[Element]> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        log::debug!("Redo to snapshot {}", self.cursor);
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of stored snapshots, including the initial one.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
