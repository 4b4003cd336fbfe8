//! Linear undo/redo history of editor snapshots.

use crate::state::HistorySnapshot;

/// Snapshot list with a cursor.
///
/// The snapshot at the cursor always equals the live editor state. Recording
/// discards everything after the cursor.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<HistorySnapshot>,
    index: Option<usize>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor position, `None` while the history is empty.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no snapshot is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Whether a step back is possible.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    /// Whether a step forward is possible.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.snapshots.len())
    }

    /// Append a snapshot after the cursor, discarding any redo branch.
    pub fn record(&mut self, snapshot: HistorySnapshot) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push(snapshot);
        self.index = Some(self.snapshots.len() - 1);
    }

    /// Step back and return the snapshot to restore.
    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        let index = self.index.filter(|&i| i > 0)? - 1;
        self.index = Some(index);
        self.snapshots.get(index)
    }

    /// Step forward and return the snapshot to restore.
    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        let index = self.index? + 1;
        let snapshot = self.snapshots.get(index)?;
        self.index = Some(index);
        Some(snapshot)
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::Slide;
    use crate::state::CanvasState;

    fn snapshot(title: &str) -> HistorySnapshot {
        let slide = Slide::new(title);
        HistorySnapshot {
            current_slide_id: slide.id.clone(),
            slides: vec![slide],
            canvas_state: CanvasState::default(),
        }
    }

    fn title(snapshot: Option<&HistorySnapshot>) -> Option<String> {
        snapshot.map(|s| s.slides[0].title.clone())
    }

    #[test]
    fn test_empty_history_is_inert() {
        let mut history = History::new();
        assert_eq!(history.index(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_redo_moves_cursor() {
        let mut history = History::new();
        history.record(snapshot("a"));
        history.record(snapshot("b"));
        history.record(snapshot("c"));
        assert_eq!(history.index(), Some(2));

        assert_eq!(title(history.undo()), Some("b".to_string()));
        assert_eq!(title(history.undo()), Some("a".to_string()));
        assert!(history.undo().is_none());
        assert_eq!(history.index(), Some(0));

        assert_eq!(title(history.redo()), Some("b".to_string()));
        assert!(history.can_redo());
    }

    #[test]
    fn test_record_discards_redo_branch() {
        let mut history = History::new();
        history.record(snapshot("a"));
        history.record(snapshot("b"));
        history.undo();
        history.record(snapshot("c"));

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(title(history.undo()), Some("a".to_string()));

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.index(), None);
    }
}
