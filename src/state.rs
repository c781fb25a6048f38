//! Selection state: the single observable field naming the selected trail.
//!
//! Any number of UI components may write it (list, map click); readers
//! subscribe and are woken on every change.  Notifications carry the latest
//! value: a reader that falls behind sees the most recent selection, never
//! an older one, so renders never go backwards in time.  Values written
//! between two observations are not replayed.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::TrailId;

#[derive(Debug, Clone)]
pub struct SelectionState {
    tx: Arc<watch::Sender<Option<TrailId>>>,
}

impl SelectionState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Current selection.
    pub fn current(&self) -> Option<TrailId> {
        *self.tx.borrow()
    }

    /// Replace the selection.  Observers are notified only when the value
    /// actually changes.  Returns whether it did.
    pub fn set(&self, id: Option<TrailId>) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == id {
                false
            } else {
                *current = id;
                true
            }
        })
    }

    pub fn select(&self, id: TrailId) -> bool {
        self.set(Some(id))
    }

    pub fn clear(&self) -> bool {
        self.set(None)
    }

    /// Register an observer.  The value present at subscription time counts
    /// as already seen; only later changes are delivered.
    pub fn subscribe(&self) -> SelectionWatch {
        SelectionWatch {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live observers.
    pub fn observers(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer handle returned by [`SelectionState::subscribe`].
#[derive(Debug)]
pub struct SelectionWatch {
    rx: watch::Receiver<Option<TrailId>>,
}

impl SelectionWatch {
    /// Wait for the next change.  `None` once every writer is gone.
    pub async fn changed(&mut self) -> Option<Option<TrailId>> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Non-blocking variant of [`changed`](Self::changed): the new value if
    /// one arrived since the last observation.
    pub fn latest(&mut self) -> Option<Option<TrailId>> {
        if self.rx.has_changed().unwrap_or(false) {
            Some(*self.rx.borrow_and_update())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_change() {
        let state = SelectionState::new();
        assert!(state.select(TrailId::new(1)));
        assert!(!state.select(TrailId::new(1)));
        assert!(state.clear());
        assert_eq!(state.current(), None);
    }

    #[test]
    fn test_latest_sees_only_new_values() {
        let state = SelectionState::new();
        state.select(TrailId::new(3));
        let mut watch = state.subscribe();
        assert_eq!(watch.latest(), None);

        state.select(TrailId::new(4));
        assert_eq!(watch.latest(), Some(Some(TrailId::new(4))));
        assert_eq!(watch.latest(), None);
    }

    #[tokio::test]
    async fn test_changed_delivers_latest_value() {
        let state = SelectionState::new();
        let mut watch = state.subscribe();

        state.select(TrailId::new(1));
        state.select(TrailId::new(2));
        assert_eq!(watch.changed().await, Some(Some(TrailId::new(2))));

        state.clear();
        assert_eq!(watch.changed().await, Some(None));
    }

    #[tokio::test]
    async fn test_changed_ends_when_state_dropped() {
        let state = SelectionState::new();
        let mut watch = state.subscribe();
        drop(state);
        assert_eq!(watch.changed().await, None);
    }

    #[test]
    fn test_observer_count() {
        let state = SelectionState::new();
        assert_eq!(state.observers(), 0);
        let _watch = state.subscribe();
        assert_eq!(state.observers(), 1);
    }
}
