//! Editor events flowing from the session to the views.

use crate::element::ElementId;
use std::collections::VecDeque;

/// Something the views may need to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    SelectionChanged(Option<ElementId>),
    ElementsChanged { revision: u64 },
    LayersChanged { revision: u64 },
    ViewChanged,
}

/// Receives dispatched events.
pub trait Observer {
    fn notify(&mut self, event: &EditorEvent);
}

/// Adapter turning a selection callback into an [`Observer`].
pub struct SelectionObserver<F>(pub F);

impl<F: FnMut(Option<ElementId>)> Observer for SelectionObserver<F> {
    fn notify(&mut self, event: &EditorEvent) {
        if let EditorEvent::SelectionChanged(id) = event {
            (self.0)(*id);
        }
    }
}

/// Queue of pending events plus registered observers.
///
/// Views either register an observer and wait for [`EventBus::dispatch`], or
/// pull events with [`EventBus::drain`].
#[derive(Default)]
pub struct EventBus {
    queue: VecDeque<EditorEvent>,
    observers: Vec<Box<dyn Observer>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("queue", &self.queue)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Queue an event, coalescing it with an identical pending one.
    pub fn emit(&mut self, event: EditorEvent) {
        if self.queue.back() != Some(&event) {
            self.queue.push_back(event);
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deliver every queued event to every observer, emptying the queue.
    pub fn dispatch(&mut self) {
        while let Some(event) = self.queue.pop_front() {
            for observer in &mut self.observers {
                observer.notify(&event);
            }
        }
    }

    /// Take the queued events without notifying observers.
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        self.queue.drain(..).collect()
    }
}
