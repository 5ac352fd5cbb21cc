use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::feature::Feature;
use crate::geo::LatLng;

/// Everything the map surface and the UI controls report to the selection handler.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The surface finished initializing and accepts layers.
    Ready,
    /// Raw value from the region dropdown.
    SelectionChanged(String),
    HoverEnter { feature: Feature, at: LatLng },
    HoverLeave,
    /// The selection control could not deliver a value.
    SubscriptionFailed(String),
}

/// Single-threaded FIFO between JS callbacks and the handler.
///
/// Callbacks fired while a drain is running (layer removal can synchronously
/// emit a hover-leave) only enqueue; the running drain picks them up after
/// the current event, so the handler is never entered twice.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: RefCell<VecDeque<MapEvent>>,
    draining: Cell<bool>,
}

struct DrainGuard<'a>(&'a Cell<bool>);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: MapEvent) {
        self.pending.borrow_mut().push_back(event);
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    #[cfg(test)]
    pub fn is_draining(&self) -> bool {
        self.draining.get()
    }

    /// Feed queued events to `handle` until the queue is empty. Returns how
    /// many were handled; a nested call during a drain handles none.
    pub fn drain(&self, mut handle: impl FnMut(MapEvent)) -> usize {
        if self.draining.replace(true) {
            return 0;
        }
        let _guard = DrainGuard(&self.draining);

        let mut handled = 0;
        loop {
            // Release the borrow before handling so the handler can push.
            let next = self.pending.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            handle(event);
            handled += 1;
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::{EventQueue, MapEvent};

    #[test]
    fn drains_in_arrival_order() {
        let queue = EventQueue::new();
        queue.push(MapEvent::Ready);
        queue.push(MapEvent::SelectionChanged("AFRO".into()));
        queue.push(MapEvent::HoverLeave);

        let mut seen = Vec::new();
        assert_eq!(queue.drain(|event| seen.push(event)), 3);
        assert_eq!(
            seen,
            vec![
                MapEvent::Ready,
                MapEvent::SelectionChanged("AFRO".into()),
                MapEvent::HoverLeave,
            ]
        );
        assert!(queue.is_empty());
        assert!(!queue.is_draining());
    }

    #[test]
    fn events_pushed_during_a_drain_run_after_the_current_one() {
        let queue = EventQueue::new();
        queue.push(MapEvent::SelectionChanged("AFRO".into()));
        queue.push(MapEvent::SelectionChanged("EURO".into()));

        let mut seen = Vec::new();
        queue.drain(|event| {
            if event == MapEvent::SelectionChanged("AFRO".into()) {
                // Re-entrant callback: enqueue and try to drain again.
                queue.push(MapEvent::HoverLeave);
                assert_eq!(queue.drain(|_| panic!("nested drain must not run")), 0);
            }
            seen.push(event);
        });

        assert_eq!(
            seen,
            vec![
                MapEvent::SelectionChanged("AFRO".into()),
                MapEvent::SelectionChanged("EURO".into()),
                MapEvent::HoverLeave,
            ]
        );
    }

    #[test]
    fn drain_on_empty_queue_is_a_no_op() {
        let queue = EventQueue::new();
        assert_eq!(queue.drain(|_| unreachable!()), 0);
        queue.push(MapEvent::Ready);
        assert_eq!(queue.len(), 1);
    }
}
