//! Lifecycle events emitted by the animation driver.
//!
//! Events are queued during `tick`, timer callbacks and control calls, and
//! polled by the host with `drain_events`.

use std::collections::VecDeque;

/// Something observable happened to a driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverEvent {
    /// A fresh sequence began (`start`).
    Started,
    /// Progress moved to a new value; the host should repaint.
    Progress(f64),
    /// A sweep reached 1.0. `iteration` is the number of completed sweeps.
    RunCompleted { iteration: u32 },
    /// The next sweep will begin after `delay_ms`.
    RestartScheduled { delay_ms: f64 },
    /// A delayed restart fired and progress was reset to 0.
    Restarted { iteration: u32 },
    /// `set_enabled(false)` froze the driver.
    Paused,
    /// `set_enabled(true)` resumed it.
    Resumed,
    /// `stop` halted the driver; progress was kept.
    Halted,
    /// The final sweep of a finite loop completed. Terminal.
    Finished,
    /// The driver was torn down.
    Disposed,
}

/// FIFO of pending driver events.
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    events: VecDeque<DriverEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DriverEvent) {
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<DriverEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut q = EventQueue::new();
        q.push(DriverEvent::Started);
        q.push(DriverEvent::Progress(0.5));
        q.push(DriverEvent::RunCompleted { iteration: 1 });
        assert_eq!(q.len(), 3);

        let events = q.drain();
        assert_eq!(
            events,
            vec![
                DriverEvent::Started,
                DriverEvent::Progress(0.5),
                DriverEvent::RunCompleted { iteration: 1 }
            ]
        );
        assert!(q.is_empty());
    }
}
