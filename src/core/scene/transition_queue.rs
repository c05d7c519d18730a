//=========================================================================
// Transition Queue
//=========================================================================
//
// FIFO of scene switches requested while a transition is in flight.
//
// Only one switch may be in progress at a time. Requests arriving
// during a transition wait here; the scene manager drains the queue
// when the running transition completes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

//=== Internal Dependencies ===============================================

use super::switch::SwitchResponder;
use super::TransitionSettings;

//=== PendingSwitch =======================================================

/// A deferred `switch_to` call.
#[derive(Debug)]
pub(crate) struct PendingSwitch {
    pub target: String,
    pub settings: Option<TransitionSettings>,
    pub responder: SwitchResponder,
}

//=== Transition Queue ====================================================

/// Queue of deferred scene switches, processed in request order.
#[derive(Debug, Default)]
pub(crate) struct TransitionQueue {
    queue: VecDeque<PendingSwitch>,
}

impl TransitionQueue {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Queues a switch to run after the current transition.
    pub fn push(&mut self, switch: PendingSwitch) {
        self.queue.push_back(switch);
    }

    /// Removes the oldest queued switch.
    pub fn pop(&mut self) -> Option<PendingSwitch> {
        self.queue.pop_front()
    }

    /// Returns an iterator over queued target names, oldest first.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(|p| p.target.as_str())
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued switches.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

//=== Tests ===============================================================
