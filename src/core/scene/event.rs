//=========================================================================
// Scene Events
//=========================================================================
//
// Lifecycle notifications published by the SceneManager.
//
// Architecture:
//   SceneManager ──publish()──> bounded crossbeam channel ──> listeners
//
// Listeners take a Receiver via SceneManager::events(). Receivers are
// MPMC: each event is delivered to exactly one receiver. When the
// channel is full the oldest event is evicted with a debug log; hook
// failures are additionally logged at error level by the manager.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::debug;

//=== Internal Dependencies ===============================================

use super::Hook;

//=== SceneEvent ==========================================================

/// Notification emitted by the scene manager.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// A direct switch finished; `to` is now active.
    SceneSwitched { from: Option<String>, to: String },

    /// A transition started between `from` and `to`.
    TransitionStarted {
        from: Option<String>,
        to: String,
        duration: Duration,
    },

    /// A transition reached full progress; `scene` is now active.
    TransitionCompleted { scene: String },

    /// A switch was requested while a transition was running.
    SwitchQueued { to: String },

    /// A scene was removed from the manager.
    SceneRemoved { name: String },

    /// A lifecycle hook failed outside of any caller's error path.
    HookFailed {
        scene: String,
        hook: Hook,
        message: String,
    },
}

//=== EventChannel ========================================================

/// Bounded publish side of the event stream, plus a receiver to clone.
pub(crate) struct EventChannel {
    sender: Sender<SceneEvent>,
    receiver: Receiver<SceneEvent>,
}

impl EventChannel {
    /// Creates a channel holding up to `capacity` undelivered events.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Publishes `event`. When the channel is full the oldest undelivered
    /// event is evicted so the newest one is kept.
    pub fn publish(&self, event: SceneEvent) {
        let event = match self.sender.try_send(event) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => return,
            Err(TrySendError::Full(event)) => event,
        };

        if let Ok(stale) = self.receiver.try_recv() {
            debug!("Scene event channel full, evicted {:?}", stale);
        }
        if let Err(TrySendError::Full(event)) = self.sender.try_send(event) {
            debug!("Scene event channel still full, dropping {:?}", event);
        }
    }

    /// Returns a new handle onto the event stream.
    pub fn subscribe(&self) -> Receiver<SceneEvent> {
        self.receiver.clone()
    }
}

//=== Tests ===============================================================
