//=========================================================================
// Switch Handle
//=========================================================================
//
// Completion signal for a scene switch.
//
// Direct switches and no-op switches return an already-resolved
// handle. Transition and queued switches resolve once the manager's
// update loop finishes them:
//
//   switch_to() ──> SwitchHandle (Receiver) ... update() ──> Responder (Sender)
//
// The handle does not borrow the manager, so one thread may wait on it
// while another drives update().
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;

//=== SwitchHandle ========================================================

/// Outcome of a scene switch that may still be in progress.
#[derive(Debug)]
#[must_use = "a switch may still be in progress; wait on or poll the handle"]
pub struct SwitchHandle {
    state: HandleState,
}

#[derive(Debug)]
enum HandleState {
    Pending(Receiver<Result<(), SceneError>>),
    Ready(Result<(), SceneError>),
    Taken,
}

impl SwitchHandle {
    /// Creates a handle that is already resolved successfully.
    pub(crate) fn completed() -> Self {
        Self {
            state: HandleState::Ready(Ok(())),
        }
    }

    /// Creates a pending handle and the responder that resolves it.
    pub(crate) fn pending() -> (Self, SwitchResponder) {
        let (sender, receiver) = bounded(1);
        let handle = Self {
            state: HandleState::Pending(receiver),
        };
        (handle, SwitchResponder { sender })
    }

    //--- Polling ----------------------------------------------------------

    /// Returns true once the switch has finished, successfully or not.
    pub fn is_complete(&mut self) -> bool {
        self.poll();
        !matches!(self.state, HandleState::Pending(_))
    }

    /// Takes the result if the switch has finished.
    ///
    /// Returns `None` while pending and after the result was taken.
    pub fn try_result(&mut self) -> Option<Result<(), SceneError>> {
        self.poll();
        match std::mem::replace(&mut self.state, HandleState::Taken) {
            HandleState::Ready(result) => Some(result),
            other => {
                self.state = other;
                None
            }
        }
    }

    //--- Blocking ---------------------------------------------------------

    /// Blocks until the switch finishes.
    ///
    /// Something else must keep calling `update` on the manager (for
    /// example an [`crate::UpdateLoop`]), otherwise a transition switch
    /// never completes.
    pub fn wait(self) -> Result<(), SceneError> {
        match self.state {
            HandleState::Pending(receiver) => {
                receiver.recv().unwrap_or(Err(SceneError::SwitchAbandoned))
            }
            HandleState::Ready(result) => result,
            HandleState::Taken => Err(SceneError::SwitchAbandoned),
        }
    }

    /// Blocks up to `timeout`. Returns the handle back if still pending.
    pub fn wait_timeout(self, timeout: Duration) -> Result<Result<(), SceneError>, SwitchHandle> {
        match self.state {
            HandleState::Pending(receiver) => match receiver.recv_timeout(timeout) {
                Ok(result) => Ok(result),
                Err(RecvTimeoutError::Disconnected) => Ok(Err(SceneError::SwitchAbandoned)),
                Err(RecvTimeoutError::Timeout) => Err(SwitchHandle {
                    state: HandleState::Pending(receiver),
                }),
            },
            HandleState::Ready(result) => Ok(result),
            HandleState::Taken => Ok(Err(SceneError::SwitchAbandoned)),
        }
    }

    fn poll(&mut self) {
        if let HandleState::Pending(receiver) = &self.state {
            let result = match receiver.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Disconnected) => Err(SceneError::SwitchAbandoned),
                Err(TryRecvError::Empty) => return,
            };
            self.state = HandleState::Ready(result);
        }
    }
}

//=== SwitchResponder =====================================================

/// Sending side of a [`SwitchHandle`], held by the manager.
#[derive(Debug, Clone)]
pub(crate) struct SwitchResponder {
    sender: Sender<Result<(), SceneError>>,
}

impl SwitchResponder {
    /// Resolves the handle. Later calls are ignored.
    pub fn resolve(&self, result: Result<(), SceneError>) {
        let _ = self.sender.try_send(result);
    }
}

//=== Tests ===============================================================
