//=========================================================================
// Deferred Hooks
//=========================================================================
//
// Completion of a lifecycle hook that finishes after it returns.
//
// Flow:
//   on_enter(ctx) → ctx.defer() → HookCompleter (moved to a worker)
//                                     │
//                       complete(result)
//                                     ↓
//   SceneManager ← PendingHook (Receiver)
//     ├─ direct switch → wait()
//     └─ otherwise     → poll() on every update, failures → HookFailed
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

//=== Internal Dependencies ===============================================

use super::Hook;
use crate::core::error::{HookResult, SceneError};

//=== HookCompleter =======================================================

/// Finishes a hook that called [`super::SceneContext::defer`].
///
/// Dropping the completer without calling [`complete`] counts as a
/// failure of the hook.
///
/// [`complete`]: HookCompleter::complete
#[derive(Debug)]
pub struct HookCompleter {
    sender: Sender<HookResult>,
}

impl HookCompleter {
    /// Creates a completer and the receiving side kept by the scene.
    pub(crate) fn channel() -> (Self, Receiver<HookResult>) {
        let (sender, receiver) = bounded(1);
        (Self { sender }, receiver)
    }

    /// Reports the hook's outcome.
    pub fn complete(self, result: HookResult) {
        let _ = self.sender.try_send(result);
    }
}

//=== PendingHook =========================================================

/// A deferred hook the manager is still waiting on.
#[derive(Debug)]
pub(crate) struct PendingHook {
    scene: String,
    hook: Hook,
    receiver: Receiver<HookResult>,
}

impl PendingHook {
    pub fn new(scene: &str, hook: Hook, receiver: Receiver<HookResult>) -> Self {
        Self {
            scene: scene.to_string(),
            hook,
            receiver,
        }
    }

    /// Blocks until the hook completes.
    pub fn wait(self) -> Result<(), SceneError> {
        match self.receiver.recv() {
            Ok(result) => self.finish(result),
            Err(_) => Err(self.dropped()),
        }
    }

    /// Returns the outcome once the hook has completed.
    pub fn poll(&self) -> Option<Result<(), SceneError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(self.finish(result)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.dropped())),
        }
    }

    fn finish(&self, result: HookResult) -> Result<(), SceneError> {
        result.map_err(|source| SceneError::hook(&self.scene, self.hook, source))
    }

    fn dropped(&self) -> SceneError {
        SceneError::hook(
            &self.scene,
            self.hook,
            "hook was dropped before it completed".into(),
        )
    }
}

//=== Tests ===============================================================
