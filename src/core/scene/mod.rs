//=========================================================================
// Scene System
//=========================================================================
//
// Manages scene lifecycle, switching, and timed transitions.
//
// Architecture:
//   SceneManager
//     ├─ scenes: HashMap<String, Scene>
//     ├─ current / previous: Option<String>
//     ├─ active_transition: Option<Transition>
//     └─ pending: TransitionQueue
//
// Flow:
//   switch_to() → direct switch | start transition
//   update(dt)  → advance transition → Scene::on_update (if active)
//
//=========================================================================

//=== Module Declarations =================================================

mod data;
mod deferred;
mod event;
mod registry;
mod scene_impl;
mod scene_manager;
mod state;
mod switch;
mod transition;
mod transition_queue;

//=== Public API ==========================================================

pub use data::SceneData;
pub use deferred::HookCompleter;
pub use event::SceneEvent;
pub use registry::SceneRegistry;
pub use scene_impl::Scene;
pub use scene_manager::{SceneManager, SceneManagerBuilder};
pub use state::{Hook, SceneState};
pub use switch::SwitchHandle;
pub use transition::{
    ease_in, ease_in_out, ease_out, linear, CompletionCallback, Easing, Transition,
    TransitionOptions, TransitionSettings, DEFAULT_TRANSITION_DURATION,
};

//=== Internal Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::core::error::HookResult;

//=== Scene Context =======================================================

/// View of a scene handed to its hooks.
pub struct SceneContext<'a> {
    /// Name of the scene the hook belongs to.
    pub name: &'a str,

    /// The scene's own data bag.
    pub data: &'a mut SceneData,

    deferred: Option<Receiver<HookResult>>,
}

impl<'a> SceneContext<'a> {
    pub(crate) fn new(name: &'a str, data: &'a mut SceneData) -> Self {
        Self {
            name,
            data,
            deferred: None,
        }
    }

    /// Marks the running hook as finishing later.
    ///
    /// The hook returns `Ok(())` at once and hands the completer to
    /// whatever does the remaining work. A direct switch blocks until the
    /// completer reports; every other path keeps going and checks it on
    /// each `update`, publishing [`SceneEvent::HookFailed`] on failure.
    /// An error returned by the hook itself takes precedence.
    pub fn defer(&mut self) -> HookCompleter {
        let (completer, receiver) = HookCompleter::channel();
        self.deferred = Some(receiver);
        completer
    }

    pub(crate) fn take_deferred(&mut self) -> Option<Receiver<HookResult>> {
        self.deferred.take()
    }
}

//=== Scene Hooks Trait ===================================================

/// Lifecycle hooks that give a scene its behavior.
///
/// Every hook has a no-op default, so an implementation only overrides
/// what it needs:
///
/// ```rust
/// # use aetheric_scene::prelude::*;
/// # use std::time::Duration;
/// struct Gameplay;
///
/// impl SceneHooks for Gameplay {
///     fn on_update(&mut self, ctx: &mut SceneContext<'_>, dt: Duration) -> HookResult {
///         let elapsed = ctx.data.get::<Duration>("elapsed").copied().unwrap_or_default();
///         ctx.data.set("elapsed", elapsed + dt);
///         Ok(())
///     }
/// }
///
/// let scene = Scene::with_hooks("gameplay", Gameplay);
/// ```
///
/// An error returned from `on_enter` or `on_exit` during a direct switch
/// is returned by `switch_to`. During a transition switch the error is
/// published as [`SceneEvent::HookFailed`] and the transition carries on.
///
/// A hook with slow work (loading assets, say) can finish later through
/// [`SceneContext::defer`]:
///
/// ```rust
/// # use aetheric_scene::prelude::*;
/// # use std::thread;
/// struct Level;
///
/// impl SceneHooks for Level {
///     fn on_enter(&mut self, ctx: &mut SceneContext<'_>) -> HookResult {
///         let completer = ctx.defer();
///         thread::spawn(move || {
///             // load assets ...
///             completer.complete(Ok(()));
///         });
///         Ok(())
///     }
/// }
/// ```
pub trait SceneHooks: Send {
    /// Called when the scene starts entering.
    fn on_enter(&mut self, _ctx: &mut SceneContext<'_>) -> HookResult {
        Ok(())
    }

    /// Called when the scene starts exiting.
    fn on_exit(&mut self, _ctx: &mut SceneContext<'_>) -> HookResult {
        Ok(())
    }

    /// Called every update while the scene is active.
    fn on_update(&mut self, _ctx: &mut SceneContext<'_>, _dt: Duration) -> HookResult {
        Ok(())
    }

    /// Called after the scene is paused.
    fn on_pause(&mut self, _ctx: &mut SceneContext<'_>) -> HookResult {
        Ok(())
    }

    /// Called after the scene is resumed.
    fn on_resume(&mut self, _ctx: &mut SceneContext<'_>) -> HookResult {
        Ok(())
    }
}

/// The empty hook set.
impl SceneHooks for () {}
