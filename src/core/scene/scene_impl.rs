//=========================================================================
// Scene
//=========================================================================
//
// A named unit of application state: lifecycle state, data bag, and
// the boxed hook set that gives it behavior.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::deferred::PendingHook;
use super::{Hook, SceneContext, SceneData, SceneHooks, SceneState};
use crate::core::error::{HookResult, SceneError};

//=== Scene ===============================================================

/// A named scene owned by a [`super::SceneManager`].
///
/// The name is fixed at construction. State changes are made by the
/// manager; data is read and written by the application and by the
/// scene's own hooks through [`SceneContext`].
pub struct Scene {
    name: String,
    state: SceneState,
    data: SceneData,
    hooks: Box<dyn SceneHooks>,
}

impl Scene {
    //--- Construction -----------------------------------------------------

    /// Creates a scene whose hooks all do nothing.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_hooks(name, ())
    }

    /// Creates a scene driven by `hooks`.
    pub fn with_hooks<H>(name: impl Into<String>, hooks: H) -> Self
    where
        H: SceneHooks + 'static,
    {
        Self {
            name: name.into(),
            state: SceneState::Inactive,
            data: SceneData::new(),
            hooks: Box::new(hooks),
        }
    }

    //--- State ------------------------------------------------------------

    /// The scene's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Overwrites the lifecycle state without validation.
    pub fn set_state(&mut self, state: SceneState) {
        self.state = state;
    }

    pub fn is_active(&self) -> bool {
        self.state == SceneState::Active
    }

    pub fn is_paused(&self) -> bool {
        self.state == SceneState::Paused
    }

    //--- Data -------------------------------------------------------------

    /// Stores `value` under `key` in this scene's data bag.
    pub fn set_data<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.data.set(key, value);
    }

    /// Reads `key` from the data bag; `None` if absent or of another type.
    pub fn get_data<T: Any + Send>(&self, key: &str) -> Option<&T> {
        self.data.get(key)
    }

    pub fn get_data_mut<T: Any + Send>(&mut self, key: &str) -> Option<&mut T> {
        self.data.get_mut(key)
    }

    pub fn has_data(&self, key: &str) -> bool {
        self.data.contains(key)
    }

    pub fn remove_data<T: Any + Send>(&mut self, key: &str) -> Option<T> {
        self.data.remove(key)
    }

    /// Drops every value in the data bag.
    pub fn clear_data(&mut self) {
        self.data.clear();
    }

    pub fn data(&self) -> &SceneData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut SceneData {
        &mut self.data
    }

    //--- Hook Dispatch ----------------------------------------------------
    //
    // Each call returns the hook's immediate error, or the completion the
    // hook deferred through SceneContext::defer.
    //

    pub(crate) fn enter(&mut self) -> Result<Option<PendingHook>, SceneError> {
        self.dispatch(Hook::Enter, |hooks, ctx| hooks.on_enter(ctx))
    }

    pub(crate) fn exit(&mut self) -> Result<Option<PendingHook>, SceneError> {
        self.dispatch(Hook::Exit, |hooks, ctx| hooks.on_exit(ctx))
    }

    pub(crate) fn update(&mut self, dt: Duration) -> Result<Option<PendingHook>, SceneError> {
        self.dispatch(Hook::Update, |hooks, ctx| hooks.on_update(ctx, dt))
    }

    pub(crate) fn pause(&mut self) -> Result<Option<PendingHook>, SceneError> {
        self.dispatch(Hook::Pause, |hooks, ctx| hooks.on_pause(ctx))
    }

    pub(crate) fn resume(&mut self) -> Result<Option<PendingHook>, SceneError> {
        self.dispatch(Hook::Resume, |hooks, ctx| hooks.on_resume(ctx))
    }

    fn dispatch<F>(&mut self, hook: Hook, call: F) -> Result<Option<PendingHook>, SceneError>
    where
        F: FnOnce(&mut Box<dyn SceneHooks>, &mut SceneContext<'_>) -> HookResult,
    {
        let mut ctx = SceneContext::new(&self.name, &mut self.data);
        let result = call(&mut self.hooks, &mut ctx);
        let deferred = ctx.take_deferred();

        result.map_err(|source| SceneError::hook(&self.name, hook, source))?;
        Ok(deferred.map(|receiver| PendingHook::new(&self.name, hook, receiver)))
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

//=== Tests ===============================================================
