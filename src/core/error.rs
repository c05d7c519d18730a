//=========================================================================
// Scene Errors
//=========================================================================
//
// Failures surfaced to callers of the scene system.
//
// Two families:
//   Lookup  → NotFound, TypeNotRegistered, SceneActive (nothing mutated)
//   Hook    → a scene's own lifecycle hook returned an error
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::scene::Hook;

//=== Hook Error ==========================================================

/// Error type returned by scene lifecycle hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by scene lifecycle hooks.
pub type HookResult = Result<(), HookError>;

//=== SceneError ==========================================================

/// Errors produced by the scene manager and registry.
#[derive(Debug, Error)]
pub enum SceneError {
    /// No scene with this name is registered in the manager.
    #[error("Scene \"{0}\" not found")]
    NotFound(String),

    /// No constructor is registered in the registry for this type tag.
    #[error("Scene type \"{0}\" is not registered.")]
    TypeNotRegistered(String),

    /// The scene is current and cannot be replaced while it runs.
    #[error("Scene \"{0}\" is the current scene and cannot be replaced")]
    SceneActive(String),

    /// A lifecycle hook of a scene failed.
    #[error("{hook} hook of scene \"{scene}\" failed: {source}")]
    Hook {
        scene: String,
        hook: Hook,
        #[source]
        source: HookError,
    },

    /// The manager was dropped before a pending switch could complete.
    #[error("scene switch was abandoned before completion")]
    SwitchAbandoned,
}

impl SceneError {
    pub(crate) fn hook(scene: &str, hook: Hook, source: HookError) -> Self {
        Self::Hook {
            scene: scene.to_string(),
            hook,
            source,
        }
    }
}

//=== Tests ===============================================================
