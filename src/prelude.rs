//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_scene::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime
pub use crate::runtime::{SceneRuntime, UpdateLoop};

// Configuration, time, errors
pub use crate::core::clock::{Clock, ManualClock, SystemClock};
pub use crate::core::config::{ConfigError, SceneManagerConfig};
pub use crate::core::error::{HookError, HookResult, SceneError};

// Scene system
pub use crate::core::scene::{
    Easing, Hook, HookCompleter, Scene, SceneContext, SceneData, SceneEvent, SceneHooks, SceneManager,
    SceneManagerBuilder, SceneRegistry, SceneState, SwitchHandle, TransitionSettings,
};
