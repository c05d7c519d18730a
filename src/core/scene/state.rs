//=========================================================================
// Scene Lifecycle State
//=========================================================================
//
// Lifecycle:
//   Inactive → Entering → Active → Exiting → Inactive
//                           ↕
//                         Paused
//
// Transitions are driven exclusively by the SceneManager. The state
// field on a scene is advisory; Scene::set_state never validates.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== SceneState ==========================================================

/// Position of a scene within its activation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneState {
    /// Registered but not running.
    #[default]
    Inactive,

    /// `on_enter` issued, not yet settled as active.
    Entering,

    /// Running and receiving updates.
    Active,

    /// `on_exit` issued, not yet settled as inactive.
    Exiting,

    /// Suspended; receives no updates until resumed.
    Paused,
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Inactive => "inactive",
            Self::Entering => "entering",
            Self::Active => "active",
            Self::Exiting => "exiting",
            Self::Paused => "paused",
        };
        f.write_str(name)
    }
}

//=== Hook ================================================================

/// Identifies a lifecycle hook, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Enter,
    Exit,
    Update,
    Pause,
    Resume,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enter => "on_enter",
            Self::Exit => "on_exit",
            Self::Update => "on_update",
            Self::Pause => "on_pause",
            Self::Resume => "on_resume",
        };
        f.write_str(name)
    }
}

//=== Tests ===============================================================
