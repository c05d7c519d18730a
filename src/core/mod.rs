//=========================================================================
// Core Systems
//
// Everything the scene manager needs that is not specific to one scene.
//
// Layout:
// - scene   → scenes, transitions, manager, registry, events
// - clock   → time source for transitions and tick deltas
// - config  → SceneManagerConfig and its TOML loading
// - error   → SceneError and hook result types
//
//=========================================================================

pub mod clock;
pub mod config;
pub mod error;
pub mod scene;

//--- Re-exports ----------------------------------------------------------

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, SceneManagerConfig};
pub use error::{HookError, HookResult, SceneError};
