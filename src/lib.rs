//=========================================================================
// Aetheric Scene — Library Root
//
// This crate defines the public API surface of the Aetheric scene system.
//
// Responsibilities:
// - Expose the scene manager, scenes, and transitions (`core::scene`)
// - Provide an optional background update loop (`SceneRuntime`)
// - Keep thread plumbing (`runtime`) out of the public module tree
//
// Typical usage:
// ```no_run
// use aetheric_scene::prelude::*;
//
// fn main() {
//     let mut manager = SceneManager::new();
//     manager.add_scene(Scene::new("menu")).unwrap();
//     let _ = manager.switch_to("menu").unwrap();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the scene system and its configuration, clock and
// error types.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `runtime` owns the update-loop thread; only its types are exported.
//
mod runtime;

//--- Public Exports ------------------------------------------------------

pub use crate::core::config::SceneManagerConfig;
pub use crate::core::error::SceneError;
pub use crate::core::scene::{Scene, SceneManager, SceneManagerBuilder, SceneRegistry};
pub use runtime::{SceneRuntime, UpdateLoop};
