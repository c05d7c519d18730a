//=========================================================================
// Scene Registry
//=========================================================================
//
// Factory mapping string type tags to scene constructors.
//
// Flow:
//   register("level", |name| Scene::with_hooks(name, Level::default()))
//   create("level", "level-1")  →  Scene named "level-1"
//
// The registry only builds scenes; it never holds instances. Use
// create_into to build and hand a scene to a SceneManager in one step.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneManager};
use crate::core::error::SceneError;

//=== Scene Constructor ===================================================

type SceneConstructor = Box<dyn Fn(&str) -> Scene + Send + Sync>;

//=== SceneRegistry =======================================================

/// Named scene constructors.
///
/// # Examples
///
/// ```rust
/// # use aetheric_scene::prelude::*;
/// let mut registry = SceneRegistry::new();
/// registry.register("menu", |name| Scene::new(name));
///
/// let scene = registry.create("menu", "main_menu").unwrap();
/// assert_eq!(scene.name(), "main_menu");
/// ```
#[derive(Default)]
pub struct SceneRegistry {
    constructors: HashMap<String, SceneConstructor>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor for `tag`, replacing any previous one.
    ///
    /// The constructor receives the instance name passed to [`create`].
    ///
    /// [`create`]: SceneRegistry::create
    pub fn register<F>(&mut self, tag: impl Into<String>, constructor: F)
    where
        F: Fn(&str) -> Scene + Send + Sync + 'static,
    {
        let tag = tag.into();
        if self
            .constructors
            .insert(tag.clone(), Box::new(constructor))
            .is_some()
        {
            warn!("Scene type {:?} was already registered and has been replaced", tag);
        } else {
            debug!("Registered scene type {:?}", tag);
        }
    }

    /// Removes the constructor for `tag`. Returns false if none was registered.
    pub fn unregister(&mut self, tag: &str) -> bool {
        self.constructors.remove(tag).is_some()
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Registered type tags, in no particular order.
    pub fn types(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Builds a new scene named `name` from the constructor for `tag`.
    pub fn create(&self, tag: &str, name: &str) -> Result<Scene, SceneError> {
        let constructor = self
            .constructors
            .get(tag)
            .ok_or_else(|| SceneError::TypeNotRegistered(tag.to_string()))?;
        Ok(constructor(name))
    }

    /// Builds a scene and adds it to `manager`.
    ///
    /// Returns the scene it replaced, if any. Fails without touching the
    /// manager when `tag` is unknown or `name` is the current scene.
    pub fn create_into(
        &self,
        tag: &str,
        name: &str,
        manager: &mut SceneManager,
    ) -> Result<Option<Scene>, SceneError> {
        let scene = self.create(tag, name)?;
        manager.add_scene(scene)
    }
}

impl fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("types", &self.types())
            .finish()
    }
}

//=== Tests ===============================================================
