//=========================================================================
// Scene Data
//=========================================================================
//
// Type-erased key/value bag owned by a single scene.
//
// Architecture:
//   set_data(key, T) → HashMap<String, Box<dyn Any + Send>>
//                              ↓
//   get_data::<T>(key) ← downcast_ref (None if absent or other type)
//
// The bag is never cleared by the manager. Values survive any number
// of exit/enter cycles of the owning scene.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

//=== SceneData ===========================================================

/// Key/value storage for arbitrary `Send + 'static` values.
#[derive(Default)]
pub struct SceneData {
    values: HashMap<String, Box<dyn Any + Send>>,
}

impl SceneData {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    //--- Access -----------------------------------------------------------

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Returns the value under `key` if present and of type `T`.
    pub fn get<T: Any + Send>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Mutable variant of [`SceneData::get`].
    pub fn get_mut<T: Any + Send>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Removes and returns the value under `key` if it is of type `T`.
    ///
    /// A value of a different type is left in place.
    pub fn remove<T: Any + Send>(&mut self, key: &str) -> Option<T> {
        if !self.values.get(key).is_some_and(|v| v.is::<T>()) {
            return None;
        }
        self.values
            .remove(key)
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    //--- Query API --------------------------------------------------------

    /// Returns true if any value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the bag holds nothing.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterator over stored keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Drops every stored value.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl fmt::Debug for SceneData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

//=== Tests ===============================================================
