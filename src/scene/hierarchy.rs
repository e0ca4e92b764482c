//! Scene object handles and parent-child relations
//!
//! The relations are stored as components on the hecs entities backing each
//! scene object. [`SceneWorld`](super::SceneWorld) keeps them consistent:
//! `parent(c) == Some(p)` if and only if `c` is listed in `children(p)`.

use std::fmt;

use hecs::Entity;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Handle to a node of a [`SceneWorld`](super::SceneWorld).
///
/// Handles are generational: once the object is despawned, the handle is
/// rejected with [`SceneError::NoSuchObject`](super::SceneError::NoSuchObject)
/// even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneObject(pub(crate) Entity);

impl SceneObject {
    /// The backing hecs entity
    #[must_use]
    pub const fn entity(self) -> Entity {
        self.0
    }
}

impl From<SceneObject> for Entity {
    fn from(object: SceneObject) -> Self {
        object.0
    }
}

impl fmt::Display for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SceneObject({:?})", self.0)
    }
}

/// Display name of a scene object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Link to the parent object; roots do not carry it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

impl Parent {
    /// Create a new parent reference
    #[must_use]
    pub const fn new(entity: Entity) -> Self {
        Self(entity)
    }

    /// Get the parent entity
    #[must_use]
    pub const fn entity(&self) -> Entity {
        self.0
    }
}

/// An object's children, in the order they were linked
#[derive(Debug, Clone, Default)]
pub struct Children(pub SmallVec<[Entity; 8]>);

impl Children {
    /// Create an empty children list
    #[must_use]
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Append a child. Returns false if it was already listed.
    pub fn add(&mut self, child: Entity) -> bool {
        if self.contains(child) {
            return false;
        }
        self.0.push(child);
        true
    }

    /// Remove a child, keeping the order of the rest
    pub fn remove(&mut self, child: Entity) -> bool {
        if let Some(pos) = self.0.iter().position(|&e| e == child) {
            self.0.remove(pos);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn contains(&self, child: Entity) -> bool {
        self.0.contains(&child)
    }

    /// Check if there are no children
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of children
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over children in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.0.iter()
    }
}
