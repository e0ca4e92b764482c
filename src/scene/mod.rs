//! Scene graph
//!
//! Scene objects live in a [`SceneWorld`] backed by a hecs world. Each object
//! carries a [`Name`], a [`Transform`], its [`Children`], an optional
//! [`Parent`] and an ordered list of behavior [`Component`]s.

mod component;
mod hierarchy;
mod registry;
mod snapshot;
mod transform;
mod world;

pub use component::{AsAny, Component, ComponentEntry, Components, short_type_name};
pub use hierarchy::{Children, Name, Parent, SceneObject};
pub use registry::{ComponentFactory, ComponentRegistry};
pub use snapshot::{SceneSnapshot, SerializedComponent, SerializedObject};
pub use transform::{DirtyFlags, ParentWorld, Transform};
pub use world::SceneWorld;

/// Errors that can occur during scene operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not refer to a live scene object
    NoSuchObject,
    /// `child` is not a child of `parent`
    ChildNotFound {
        parent: SceneObject,
        child: SceneObject,
    },
    /// Linking `child` under `parent` would make an object its own ancestor
    Cycle {
        parent: SceneObject,
        child: SceneObject,
    },
    /// IO error
    Io(String),
    /// Serialization error
    Serialize(String),
    /// Deserialization error
    Deserialize(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSuchObject => write!(f, "No such scene object"),
            Self::ChildNotFound { parent, child } => {
                write!(f, "{child} is not a child of {parent}")
            }
            Self::Cycle { parent, child } => {
                write!(f, "Cannot add {child} under {parent}: hierarchy cycle")
            }
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Serialize(e) => write!(f, "Serialization error: {e}"),
            Self::Deserialize(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<hecs::NoSuchEntity> for SceneError {
    fn from(_: hecs::NoSuchEntity) -> Self {
        Self::NoSuchObject
    }
}

/// Every live scene object carries all node components, so a missing one
/// means the entity is not a scene object.
impl From<hecs::ComponentError> for SceneError {
    fn from(_: hecs::ComponentError) -> Self {
        Self::NoSuchObject
    }
}

impl From<hecs::QueryOneError> for SceneError {
    fn from(_: hecs::QueryOneError) -> Self {
        Self::NoSuchObject
    }
}
