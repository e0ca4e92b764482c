//! Behavior components attached to scene objects
//!
//! A [`Component`] is any `'static` type that wants lifecycle notifications
//! from the object hosting it. Components are stored boxed, in attach order,
//! inside a [`ComponentEntry`] that also carries the enabled flag and the
//! back-reference to the owning object.
//!
//! The lifecycle is:
//!
//! 1. `on_attached()` - once, right after the owner back-reference is set
//! 2. `on_transform_changed()` - after every local pose write on the owner
//! 3. `on_detached()` - once, before the component is handed back to the caller
//!
//! # Example
//!
//! ```ignore
//! #[derive(Default)]
//! struct Spinner { speed: f32 }
//!
//! impl Component for Spinner {
//!     fn on_transform_changed(&mut self, object: SceneObject) {
//!         log::debug!("spinner on {object} moved");
//!     }
//! }
//!
//! registry.register::<Spinner>();
//! world.add_component_by(object, "Spinner")?;
//! ```

use std::any::{Any, type_name};
use std::fmt;

use super::hierarchy::SceneObject;

// ============================================================================
// Component Trait
// ============================================================================

/// Access to the concrete type behind a `dyn Component`.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior hosted by a scene object.
///
/// All hooks default to doing nothing.
pub trait Component: AsAny + Send + Sync {
    /// Type tag used for by-name lookups and for the registry.
    ///
    /// Defaults to the unqualified Rust type name, e.g. `"Spinner"`.
    fn type_name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Called when the component is attached to `object`.
    fn on_attached(&mut self, _object: SceneObject) {}

    /// Called when the component is detached from `object`.
    fn on_detached(&mut self, _object: SceneObject) {}

    /// Called after the local position, orientation or scale of `object`,
    /// the owner, changes.
    fn on_transform_changed(&mut self, _object: SceneObject) {}
}

impl dyn Component {
    /// Returns true if the boxed component is a `T`.
    #[must_use]
    pub fn is<T: Component>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// The last path segment of a type's name, `scene_core::Foo` -> `Foo`.
///
/// Generic arguments are kept as written by the compiler.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

// ============================================================================
// Component Entry
// ============================================================================

/// A component together with its per-attachment state.
pub struct ComponentEntry {
    component: Box<dyn Component>,
    type_tag: &'static str,
    enabled: bool,
    owner: Option<SceneObject>,
}

impl ComponentEntry {
    /// Wrap a component that is not attached to anything yet.
    #[must_use]
    pub fn new(component: Box<dyn Component>) -> Self {
        let type_tag = component.type_name();
        Self {
            component,
            type_tag,
            enabled: true,
            owner: None,
        }
    }

    /// The component's type tag.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_tag
    }

    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the component. Disabled components still receive
    /// lifecycle hooks; the flag is for consumers to honor.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The object this component is attached to, `None` once detached.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> Option<SceneObject> {
        self.owner
    }

    #[must_use]
    pub fn get(&self) -> &dyn Component {
        &*self.component
    }

    pub fn get_mut(&mut self) -> &mut dyn Component {
        &mut *self.component
    }

    /// Returns true if the component is a `T`.
    #[must_use]
    pub fn is<T: Component>(&self) -> bool {
        self.get().is::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.get().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.get_mut().downcast_mut::<T>()
    }

    /// Set the back-reference and run the attach hook.
    pub(crate) fn attach(&mut self, object: SceneObject) {
        self.owner = Some(object);
        self.component.on_attached(object);
    }

    /// Run the detach hook and clear the back-reference.
    pub(crate) fn detach(&mut self, object: SceneObject) {
        self.component.on_detached(object);
        self.owner = None;
    }

    pub(crate) fn notify_transform_changed(&mut self, object: SceneObject) {
        self.component.on_transform_changed(object);
    }

    /// Unwrap into the boxed component.
    #[must_use]
    pub fn into_inner(self) -> Box<dyn Component> {
        self.component
    }
}

impl fmt::Debug for ComponentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentEntry")
            .field("type_name", &self.type_tag)
            .field("enabled", &self.enabled)
            .field("owner", &self.owner)
            .finish()
    }
}

/// Ordered list of the components attached to one scene object.
#[derive(Debug, Default)]
pub struct Components(pub Vec<ComponentEntry>);

impl Components {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Index of the first entry with the given tag.
    #[must_use]
    pub fn position_by(&self, type_tag: &str) -> Option<usize> {
        self.0.iter().position(|entry| entry.type_name() == type_tag)
    }

    /// Index of the first entry holding a `T`.
    #[must_use]
    pub fn position_of<T: Component>(&self) -> Option<usize> {
        self.0.iter().position(ComponentEntry::is::<T>)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
