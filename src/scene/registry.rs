//! Component registry for by-name instantiation
//!
//! Maps a type tag to a constructor so that components can be attached by
//! name (`add_component_by`) and restored from snapshots.

use rustc_hash::FxHashMap;

use super::component::{Component, short_type_name};

/// Constructor stored in the registry.
pub type ComponentFactory = Box<dyn Fn() -> Box<dyn Component> + Send + Sync>;

/// Registry mapping type tags to component constructors.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: FxHashMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under its unqualified type name, built with `T::default()`.
    ///
    /// A component overriding [`Component::type_name`] should be registered
    /// with [`register_with`](Self::register_with) under that tag instead.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Component + Default,
    {
        self.register_with(short_type_name::<T>(), || Box::new(T::default()))
    }

    /// Registers a constructor under an explicit tag, replacing any previous one.
    pub fn register_with<F>(&mut self, type_tag: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Component> + Send + Sync + 'static,
    {
        let type_tag = type_tag.into();
        if self.factories.insert(type_tag.clone(), Box::new(factory)).is_some() {
            log::debug!("Replaced component factory '{type_tag}'");
        }
        self
    }

    /// Instantiates the component registered under `type_tag`.
    ///
    /// Returns `None` if the tag is unknown.
    #[must_use]
    pub fn create(&self, type_tag: &str) -> Option<Box<dyn Component>> {
        self.factories.get(type_tag).map(|factory| factory())
    }

    /// Checks if a tag is registered.
    #[must_use]
    pub fn contains(&self, type_tag: &str) -> bool {
        self.factories.contains_key(type_tag)
    }

    /// Returns the number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// All registered tags, in no particular order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}
