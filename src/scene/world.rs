//! Scene world wrapper around hecs
//!
//! Owns every scene object and keeps the parent/child links, the component
//! lists and the transform caches consistent. All operations take a
//! [`SceneObject`] handle and fail with [`SceneError::NoSuchObject`] when the
//! handle is stale.

use hecs::Entity;
use smallvec::SmallVec;

use super::SceneError;
use super::component::{Component, ComponentEntry, Components};
use super::hierarchy::{Children, Name, Parent, SceneObject};
use super::registry::ComponentRegistry;
use super::transform::{ParentWorld, Transform};
use crate::config::SceneConfig;
use crate::math::{Mat4, Quat, Vec3};

type NodeBundle = (Name, Transform, Children, Components);

/// Ancestor chain, root first
type Chain = SmallVec<[Entity; 8]>;

/// Scene world containing all scene objects
pub struct SceneWorld {
    inner: hecs::World,
    registry: ComponentRegistry,
    config: SceneConfig,
}

impl SceneWorld {
    /// Create an empty world with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty world
    #[must_use]
    pub fn with_config(config: SceneConfig) -> Self {
        let mut inner = hecs::World::new();
        if config.capacity > 0 {
            inner.reserve::<NodeBundle>(config.capacity);
        }
        log::info!(
            "Created scene '{}' ({:?} propagation)",
            config.name,
            config.propagation
        );
        Self {
            inner,
            registry: ComponentRegistry::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The registry used by [`add_component_by`](Self::add_component_by)
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    // -------------------------------------------------------------------------
    // Objects
    // -------------------------------------------------------------------------

    /// Spawn a root object at the origin
    pub fn spawn(&mut self, name: impl Into<String>) -> SceneObject {
        let name = Name::new(name);
        if self.config.log_hierarchy {
            log::debug!("Spawning '{}'", name.as_str());
        }
        let bundle: NodeBundle = (name, Transform::default(), Children::new(), Components::new());
        SceneObject(self.inner.spawn(bundle))
    }

    /// Spawn an object directly under `parent`
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not a live object
    pub fn spawn_child(
        &mut self,
        parent: SceneObject,
        name: impl Into<String>,
    ) -> Result<SceneObject, SceneError> {
        self.check(parent)?;
        let child = self.spawn(name);
        self.add_child(parent, child)?;
        Ok(child)
    }

    /// Despawn an object and its whole subtree.
    ///
    /// Every component of every despawned object is detached first, in
    /// attach order, parents before children.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn despawn(&mut self, object: SceneObject) -> Result<(), SceneError> {
        if let Some(parent) = self.parent(object)? {
            self.remove_child(parent, object)?;
        }

        let subtree = self.subtree(object)?;
        for &entity in &subtree {
            self.remove_all_components(SceneObject(entity))?;
        }
        for &entity in &subtree {
            self.inner.despawn(entity)?;
        }
        if self.config.log_hierarchy {
            log::debug!("Despawned {object} ({} objects)", subtree.len());
        }
        Ok(())
    }

    /// Check if the handle refers to a live object
    #[must_use]
    pub fn contains(&self, object: SceneObject) -> bool {
        self.inner.contains(object.0)
    }

    /// Get the number of live objects
    #[must_use]
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The object's name
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn name(&self, object: SceneObject) -> Result<String, SceneError> {
        Ok(self.inner.get::<&Name>(object.0)?.0.clone())
    }

    /// Rename an object
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn set_name(&mut self, object: SceneObject, name: impl Into<String>) -> Result<(), SceneError> {
        *self.inner.query_one_mut::<&mut Name>(object.0)? = Name::new(name);
        Ok(())
    }

    /// An object with the given name; the oldest slot wins among duplicates
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<SceneObject> {
        self.inner
            .query::<&Name>()
            .iter()
            .filter(|(_, n)| n.as_str() == name)
            .map(|(entity, _)| entity)
            .min_by_key(|entity| entity.id())
            .map(SceneObject)
    }

    /// All objects without a parent, ordered by slot
    #[must_use]
    pub fn roots(&self) -> Vec<SceneObject> {
        let mut roots: Vec<Entity> = self
            .inner
            .query::<(&Name, Option<&Parent>)>()
            .iter()
            .filter(|(_, (_, parent))| parent.is_none())
            .map(|(entity, _)| entity)
            .collect();
        roots.sort_by_key(|entity| entity.id());
        roots.into_iter().map(SceneObject).collect()
    }

    // -------------------------------------------------------------------------
    // Components
    // -------------------------------------------------------------------------

    /// Instantiate the component registered under `type_tag` and attach it.
    ///
    /// An unknown tag is not an error: it logs a warning and returns
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn add_component_by(
        &mut self,
        object: SceneObject,
        type_tag: &str,
    ) -> Result<Option<&mut ComponentEntry>, SceneError> {
        self.check(object)?;
        let Some(component) = self.registry.create(type_tag) else {
            log::warn!("Unknown component type '{type_tag}', not attached to {object}");
            return Ok(None);
        };
        self.attach(object, component).map(Some)
    }

    /// Attach an already built component.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn add_component<T: Component>(
        &mut self,
        object: SceneObject,
        component: T,
    ) -> Result<&mut ComponentEntry, SceneError> {
        self.attach(object, Box::new(component))
    }

    fn attach(
        &mut self,
        object: SceneObject,
        component: Box<dyn Component>,
    ) -> Result<&mut ComponentEntry, SceneError> {
        let components = self.inner.query_one_mut::<&mut Components>(object.0)?;
        let mut entry = ComponentEntry::new(component);
        log::debug!("Attaching '{}' to {object}", entry.type_name());
        entry.attach(object);

        let index = components.len();
        components.0.push(entry);
        Ok(&mut components.0[index])
    }

    /// Detach and return the first component with the given tag.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn remove_first_component_by(
        &mut self,
        object: SceneObject,
        type_tag: &str,
    ) -> Result<Option<Box<dyn Component>>, SceneError> {
        let components = self.inner.query_one_mut::<&mut Components>(object.0)?;
        Ok(components
            .position_by(type_tag)
            .map(|index| detach(object, components.0.remove(index))))
    }

    /// Detach and return the first component of type `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn remove_first_component<T: Component>(
        &mut self,
        object: SceneObject,
    ) -> Result<Option<Box<dyn Component>>, SceneError> {
        let components = self.inner.query_one_mut::<&mut Components>(object.0)?;
        Ok(components
            .position_of::<T>()
            .map(|index| detach(object, components.0.remove(index))))
    }

    /// Detach and return every component with the given tag, in attach order.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn remove_components(
        &mut self,
        object: SceneObject,
        type_tag: &str,
    ) -> Result<Vec<Box<dyn Component>>, SceneError> {
        let components = self.inner.query_one_mut::<&mut Components>(object.0)?;
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut components.0)
            .into_iter()
            .partition(|entry| entry.type_name() == type_tag);
        components.0 = kept;
        Ok(removed.into_iter().map(|entry| detach(object, entry)).collect())
    }

    /// Detach and return every component, in attach order.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn remove_all_components(
        &mut self,
        object: SceneObject,
    ) -> Result<Vec<Box<dyn Component>>, SceneError> {
        let components = self.inner.query_one_mut::<&mut Components>(object.0)?;
        Ok(std::mem::take(&mut components.0)
            .into_iter()
            .map(|entry| detach(object, entry))
            .collect())
    }

    /// The first component with the given tag.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn get_first_component_by(
        &mut self,
        object: SceneObject,
        type_tag: &str,
    ) -> Result<Option<&mut ComponentEntry>, SceneError> {
        let components = self.inner.query_one_mut::<&mut Components>(object.0)?;
        Ok(components.0.iter_mut().find(|entry| entry.type_name() == type_tag))
    }

    /// Every component with the given tag, in attach order.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn get_components_by(
        &mut self,
        object: SceneObject,
        type_tag: &str,
    ) -> Result<Vec<&mut ComponentEntry>, SceneError> {
        let components = self.inner.query_one_mut::<&mut Components>(object.0)?;
        Ok(components
            .0
            .iter_mut()
            .filter(|entry| entry.type_name() == type_tag)
            .collect())
    }

    /// The first component of type `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn get_first_component<T: Component>(
        &mut self,
        object: SceneObject,
    ) -> Result<Option<&mut T>, SceneError> {
        let components = self.inner.query_one_mut::<&mut Components>(object.0)?;
        Ok(components
            .0
            .iter_mut()
            .find_map(|entry| entry.downcast_mut::<T>()))
    }

    /// Every component of type `T`, in attach order.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn get_components<T: Component>(
        &mut self,
        object: SceneObject,
    ) -> Result<Vec<&mut T>, SceneError> {
        let components = self.inner.query_one_mut::<&mut Components>(object.0)?;
        Ok(components
            .0
            .iter_mut()
            .filter_map(|entry| entry.downcast_mut::<T>())
            .collect())
    }

    /// Every component, in attach order.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn get_all_components(
        &mut self,
        object: SceneObject,
    ) -> Result<&mut [ComponentEntry], SceneError> {
        let components = self.inner.query_one_mut::<&mut Components>(object.0)?;
        Ok(&mut components.0)
    }

    /// Number of attached components
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn component_count(&self, object: SceneObject) -> Result<usize, SceneError> {
        Ok(self.inner.get::<&Components>(object.0)?.len())
    }

    /// Type tag and enabled flag of every component, in attach order
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn component_tags(&self, object: SceneObject) -> Result<Vec<(&'static str, bool)>, SceneError> {
        let components = self.inner.get::<&Components>(object.0)?;
        Ok(components
            .0
            .iter()
            .map(|entry| (entry.type_name(), entry.is_enabled()))
            .collect())
    }

    // -------------------------------------------------------------------------
    // Hierarchy
    // -------------------------------------------------------------------------

    /// Make `child` the last child of `parent`.
    ///
    /// A child that already has another parent is unlinked from it first.
    /// Linking an object under itself or under one of its descendants is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle is stale, or [`SceneError::Cycle`]
    pub fn add_child(&mut self, parent: SceneObject, child: SceneObject) -> Result<(), SceneError> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child || self.ancestry(parent)?.contains(&child.0) {
            return Err(SceneError::Cycle { parent, child });
        }

        match self.parent(child)? {
            Some(old) if old == parent => return Ok(()),
            Some(old) => {
                self.inner.query_one_mut::<&mut Children>(old.0)?.remove(child.0);
            }
            None => {}
        }

        self.inner.insert_one(child.0, Parent::new(parent.0))?;
        self.inner.query_one_mut::<&mut Children>(parent.0)?.add(child.0);
        self.inner.query_one_mut::<&mut Transform>(child.0)?.mark_world_dirty();

        if self.config.log_hierarchy {
            log::debug!("Linked {child} under {parent}");
        }
        Ok(())
    }

    /// Unlink `child` from `parent`; the child becomes a root.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle is stale, or
    /// [`SceneError::ChildNotFound`] if `child` is not a child of `parent`
    pub fn remove_child(&mut self, parent: SceneObject, child: SceneObject) -> Result<(), SceneError> {
        self.check(parent)?;
        self.check(child)?;
        if !self.inner.query_one_mut::<&mut Children>(parent.0)?.remove(child.0) {
            return Err(SceneError::ChildNotFound { parent, child });
        }

        self.inner.remove_one::<Parent>(child.0)?;
        self.inner.query_one_mut::<&mut Transform>(child.0)?.mark_world_dirty();

        if self.config.log_hierarchy {
            log::debug!("Unlinked {child} from {parent}");
        }
        Ok(())
    }

    /// The object's parent, `None` for a root
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn parent(&self, object: SceneObject) -> Result<Option<SceneObject>, SceneError> {
        self.check(object)?;
        Ok(self
            .inner
            .get::<&Parent>(object.0)
            .ok()
            .map(|parent| SceneObject(parent.entity())))
    }

    /// The object's children, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn children(&self, object: SceneObject) -> Result<Vec<SceneObject>, SceneError> {
        let children = self.inner.get::<&Children>(object.0)?;
        Ok(children.iter().copied().map(SceneObject).collect())
    }

    /// Number of direct children
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn children_count(&self, object: SceneObject) -> Result<usize, SceneError> {
        Ok(self.inner.get::<&Children>(object.0)?.len())
    }

    /// `object` and its ancestors, root first
    fn ancestry(&self, object: SceneObject) -> Result<Chain, SceneError> {
        self.check(object)?;
        let mut chain = Chain::new();
        let mut current = Some(object.0);
        while let Some(entity) = current {
            chain.push(entity);
            current = self.inner.get::<&Parent>(entity).ok().map(|p| p.entity());
        }
        chain.reverse();
        Ok(chain)
    }

    /// `object` and all its descendants, parents before children
    fn subtree(&self, object: SceneObject) -> Result<Vec<Entity>, SceneError> {
        self.check(object)?;
        let mut nodes = vec![object.0];
        let mut next = 0;
        while next < nodes.len() {
            let children = self.inner.get::<&Children>(nodes[next])?;
            nodes.extend(children.iter().copied());
            next += 1;
        }
        Ok(nodes)
    }

    fn check(&self, object: SceneObject) -> Result<(), SceneError> {
        if self.inner.contains(object.0) {
            Ok(())
        } else {
            Err(SceneError::NoSuchObject)
        }
    }

    // -------------------------------------------------------------------------
    // Transform
    // -------------------------------------------------------------------------

    /// A copy of the object's transform, pose and cache state as of now
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn transform(&self, object: SceneObject) -> Result<Transform, SceneError> {
        Ok((*self.inner.get::<&Transform>(object.0)?).clone())
    }

    /// Apply a local pose edit, then notify every component of the object
    fn edit_local(
        &mut self,
        object: SceneObject,
        edit: impl FnOnce(&mut Transform),
    ) -> Result<(), SceneError> {
        let (transform, components) = self
            .inner
            .query_one_mut::<(&mut Transform, &mut Components)>(object.0)?;
        edit(transform);
        for entry in &mut components.0 {
            entry.notify_transform_changed(object);
        }
        Ok(())
    }

    /// Set the position relative to the parent
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn set_local_position(&mut self, object: SceneObject, position: Vec3) -> Result<(), SceneError> {
        self.edit_local(object, |t| t.set_position(position))
    }

    /// Set the orientation relative to the parent
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn set_local_orientation(
        &mut self,
        object: SceneObject,
        orientation: Quat,
    ) -> Result<(), SceneError> {
        self.edit_local(object, |t| t.set_orientation(orientation))
    }

    /// Set the scale relative to the parent
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn set_local_scale(&mut self, object: SceneObject, scale: Vec3) -> Result<(), SceneError> {
        self.edit_local(object, |t| t.set_scale(scale))
    }

    /// Move the object by `delta` in parent space
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn translate(&mut self, object: SceneObject, delta: Vec3) -> Result<(), SceneError> {
        self.edit_local(object, |t| t.translate(delta))
    }

    /// Apply `rotation` on top of the object's local orientation
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn rotate(&mut self, object: SceneObject, rotation: Quat) -> Result<(), SceneError> {
        self.edit_local(object, |t| t.rotate(rotation))
    }

    /// The cached local matrix, rebuilt if the pose changed
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn local_matrix(&self, object: SceneObject) -> Result<Mat4, SceneError> {
        Ok(self.inner.get::<&mut Transform>(object.0)?.local_matrix())
    }

    /// The world matrix, `parent_world * local` up to the root.
    ///
    /// Walks the ancestor chain root first; each transform only recomputes
    /// when its own pose or (under generational propagation) its parent's
    /// world matrix changed since its last recompute.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn world_matrix(&self, object: SceneObject) -> Result<Mat4, SceneError> {
        let propagation = self.config.propagation;
        let mut parent: Option<ParentWorld> = None;
        let mut matrix = Mat4::IDENTITY;

        for entity in self.ancestry(object)? {
            let mut transform = self.inner.get::<&mut Transform>(entity)?;
            matrix = transform.resolve_world(parent, propagation);
            parent = Some(ParentWorld {
                parent: entity,
                matrix,
                generation: transform.generation(),
            });
        }
        Ok(matrix)
    }

    /// The parent's world matrix, `None` for a root
    fn parent_world_matrix(&self, object: SceneObject) -> Result<Option<Mat4>, SceneError> {
        match self.parent(object)? {
            Some(parent) => self.world_matrix(parent).map(Some),
            None => Ok(None),
        }
    }

    /// Position in world space
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn world_position(&self, object: SceneObject) -> Result<Vec3, SceneError> {
        let local = self.transform(object)?.position();
        Ok(match self.parent_world_matrix(object)? {
            Some(parent_world) => parent_world * local,
            None => local,
        })
    }

    /// Orientation in world space, the product of the local orientations up
    /// to the root
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn world_orientation(&self, object: SceneObject) -> Result<Quat, SceneError> {
        let mut orientation = Quat::IDENTITY;
        for entity in self.ancestry(object)? {
            orientation = orientation * self.inner.get::<&Transform>(entity)?.orientation();
        }
        Ok(orientation)
    }

    /// Scale in world space, the componentwise product of the local scales
    /// up to the root
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn world_scale(&self, object: SceneObject) -> Result<Vec3, SceneError> {
        let mut scale = Vec3::UNIT_SCALE;
        for entity in self.ancestry(object)? {
            scale *= self.inner.get::<&Transform>(entity)?.scale();
        }
        Ok(scale)
    }

    /// Place the object at a world-space position
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn set_world_position(&mut self, object: SceneObject, position: Vec3) -> Result<(), SceneError> {
        let local = match self.parent_world_matrix(object)? {
            Some(parent_world) => parent_world.inversed() * position,
            None => position,
        };
        self.set_local_position(object, local)
    }

    /// Set the world-space orientation
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn set_world_orientation(
        &mut self,
        object: SceneObject,
        orientation: Quat,
    ) -> Result<(), SceneError> {
        let local = match self.parent(object)? {
            Some(parent) => self.world_orientation(parent)?.inversed() * orientation,
            None => orientation,
        };
        self.set_local_orientation(object, local)
    }

    /// Set the world-space scale
    ///
    /// # Errors
    ///
    /// Returns an error if `object` is not a live object
    pub fn set_world_scale(&mut self, object: SceneObject, scale: Vec3) -> Result<(), SceneError> {
        let local = match self.parent(object)? {
            Some(parent) => scale / self.world_scale(parent)?,
            None => scale,
        };
        self.set_local_scale(object, local)
    }
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneWorld")
            .field("name", &self.config.name)
            .field("objects", &self.inner.len())
            .field("registry", &self.registry)
            .finish()
    }
}

/// Run the detach hook and hand the component back
fn detach(object: SceneObject, mut entry: ComponentEntry) -> Box<dyn Component> {
    log::debug!("Detaching '{}' from {object}", entry.type_name());
    entry.detach(object);
    entry.into_inner()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::Propagation;
    use crate::math::scalar::HALF_PI;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Records every hook call into a shared log
    struct Recorder {
        label: &'static str,
        log: Log,
    }

    impl Recorder {
        fn new(label: &'static str, log: &Log) -> Self {
            Self {
                label,
                log: Arc::clone(log),
            }
        }

        fn record(&self, event: &str) {
            self.log.lock().unwrap().push(format!("{}:{event}", self.label));
        }
    }

    impl Component for Recorder {
        fn on_attached(&mut self, _object: SceneObject) {
            self.record("attached");
        }

        fn on_detached(&mut self, _object: SceneObject) {
            self.record("detached");
        }

        fn on_transform_changed(&mut self, _object: SceneObject) {
            self.record("moved");
        }
    }

    /// Remembers which object reported the last pose change
    #[derive(Default)]
    struct Follower {
        moves: u32,
        last_moved: Option<SceneObject>,
    }

    impl Component for Follower {
        fn on_transform_changed(&mut self, object: SceneObject) {
            self.moves += 1;
            self.last_moved = Some(object);
        }
    }

    #[derive(Default)]
    struct Mesh;

    impl Component for Mesh {}

    #[derive(Default)]
    struct Collider {
        radius: f32,
    }

    impl Component for Collider {}

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn chain(world: &mut SceneWorld) -> (SceneObject, SceneObject, SceneObject) {
        let a = world.spawn("A");
        let b = world.spawn_child(a, "B").unwrap();
        let c = world.spawn_child(b, "C").unwrap();
        (a, b, c)
    }

    #[test]
    fn test_spawn_and_names() {
        let mut world = SceneWorld::new();
        assert!(world.is_empty());

        let root = world.spawn("Root");
        let child = world.spawn_child(root, "Child").unwrap();
        assert_eq!(world.len(), 2);
        assert_eq!(world.name(child).unwrap(), "Child");
        assert_eq!(world.find_by_name("Root"), Some(root));
        assert_eq!(world.find_by_name("Missing"), None);

        world.set_name(child, "Renamed").unwrap();
        assert_eq!(world.find_by_name("Renamed"), Some(child));
        assert_eq!(world.roots(), vec![root]);
    }

    #[test]
    fn test_root_plus_child_world_position() {
        let mut world = SceneWorld::new();
        let root = world.spawn("Root");
        let child = world.spawn_child(root, "Child").unwrap();

        world.set_local_position(root, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        world.set_local_position(child, Vec3::new(0.0, 1.0, 0.0)).unwrap();

        assert!(approx(world.world_position(child).unwrap(), Vec3::new(1.0, 1.0, 0.0)));
        assert!(approx(
            world.world_matrix(child).unwrap() * Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.0)
        ));
    }

    #[test]
    fn test_world_matrix_is_cached() {
        let mut world = SceneWorld::new();
        let (a, b, c) = chain(&mut world);
        world.set_local_position(a, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        world.set_local_position(b, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        world.set_local_position(c, Vec3::new(0.0, 0.0, 3.0)).unwrap();

        let first = world.world_matrix(c).unwrap();
        let second = world.world_matrix(c).unwrap();
        assert_eq!(first, second);
        assert!(approx(first * Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)));

        // One recompute per node, however many reads
        for object in [a, b, c] {
            let transform = world.transform(object).unwrap();
            assert_eq!(transform.world_recomputes(), 1);
            assert_eq!(transform.local_recomputes(), 1);
        }
    }

    #[test]
    fn test_ancestor_change_reaches_descendants() {
        let mut world = SceneWorld::new();
        let (a, _b, c) = chain(&mut world);
        world.set_local_position(c, Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let _ = world.world_matrix(c).unwrap();

        world.set_local_position(a, Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert!(approx(
            world.world_matrix(c).unwrap() * Vec3::ZERO,
            Vec3::new(10.0, 0.0, 1.0)
        ));
        assert_eq!(world.transform(c).unwrap().world_recomputes(), 2);
    }

    #[test]
    fn test_legacy_propagation_keeps_stale_descendants() {
        let config = SceneConfig::default().with_propagation(Propagation::Legacy);
        let mut world = SceneWorld::with_config(config);
        let (a, b, c) = chain(&mut world);
        let _ = world.world_matrix(c).unwrap();

        world.set_local_position(a, Vec3::new(10.0, 0.0, 0.0)).unwrap();
        // The root itself is current
        assert!(approx(world.world_matrix(a).unwrap() * Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)));
        // The grandchild still reports the old world matrix
        assert!(approx(world.world_matrix(c).unwrap() * Vec3::ZERO, Vec3::ZERO));

        // Touching the grandchild alone rebuilds it from the stale parent
        world.set_local_position(c, Vec3::ZERO).unwrap();
        assert!(approx(world.world_matrix(c).unwrap() * Vec3::ZERO, Vec3::ZERO));

        // Touching every level below the moved ancestor refreshes the chain
        world.set_local_position(b, Vec3::ZERO).unwrap();
        world.set_local_position(c, Vec3::ZERO).unwrap();
        assert!(approx(world.world_matrix(c).unwrap() * Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_world_matrix_is_product_of_locals() {
        let mut world = SceneWorld::new();
        let (a, b, c) = chain(&mut world);
        world.set_local_position(a, Vec3::new(1.0, -2.0, 3.0)).unwrap();
        world
            .set_local_orientation(a, Quat::from_angle_axis(0.7, Vec3::new(1.0, 1.0, 0.0).normalized()))
            .unwrap();
        world.set_local_scale(a, Vec3::new(2.0, 2.0, 2.0)).unwrap();
        world.set_local_position(b, Vec3::new(0.5, 4.0, -1.0)).unwrap();
        world
            .set_local_orientation(b, Quat::from_angle_axis(HALF_PI, Vec3::UNIT_Z))
            .unwrap();
        world.set_local_scale(b, Vec3::new(1.0, 3.0, 0.5)).unwrap();
        world.set_local_position(c, Vec3::new(-2.0, 0.0, 1.5)).unwrap();
        world
            .set_local_orientation(c, Quat::from_angle_axis(-1.2, Vec3::UNIT_X))
            .unwrap();
        world.set_local_scale(c, Vec3::new(0.25, 1.0, 4.0)).unwrap();

        let expected = world.local_matrix(a).unwrap()
            * world.local_matrix(b).unwrap()
            * world.local_matrix(c).unwrap();
        let actual = world.world_matrix(c).unwrap();
        for (row_a, row_e) in actual.to_rows().iter().zip(expected.to_rows().iter()) {
            for (x, y) in row_a.iter().zip(row_e.iter()) {
                assert!((x - y).abs() < 1e-4, "{actual:?} != {expected:?}");
            }
        }

        // Changing the middle link keeps the product in sync
        world.rotate(b, Quat::from_angle_axis(0.3, Vec3::UNIT_Y)).unwrap();
        let expected = world.local_matrix(a).unwrap()
            * world.local_matrix(b).unwrap()
            * world.local_matrix(c).unwrap();
        let actual = world.world_matrix(c).unwrap();
        for (row_a, row_e) in actual.to_rows().iter().zip(expected.to_rows().iter()) {
            for (x, y) in row_a.iter().zip(row_e.iter()) {
                assert!((x - y).abs() < 1e-4, "{actual:?} != {expected:?}");
            }
        }
    }

    #[test]
    fn test_transform_copy_does_not_block_matrices() {
        let mut world = SceneWorld::new();
        let (a, _b, c) = chain(&mut world);
        world.set_local_position(a, Vec3::new(1.0, 0.0, 0.0)).unwrap();

        let before = world.transform(a).unwrap();
        let world_a = world.world_matrix(a).unwrap();
        let local_a = world.local_matrix(a).unwrap();
        let world_c = world.world_matrix(c).unwrap();

        assert_eq!(before.position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(world_a, local_a);
        assert!(approx(world_c * Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)));
        // The copy is detached from the live cache
        assert_eq!(before.world_recomputes(), 0);
        assert_eq!(world.transform(a).unwrap().world_recomputes(), 1);
    }

    #[test]
    fn test_translate_and_rotate_notify_components() {
        let log: Log = Arc::default();
        let mut world = SceneWorld::new();
        let object = world.spawn("Turret");
        world.add_component(object, Recorder::new("turret", &log)).unwrap();
        world.add_component(object, Follower::default()).unwrap();

        world.translate(object, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        world.translate(object, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        world.rotate(object, Quat::from_angle_axis(HALF_PI, Vec3::UNIT_Y)).unwrap();

        let transform = world.transform(object).unwrap();
        assert_eq!(transform.position(), Vec3::new(1.0, 2.0, 0.0));
        assert!(approx(transform.forward(), Vec3::new(-1.0, 0.0, 0.0)));

        let follower = world.get_first_component::<Follower>(object).unwrap().unwrap();
        assert_eq!(follower.moves, 3);
        assert_eq!(follower.last_moved, Some(object));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["turret:attached", "turret:moved", "turret:moved", "turret:moved"]
        );

        let stale = object;
        world.despawn(object).unwrap();
        assert_eq!(world.translate(stale, Vec3::UNIT_X), Err(SceneError::NoSuchObject));
    }

    #[test]
    fn test_set_world_position_roundtrip() {
        let mut world = SceneWorld::new();
        let (a, b, c) = chain(&mut world);
        world.set_local_position(a, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        world
            .set_local_orientation(b, Quat::from_angle_axis(HALF_PI, Vec3::UNIT_Y))
            .unwrap();
        world.set_local_scale(b, Vec3::new(2.0, 2.0, 2.0)).unwrap();

        let target = Vec3::new(-4.0, 5.0, 0.5);
        world.set_world_position(c, target).unwrap();
        assert!(approx(world.world_position(c).unwrap(), target));
        assert!(approx(world.world_matrix(c).unwrap() * Vec3::ZERO, target));
    }

    #[test]
    fn test_world_orientation_and_scale() {
        let mut world = SceneWorld::new();
        let (a, b, _c) = chain(&mut world);
        let quarter = Quat::from_angle_axis(HALF_PI, Vec3::UNIT_Z);
        world.set_local_orientation(a, quarter).unwrap();
        world.set_local_orientation(b, quarter).unwrap();
        world.set_local_scale(a, Vec3::new(2.0, 3.0, 4.0)).unwrap();

        let half = Quat::from_angle_axis(2.0 * HALF_PI, Vec3::UNIT_Z);
        assert!(world.world_orientation(b).unwrap().dot(half).abs() > 1.0 - 1e-5);
        assert_eq!(world.world_scale(b).unwrap(), Vec3::new(2.0, 3.0, 4.0));

        world.set_world_scale(b, Vec3::new(4.0, 3.0, 2.0)).unwrap();
        assert!(approx(world.transform(b).unwrap().scale(), Vec3::new(2.0, 1.0, 0.5)));

        world.set_world_orientation(b, Quat::IDENTITY).unwrap();
        assert!(world.world_orientation(b).unwrap().dot(Quat::IDENTITY).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_component_hook_ordering() {
        let log: Log = Arc::default();
        let mut world = SceneWorld::new();
        let object = world.spawn("Player");

        world.add_component(object, Recorder::new("first", &log)).unwrap();
        world.add_component(object, Recorder::new("second", &log)).unwrap();
        world.set_local_position(object, Vec3::UNIT_X).unwrap();
        let removed = world.remove_all_components(object).unwrap();
        assert_eq!(removed.len(), 2);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "first:attached",
                "second:attached",
                "first:moved",
                "second:moved",
                "first:detached",
                "second:detached",
            ]
        );
    }

    #[test]
    fn test_add_component_by_name() {
        let mut world = SceneWorld::new();
        world.registry_mut().register::<Mesh>().register::<Collider>();
        let object = world.spawn("Crate");

        let entry = world.add_component_by(object, "Mesh").unwrap().unwrap();
        assert_eq!(entry.type_name(), "Mesh");
        assert_eq!(entry.owner(), Some(object));
        assert!(entry.is_enabled());

        world.add_component_by(object, "Collider").unwrap();
        world.add_component_by(object, "Mesh").unwrap();
        assert_eq!(world.component_count(object).unwrap(), 3);
        assert_eq!(world.get_components_by(object, "Mesh").unwrap().len(), 2);
        assert_eq!(world.get_components::<Collider>(object).unwrap().len(), 1);

        world.get_first_component::<Collider>(object).unwrap().unwrap().radius = 2.5;
        let entry = world.get_first_component_by(object, "Collider").unwrap().unwrap();
        assert_eq!(entry.downcast_ref::<Collider>().unwrap().radius, 2.5);

        let tags: Vec<_> = world
            .get_all_components(object)
            .unwrap()
            .iter()
            .map(ComponentEntry::type_name)
            .collect();
        assert_eq!(tags, vec!["Mesh", "Collider", "Mesh"]);
    }

    #[test]
    fn test_unknown_component_tag_is_not_an_error() {
        let mut world = SceneWorld::new();
        let object = world.spawn("Crate");

        assert!(world.add_component_by(object, "Nope").unwrap().is_none());
        assert!(world.get_first_component_by(object, "Nope").unwrap().is_none());
        assert!(world.get_components_by(object, "Nope").unwrap().is_empty());
        assert!(world.remove_first_component_by(object, "Nope").unwrap().is_none());
        assert_eq!(world.component_count(object).unwrap(), 0);
    }

    #[test]
    fn test_remove_components() {
        let mut world = SceneWorld::new();
        let object = world.spawn("Crate");
        world.add_component(object, Mesh).unwrap();
        world.add_component(object, Collider::default()).unwrap();
        world.add_component(object, Mesh).unwrap();

        let first = world.remove_first_component_by(object, "Mesh").unwrap().unwrap();
        assert!(first.is::<Mesh>());
        assert_eq!(world.component_count(object).unwrap(), 2);

        let colliders = world.remove_first_component::<Collider>(object).unwrap();
        assert!(colliders.is_some());

        world.add_component(object, Mesh).unwrap();
        let meshes = world.remove_components(object, "Mesh").unwrap();
        assert_eq!(meshes.len(), 2);
        assert_eq!(world.component_count(object).unwrap(), 0);
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut world = SceneWorld::new();
        let (a, b, c) = chain(&mut world);

        assert_eq!(world.add_child(a, a), Err(SceneError::Cycle { parent: a, child: a }));
        assert_eq!(world.add_child(c, a), Err(SceneError::Cycle { parent: c, child: a }));
        assert_eq!(world.parent(b).unwrap(), Some(a));
        assert_eq!(world.children(b).unwrap(), vec![c]);
    }

    #[test]
    fn test_add_child_reparents() {
        let mut world = SceneWorld::new();
        let (a, b, c) = chain(&mut world);
        world.set_local_position(a, Vec3::new(5.0, 0.0, 0.0)).unwrap();
        assert!(approx(world.world_position(c).unwrap(), Vec3::new(5.0, 0.0, 0.0)));

        let other = world.spawn("Other");
        world.add_child(other, c).unwrap();

        assert_eq!(world.parent(c).unwrap(), Some(other));
        assert_eq!(world.children_count(b).unwrap(), 0);
        assert_eq!(world.children(other).unwrap(), vec![c]);
        assert!(approx(world.world_position(c).unwrap(), Vec3::ZERO));
        assert!(approx(world.world_matrix(c).unwrap() * Vec3::ZERO, Vec3::ZERO));
    }

    #[test]
    fn test_remove_child() {
        let mut world = SceneWorld::new();
        let (a, b, c) = chain(&mut world);

        assert_eq!(
            world.remove_child(a, c),
            Err(SceneError::ChildNotFound { parent: a, child: c })
        );

        world.remove_child(a, b).unwrap();
        assert_eq!(world.parent(b).unwrap(), None);
        assert_eq!(world.children_count(a).unwrap(), 0);
        assert_eq!(world.roots(), vec![a, b]);
        // The grandchild stays attached to its parent
        assert_eq!(world.parent(c).unwrap(), Some(b));
    }

    #[test]
    fn test_despawn_subtree() {
        let log: Log = Arc::default();
        let mut world = SceneWorld::new();
        let (a, b, c) = chain(&mut world);
        world.add_component(b, Recorder::new("b", &log)).unwrap();
        world.add_component(c, Recorder::new("c", &log)).unwrap();

        world.despawn(b).unwrap();
        assert!(world.contains(a));
        assert!(!world.contains(b));
        assert!(!world.contains(c));
        assert_eq!(world.children_count(a).unwrap(), 0);
        assert_eq!(world.len(), 1);

        let log = log.lock().unwrap();
        assert_eq!(log[2..], ["b:detached", "c:detached"]);
    }

    #[test]
    fn test_stale_handle() {
        let mut world = SceneWorld::new();
        let object = world.spawn("Gone");
        world.despawn(object).unwrap();

        assert_eq!(world.name(object), Err(SceneError::NoSuchObject));
        assert_eq!(world.world_matrix(object), Err(SceneError::NoSuchObject));
        assert_eq!(
            world.set_local_position(object, Vec3::UNIT_X),
            Err(SceneError::NoSuchObject)
        );
        assert!(world.add_component_by(object, "Mesh").is_err());
        assert!(world.parent(object).is_err());
    }
}
