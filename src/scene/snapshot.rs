//! Scene snapshots
//!
//! Supports saving and loading a scene hierarchy in RON (Rusty Object
//! Notation) or JSON format. A snapshot records names, local poses,
//! parent links and the type tags of attached components. Components are
//! recreated through the world's [`ComponentRegistry`](super::ComponentRegistry)
//! on restore; their internal state is not captured.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::hierarchy::SceneObject;
use super::world::SceneWorld;
use super::SceneError;
use crate::math::{Quat, Vec3};

/// Current snapshot format version
const SNAPSHOT_VERSION: u32 = 1;

/// A component reference inside a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedComponent {
    /// Registry tag
    pub type_name: String,
    /// Enabled flag at capture time
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

/// A serializable scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedObject {
    /// Object name
    pub name: String,
    /// Local position
    pub position: Vec3,
    /// Local orientation
    pub orientation: Quat,
    /// Local scale
    pub scale: Vec3,
    /// Index of the parent object; always lower than this object's index
    pub parent_index: Option<usize>,
    /// Attached components, in attach order
    #[serde(default)]
    pub components: Vec<SerializedComponent>,
}

impl Default for SerializedObject {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::UNIT_SCALE,
            parent_index: None,
            components: Vec::new(),
        }
    }
}

/// A serializable scene hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Scene name
    pub name: String,
    /// Format version for compatibility
    pub version: u32,
    /// All objects, parents before children
    pub objects: Vec<SerializedObject>,
}

impl SceneSnapshot {
    /// Create a new empty snapshot
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: SNAPSHOT_VERSION,
            objects: Vec::new(),
        }
    }

    /// Record every object of `world`, roots in slot order, each followed
    /// by its subtree depth-first
    ///
    /// # Errors
    ///
    /// Returns an error if the hierarchy references a dead object
    pub fn capture(world: &SceneWorld) -> Result<Self, SceneError> {
        let mut snapshot = Self::new(world.config().name.clone());
        let mut stack: Vec<(SceneObject, Option<usize>)> =
            world.roots().into_iter().rev().map(|root| (root, None)).collect();

        while let Some((object, parent_index)) = stack.pop() {
            let index = snapshot.add_object(capture_object(world, object, parent_index)?);
            for child in world.children(object)?.into_iter().rev() {
                stack.push((child, Some(index)));
            }
        }

        log::info!(
            "Captured scene '{}' ({} objects)",
            snapshot.name,
            snapshot.object_count()
        );
        Ok(snapshot)
    }

    /// Spawn the recorded objects into `world` and return them in snapshot order.
    ///
    /// Components whose tag is not registered in the world are skipped with
    /// a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if a parent index does not point to an earlier object
    pub fn restore(&self, world: &mut SceneWorld) -> Result<Vec<SceneObject>, SceneError> {
        let mut spawned: Vec<SceneObject> = Vec::with_capacity(self.objects.len());

        for (index, record) in self.objects.iter().enumerate() {
            let object = world.spawn(record.name.clone());
            if let Some(parent_index) = record.parent_index {
                let parent = spawned.get(parent_index).copied().ok_or_else(|| {
                    SceneError::Deserialize(format!(
                        "object {index} references parent {parent_index}, which is not an earlier object"
                    ))
                })?;
                world.add_child(parent, object)?;
            }

            world.set_local_position(object, record.position)?;
            world.set_local_orientation(object, record.orientation)?;
            world.set_local_scale(object, record.scale)?;

            for component in &record.components {
                if let Some(entry) = world.add_component_by(object, &component.type_name)? {
                    entry.set_enabled(component.enabled);
                }
            }
            spawned.push(object);
        }

        log::info!("Restored scene '{}' ({} objects)", self.name, spawned.len());
        Ok(spawned)
    }

    /// Add an object to the snapshot
    pub fn add_object(&mut self, object: SerializedObject) -> usize {
        let index = self.objects.len();
        self.objects.push(object);
        index
    }

    /// Get the number of objects
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Check if the snapshot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// How many times each component tag appears
    #[must_use]
    pub fn component_histogram(&self) -> FxHashMap<&str, usize> {
        let mut counts = FxHashMap::default();
        for component in self.objects.iter().flat_map(|o| &o.components) {
            *counts.entry(component.type_name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Serialize to a pretty RON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron(&self) -> Result<String, SceneError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SceneError::Serialize(e.to_string()))
    }

    /// Parse from a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    pub fn from_ron(content: &str) -> Result<Self, SceneError> {
        ron::from_str(content).map_err(|e| SceneError::Deserialize(e.to_string()))
    }

    /// Serialize to a pretty JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String, SceneError> {
        serde_json::to_string_pretty(self).map_err(|e| SceneError::Serialize(e.to_string()))
    }

    /// Parse from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    pub fn from_json(content: &str) -> Result<Self, SceneError> {
        serde_json::from_str(content).map_err(|e| SceneError::Deserialize(e.to_string()))
    }

    /// Save the snapshot to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        fs::write(path, self.to_ron()?).map_err(|e| SceneError::Io(e.to_string()))?;
        log::info!("Saved scene '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Load a snapshot from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SceneError::Io(e.to_string()))?;
        log::info!("Loading scene from {}", path.display());
        Self::from_ron(&content)
    }

    /// Save the snapshot to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|e| SceneError::Io(e.to_string()))?;
        log::info!("Saved scene '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Load a snapshot from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SceneError::Io(e.to_string()))?;
        log::info!("Loading scene from {}", path.display());
        Self::from_json(&content)
    }
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

fn capture_object(
    world: &SceneWorld,
    object: SceneObject,
    parent_index: Option<usize>,
) -> Result<SerializedObject, SceneError> {
    let (position, orientation, scale) = {
        let transform = world.transform(object)?;
        (transform.position(), transform.orientation(), transform.scale())
    };
    Ok(SerializedObject {
        name: world.name(object)?,
        position,
        orientation,
        scale,
        parent_index,
        components: world
            .component_tags(object)?
            .into_iter()
            .map(|(type_name, enabled)| SerializedComponent {
                type_name: type_name.to_string(),
                enabled,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Component;

    #[derive(Default)]
    struct Mesh;

    impl Component for Mesh {}

    #[derive(Default)]
    struct Light;

    impl Component for Light {}

    fn sample_world() -> SceneWorld {
        let mut world = SceneWorld::new();
        world.registry_mut().register::<Mesh>().register::<Light>();

        let root = world.spawn("Root");
        world.set_local_position(root, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let arm = world.spawn_child(root, "Arm").unwrap();
        world.set_local_position(arm, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        world
            .set_local_orientation(arm, Quat::from_angle_axis(0.5, Vec3::UNIT_Z))
            .unwrap();
        let hand = world.spawn_child(arm, "Hand").unwrap();
        world.set_local_scale(hand, Vec3::splat(0.5)).unwrap();

        world.add_component_by(arm, "Mesh").unwrap();
        world.add_component_by(hand, "Light").unwrap().unwrap().set_enabled(false);
        world.spawn("Lamp");
        world
    }

    #[test]
    fn test_capture_orders_parents_first() {
        let world = sample_world();
        let snapshot = SceneSnapshot::capture(&world).unwrap();

        let names: Vec<_> = snapshot.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Root", "Arm", "Hand", "Lamp"]);
        assert_eq!(snapshot.objects[1].parent_index, Some(0));
        assert_eq!(snapshot.objects[2].parent_index, Some(1));
        assert_eq!(snapshot.objects[3].parent_index, None);
        assert_eq!(snapshot.objects[1].components[0].type_name, "Mesh");
        assert!(!snapshot.objects[2].components[0].enabled);
        assert_eq!(snapshot.component_histogram().get("Light"), Some(&1));
    }

    #[test]
    fn test_snapshot_ron_roundtrip() {
        let world = sample_world();
        let snapshot = SceneSnapshot::capture(&world).unwrap();

        let ron_str = snapshot.to_ron().unwrap();
        assert!(ron_str.contains("Hand"));

        let loaded = SceneSnapshot::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.version, SNAPSHOT_VERSION);
    }

    #[test]
    fn test_snapshot_json_restore() {
        let world = sample_world();
        let snapshot = SceneSnapshot::capture(&world).unwrap();
        let json = snapshot.to_json().unwrap();

        let mut restored = SceneWorld::new();
        restored.registry_mut().register::<Mesh>().register::<Light>();
        let objects = SceneSnapshot::from_json(&json).unwrap().restore(&mut restored).unwrap();
        assert_eq!(objects.len(), 4);

        let original_hand = world.find_by_name("Hand").unwrap();
        let hand = restored.find_by_name("Hand").unwrap();
        let expected = world.world_position(original_hand).unwrap();
        assert!((restored.world_position(hand).unwrap() - expected).length() < 1e-5);

        let light = restored.get_first_component_by(hand, "Light").unwrap().unwrap();
        assert!(!light.is_enabled());
        assert_eq!(light.owner(), Some(hand));
    }

    #[test]
    fn test_restore_skips_unknown_components() {
        let world = sample_world();
        let snapshot = SceneSnapshot::capture(&world).unwrap();

        let mut restored = SceneWorld::new();
        restored.registry_mut().register::<Mesh>();
        snapshot.restore(&mut restored).unwrap();

        let hand = restored.find_by_name("Hand").unwrap();
        let arm = restored.find_by_name("Arm").unwrap();
        assert_eq!(restored.component_count(hand).unwrap(), 0);
        assert_eq!(restored.component_count(arm).unwrap(), 1);
    }

    #[test]
    fn test_restore_rejects_forward_parent() {
        let mut snapshot = SceneSnapshot::new("Broken");
        snapshot.add_object(SerializedObject {
            name: "Orphan".to_string(),
            parent_index: Some(3),
            ..Default::default()
        });

        let mut world = SceneWorld::new();
        let result = snapshot.restore(&mut world);
        assert!(matches!(result, Err(SceneError::Deserialize(_))));
    }

    #[test]
    fn test_snapshot_file_roundtrip() {
        let world = sample_world();
        let snapshot = SceneSnapshot::capture(&world).unwrap();
        let path = std::env::temp_dir().join(format!("scene_core_{}.ron", std::process::id()));

        snapshot.save_ron(&path).unwrap();
        let loaded = SceneSnapshot::load_ron(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.object_count(), 4);

        let missing = SceneSnapshot::load_json(std::env::temp_dir().join("scene_core_missing.json"));
        assert!(matches!(missing, Err(SceneError::Io(_))));
    }
}
