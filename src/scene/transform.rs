//! Hierarchical transform with cached matrices
//!
//! Each scene object owns one [`Transform`] holding its pose relative to its
//! parent. Writes are cheap: they store the new value and mark the cached
//! matrices dirty. Reads recompute lazily.
//!
//! The world matrix depends on the parent's world matrix, which lives in a
//! different object. [`SceneWorld`](super::SceneWorld) therefore walks the
//! ancestor chain root-first and hands each transform its parent's world
//! matrix through [`Transform::resolve_world`]. Each recompute bumps the
//! transform's generation; a child remembers the `(parent, generation)` pair
//! it was last built from, so an ancestor edit is noticed on the next read
//! without touching the descendants at write time.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::config::Propagation;
use crate::math::{Mat4, Quat, Vec3};

// ============================================================================
// Dirty Flags
// ============================================================================

/// Two-bit mask of stale caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyFlags(u8);

impl DirtyFlags {
    /// Nothing is stale.
    pub const NONE: Self = Self(0);
    /// The local matrix must be rebuilt from the pose.
    pub const LOCAL: Self = Self(1);
    /// The world matrix must be rebuilt from the parent and local matrices.
    pub const WORLD: Self = Self(1 << 1);
    /// Both caches are stale.
    pub const ALL: Self = Self(Self::LOCAL.0 | Self::WORLD.0);

    /// Returns true if every bit of `other` is set.
    #[must_use]
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the bits of `other`.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the bits of `other`.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Returns true if no bit is set.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// The parent world matrix handed to [`Transform::resolve_world`].
#[derive(Debug, Clone, Copy)]
pub struct ParentWorld {
    /// The parent object
    pub parent: Entity,
    /// The parent's current world matrix
    pub matrix: Mat4,
    /// The parent's world generation after resolving `matrix`
    pub generation: u64,
}

// ============================================================================
// Transform
// ============================================================================

/// Local pose of a scene object plus its cached local and world matrices.
///
/// | Operation          | Cost                                   |
/// |--------------------|----------------------------------------|
/// | Pose write         | O(1), marks both caches dirty          |
/// | Local read (clean) | O(1), returns cache                    |
/// | World read (clean) | O(1) per ancestor, stamp comparison    |
/// | World read (dirty) | one matrix product per stale ancestor  |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transform {
    /// Position relative to the parent
    position: Vec3,
    /// Orientation relative to the parent
    orientation: Quat,
    /// Scale relative to the parent
    scale: Vec3,

    #[serde(skip)]
    local_matrix: Mat4,
    #[serde(skip)]
    world_matrix: Mat4,
    #[serde(skip, default = "all_dirty")]
    dirty: DirtyFlags,

    /// Bumped on every world matrix recompute
    #[serde(skip)]
    generation: u64,
    /// Parent and parent generation used by the last world recompute
    #[serde(skip)]
    parent_stamp: Option<(Entity, u64)>,

    #[serde(skip)]
    local_recomputes: u64,
    #[serde(skip)]
    world_recomputes: u64,
}

fn all_dirty() -> DirtyFlags {
    DirtyFlags::ALL
}

impl Transform {
    /// Create a transform at the origin with identity orientation and unit scale.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a local position.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create from a full local pose.
    #[must_use]
    pub fn from_parts(position: Vec3, orientation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            orientation,
            scale,
            ..Default::default()
        }
    }

    // -------------------------------------------------------------------------
    // Local pose
    // -------------------------------------------------------------------------

    /// Local position.
    #[must_use]
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local orientation.
    #[must_use]
    #[inline]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Local scale.
    #[must_use]
    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the local position.
    #[inline]
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty.insert(DirtyFlags::ALL);
    }

    /// Set the local orientation.
    #[inline]
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
        self.dirty.insert(DirtyFlags::ALL);
    }

    /// Set the local scale.
    #[inline]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty.insert(DirtyFlags::ALL);
    }

    /// Move by `delta` in parent space.
    #[inline]
    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position + delta);
    }

    /// Apply `rotation` on top of the current orientation.
    #[inline]
    pub fn rotate(&mut self, rotation: Quat) {
        self.set_orientation(rotation * self.orientation);
    }

    /// Forward direction (-Z) in parent space.
    #[must_use]
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEGATIVE_UNIT_Z
    }

    /// Right direction (+X) in parent space.
    #[must_use]
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::UNIT_X
    }

    /// Up direction (+Y) in parent space.
    #[must_use]
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::UNIT_Y
    }

    // -------------------------------------------------------------------------
    // Cached matrices
    // -------------------------------------------------------------------------

    /// The local matrix `T * R * S`, rebuilt only if the pose changed.
    pub fn local_matrix(&mut self) -> Mat4 {
        if self.dirty.contains(DirtyFlags::LOCAL) {
            self.local_matrix = Mat4::transform(self.position, self.scale, self.orientation);
            self.dirty.remove(DirtyFlags::LOCAL);
            self.local_recomputes += 1;
        }
        self.local_matrix
    }

    /// The world matrix given the parent's already resolved world matrix
    /// (`None` for a root).
    ///
    /// Rebuilds when the own pose changed. Under
    /// [`Propagation::Generational`] it also rebuilds when the parent or the
    /// parent's generation differs from the last build.
    pub fn resolve_world(&mut self, parent: Option<ParentWorld>, propagation: Propagation) -> Mat4 {
        let stamp = parent.map(|p| (p.parent, p.generation));
        let stale_parent = match propagation {
            Propagation::Generational => self.parent_stamp != stamp,
            Propagation::Legacy => false,
        };

        if self.dirty.contains(DirtyFlags::WORLD) || stale_parent {
            let local = self.local_matrix();
            self.world_matrix = match parent {
                Some(p) => p.matrix * local,
                None => local,
            };
            self.dirty.remove(DirtyFlags::WORLD);
            self.generation += 1;
            self.parent_stamp = stamp;
            self.world_recomputes += 1;
        }
        self.world_matrix
    }

    // -------------------------------------------------------------------------
    // Cache state
    // -------------------------------------------------------------------------

    /// The current dirty mask.
    #[must_use]
    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Check if any cache is dirty.
    #[must_use]
    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Force the world matrix to be rebuilt on the next read.
    ///
    /// Used when the object is attached to or detached from a parent.
    #[inline]
    pub fn mark_world_dirty(&mut self) {
        self.dirty.insert(DirtyFlags::WORLD);
    }

    /// Number of world matrix recomputes so far.
    #[must_use]
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// How many times the local matrix has been rebuilt.
    #[must_use]
    #[inline]
    pub fn local_recomputes(&self) -> u64 {
        self.local_recomputes
    }

    /// How many times the world matrix has been rebuilt.
    #[must_use]
    #[inline]
    pub fn world_recomputes(&self) -> u64 {
        self.world_recomputes
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::UNIT_SCALE,
            local_matrix: Mat4::IDENTITY,
            world_matrix: Mat4::IDENTITY,
            dirty: DirtyFlags::ALL,
            generation: 0,
            parent_stamp: None,
            local_recomputes: 0,
            world_recomputes: 0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
