//! Scene configuration

use serde::{Deserialize, Serialize};

/// How a change to an ancestor's pose reaches its descendants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Propagation {
    /// Each transform remembers the generation of the parent world matrix it
    /// was built from and rebuilds when the parent has moved on. Moving an
    /// ancestor is always visible to every descendant.
    #[default]
    Generational,
    /// Only a node's own dirty flag triggers a rebuild. Once a descendant has
    /// cached its world matrix, later edits to an ancestor are not picked up
    /// until the descendant itself is edited.
    Legacy,
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Scene name, used in logs and snapshots
    pub name: String,
    /// Ancestor change propagation mode
    pub propagation: Propagation,
    /// Number of objects to reserve room for up front
    pub capacity: u32,
    /// Log every parent/child relinking at `debug` level
    pub log_hierarchy: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: String::from("Scene"),
            propagation: Propagation::Generational,
            capacity: 0,
            log_hierarchy: true,
        }
    }
}

impl SceneConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scene name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the propagation mode
    #[must_use]
    pub fn with_propagation(mut self, propagation: Propagation) -> Self {
        self.propagation = propagation;
        self
    }

    /// Reserve room for `capacity` objects
    #[must_use]
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enable or disable hierarchy logging
    #[must_use]
    pub fn with_log_hierarchy(mut self, enabled: bool) -> Self {
        self.log_hierarchy = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SceneConfig::default();
        assert_eq!(config.name, "Scene");
        assert_eq!(config.propagation, Propagation::Generational);
        assert_eq!(config.capacity, 0);
    }

    #[test]
    fn test_builder() {
        let config = SceneConfig::new()
            .with_name("Level 1")
            .with_propagation(Propagation::Legacy)
            .with_capacity(64)
            .with_log_hierarchy(false);

        assert_eq!(config.name, "Level 1");
        assert_eq!(config.propagation, Propagation::Legacy);
        assert_eq!(config.capacity, 64);
        assert!(!config.log_hierarchy);
    }
}
