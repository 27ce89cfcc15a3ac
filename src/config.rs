//! Generation configuration

use serde::{Deserialize, Serialize};

/// Bounds applied to one generation session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Smallest number of elements generated for containers
    pub min_collection_size: usize,
    /// Largest number of elements generated for containers
    pub max_collection_size: usize,
    /// How deep nested object population may recurse; beyond this, nested
    /// objects are left as Null
    pub max_nesting_depth: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            min_collection_size: 1,
            max_collection_size: 10,
            max_nesting_depth: 5,
        }
    }
}

impl Configuration {
    pub fn new(
        min_collection_size: usize,
        max_collection_size: usize,
        max_nesting_depth: usize,
    ) -> Self {
        Self {
            min_collection_size,
            max_collection_size,
            max_nesting_depth,
        }
    }

    pub fn with_collection_sizes(mut self, min: usize, max: usize) -> Self {
        self.min_collection_size = min;
        self.max_collection_size = max.max(min);
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_bounded() {
        let config = Configuration::default();
        assert!(config.min_collection_size <= config.max_collection_size);
        assert!(config.max_nesting_depth > 0);
    }

    #[test]
    fn collection_sizes_never_invert() {
        let config = Configuration::default().with_collection_sizes(5, 2);
        assert_eq!(config.min_collection_size, 5);
        assert_eq!(config.max_collection_size, 5);
    }

    #[test]
    fn round_trips_through_serde() {
        let config = Configuration::new(2, 2, 3);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<Configuration>(&json).unwrap(), config);
    }
}
