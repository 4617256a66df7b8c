//! Sensor data model and the merged registry handed to the container
//! runtime.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Key uniquely naming a sensor in the merged registry.
///
/// Derived deterministically as `<module file stem>.<class name>` so that
/// two discovery passes over unchanged input produce identical keys.
pub type SensorIdentity = String;

/// Where a descriptor was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorOrigin {
    /// Shipped with the daemon installation.
    System,
    /// Contributed by an installed content pack.
    Pack,
    /// Loaded from an explicit definition path (single-sensor test mode).
    SingleFile,
}

/// Immutable description of one discoverable sensor.
///
/// Built once by the resolver; owned by the registry until the container
/// runtime takes a read-only view. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDescriptor {
    pub identity: SensorIdentity,

    /// Absolute path of the module file implementing the sensor.
    pub module_path: PathBuf,

    /// Entry-point class inside the module.
    pub class_name: String,

    /// Content directory the definition was found in.
    pub source_dir: PathBuf,

    pub origin: SensorOrigin,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Poll cadence in seconds, if the sensor declared one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,
}

/// Merged mapping from identity to descriptor, the final output of
/// discovery.
///
/// Merging is ordered with a last-writer-wins contract: on an identity
/// collision the incoming descriptor replaces the existing one, so callers
/// control precedence purely through merge order.
#[derive(Debug, Clone, Default)]
pub struct SensorRegistry {
    sensors: HashMap<SensorIdentity, SensorDescriptor>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one descriptor, replacing any previous holder of the same
    /// identity. Returns the evicted descriptor when an override happened.
    pub fn insert(&mut self, descriptor: SensorDescriptor) -> Option<SensorDescriptor> {
        self.sensors.insert(descriptor.identity.clone(), descriptor)
    }

    /// Ordered merge: every entry of `incoming` lands in the registry, and
    /// on a collision the incoming descriptor wins. Returns how many
    /// existing entries were overridden.
    pub fn absorb(&mut self, incoming: HashMap<SensorIdentity, SensorDescriptor>) -> usize {
        let mut overridden = 0;
        for (_, descriptor) in incoming {
            if self.insert(descriptor).is_some() {
                overridden += 1;
            }
        }
        overridden
    }

    pub fn get(&self, identity: &str) -> Option<&SensorDescriptor> {
        self.sensors.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.sensors.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SensorIdentity, &SensorDescriptor)> {
        self.sensors.iter()
    }

    /// All identities in sorted order, for stable logs and assertions.
    pub fn identities(&self) -> Vec<SensorIdentity> {
        let mut ids: Vec<_> = self.sensors.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn count_by_origin(&self, origin: SensorOrigin) -> usize {
        self.sensors.values().filter(|d| d.origin == origin).count()
    }
}
