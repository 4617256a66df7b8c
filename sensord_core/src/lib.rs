//! # sensord core
//!
//! Discovery and aggregation layer for the sensord sensor-hosting daemon.
//!
//! Sensors are pluggable watchers contributed either by the system
//! installation or by installed content packs. This crate locates them,
//! describes them, and merges them into a single authoritative registry:
//!
//! - **Content scanning**: find the per-pack directories that contribute
//!   sensors ([`content::list_content_sources`])
//! - **Resolution**: turn sensor definition files into typed descriptors
//!   without executing any sensor code ([`resolver::SensorModuleResolver`])
//! - **Aggregation**: merge system and pack sensors with last-writer-wins
//!   precedence and per-source failure isolation
//!   ([`aggregator::SensorRegistryAggregator`])
//!
//! Discovery runs once per process, synchronously, before any sensor
//! executes. The resulting [`sensor::SensorRegistry`] is frozen and handed
//! read-only to the container runtime.

pub mod aggregator;
pub mod content;
pub mod error;
pub mod resolver;
pub mod sensor;

pub use aggregator::{DiscoveryMode, DiscoveryReport, SensorRegistryAggregator, SENSOR_CONTENT_TYPE};
pub use content::{list_content_sources, ContentSource};
pub use error::{DiscoveryError, DiscoveryResult};
pub use resolver::SensorModuleResolver;
pub use sensor::{SensorDescriptor, SensorIdentity, SensorOrigin, SensorRegistry};
