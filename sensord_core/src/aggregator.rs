//! Registry aggregation: system sensors seeded first, pack sensors merged
//! over them in scan order.
//!
//! One broken pack must never prevent other packs' sensors, or the system
//! sensors, from loading: per-source failures are logged and skipped, while
//! failures on the system path or the content root stay fatal.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::content::list_content_sources;
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::resolver::SensorModuleResolver;
use crate::sensor::{SensorOrigin, SensorRegistry};

/// Content type tag under which packs publish sensors.
pub const SENSOR_CONTENT_TYPE: &str = "sensors";

/// How a discovery pass locates sensors.
#[derive(Debug, Clone)]
pub enum DiscoveryMode {
    /// Load exactly one sensor from an explicit definition file. System and
    /// pack discovery are skipped entirely; the singleton result is the
    /// whole registry.
    Single { path: PathBuf },
    /// Normal operation: system sensors plus every installed content pack,
    /// packs overriding the system on identity collisions.
    Multi {
        system_path: PathBuf,
        content_root: PathBuf,
    },
}

/// Discovery output: the frozen registry plus the observability data logged
/// in the end-of-pass summary.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub registry: SensorRegistry,
    /// Pack sources that failed to resolve and were skipped.
    pub skipped_sources: Vec<PathBuf>,
}

impl DiscoveryReport {
    pub fn system_sensors(&self) -> usize {
        self.registry.count_by_origin(SensorOrigin::System)
    }

    pub fn pack_sensors(&self) -> usize {
        self.registry.count_by_origin(SensorOrigin::Pack)
    }
}

/// Orchestrates one discovery pass: resolution of the system path, then of
/// each content source, merged with last-writer-wins precedence.
#[derive(Debug, Default)]
pub struct SensorRegistryAggregator {
    resolver: SensorModuleResolver,
}

impl SensorRegistryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the authoritative sensor registry for this process run.
    ///
    /// The returned registry is complete with respect to every source that
    /// resolved; partial pack failures reduce completeness but never
    /// invalidate the result.
    pub fn build_registry(&self, mode: &DiscoveryMode) -> DiscoveryResult<DiscoveryReport> {
        match mode {
            DiscoveryMode::Single { path } => self.build_single(path),
            DiscoveryMode::Multi {
                system_path,
                content_root,
            } => self.build_multi(system_path, content_root),
        }
    }

    fn build_single(&self, path: &Path) -> DiscoveryResult<DiscoveryReport> {
        let sensors = self
            .resolver
            .resolve_from_file(path, SensorOrigin::SingleFile)?;
        let mut registry = SensorRegistry::new();
        registry.absorb(sensors);
        info!(
            "single-sensor mode: loaded {} from {}",
            registry.identities().join(", "),
            path.display()
        );
        Ok(DiscoveryReport {
            registry,
            skipped_sources: Vec::new(),
        })
    }

    fn build_multi(
        &self,
        system_path: &Path,
        content_root: &Path,
    ) -> DiscoveryResult<DiscoveryReport> {
        let mut registry = SensorRegistry::new();

        // System sensors seed the registry; a failure here is fatal.
        let system_path = resolve_real_path(system_path)?;
        let system = self
            .resolver
            .resolve_from_directory(&system_path, SensorOrigin::System)?;
        registry.absorb(system);

        let mut skipped_sources = Vec::new();
        for source in list_content_sources(content_root, SENSOR_CONTENT_TYPE)? {
            info!("loading sensors from {}", source.dir.display());
            // Pack-authored content is untrusted and may fail in arbitrary
            // ways; any failure kind is logged with its variant and the
            // source skipped.
            let resolved = resolve_real_path(&source.dir).and_then(|dir| {
                self.resolver
                    .resolve_from_directory(&dir, SensorOrigin::Pack)
            });
            match resolved {
                Ok(sensors) => {
                    registry.absorb(sensors);
                }
                Err(err) => {
                    warn!(
                        "failed loading sensors from {}: {err}",
                        source.dir.display()
                    );
                    skipped_sources.push(source.dir.clone());
                }
            }
        }

        info!(
            "discovery complete: {} system sensors, {} pack sensors, {} sources skipped",
            registry.count_by_origin(SensorOrigin::System),
            registry.count_by_origin(SensorOrigin::Pack),
            skipped_sources.len()
        );

        Ok(DiscoveryReport {
            registry,
            skipped_sources,
        })
    }
}

/// Directories are resolved to absolute, symlink-free paths before the
/// resolver sees them, so descriptor module paths stay stable regardless of
/// how the configuration spells the directory.
fn resolve_real_path(path: &Path) -> DiscoveryResult<PathBuf> {
    fs::canonicalize(path).map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })
}
