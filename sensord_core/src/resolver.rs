//! Sensor module resolution: definition files to descriptors.
//!
//! A sensor is declared by a `*.sensor.yaml` metadata file sitting next to
//! its entry-point module. Resolution is a pure metadata pass: definitions
//! are parsed and module paths resolved, but no sensor code ever runs.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::sensor::{SensorDescriptor, SensorIdentity, SensorOrigin};

/// Suffix marking a sensor definition file.
pub const DEFINITION_SUFFIX: &str = ".sensor.yaml";

/// On-disk sensor definition metadata.
#[derive(Debug, Deserialize)]
struct SensorDefinition {
    /// Entry-point class inside the module.
    class_name: String,
    /// Module file path, relative to the definition file.
    entry_point: PathBuf,
    #[serde(default)]
    description: Option<String>,
    /// Poll cadence in seconds.
    #[serde(default)]
    poll_interval: Option<u64>,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Resolves sensor definitions into descriptors, in one of two modes:
/// a single explicit file ([`resolve_from_file`]) or a directory scan
/// ([`resolve_from_directory`]).
///
/// [`resolve_from_file`]: SensorModuleResolver::resolve_from_file
/// [`resolve_from_directory`]: SensorModuleResolver::resolve_from_directory
#[derive(Debug, Default)]
pub struct SensorModuleResolver;

impl SensorModuleResolver {
    pub fn new() -> Self {
        Self
    }

    /// Single-sensor test mode: load exactly one definition and return a
    /// singleton mapping. An explicitly requested sensor is loaded even if
    /// its definition is marked disabled.
    pub fn resolve_from_file(
        &self,
        path: &Path,
        origin: SensorOrigin,
    ) -> DiscoveryResult<HashMap<SensorIdentity, SensorDescriptor>> {
        if !path.exists() {
            return Err(DiscoveryError::DefinitionNotFound(path.to_path_buf()));
        }
        let definition = parse_definition(path)?;
        let descriptor = build_descriptor(path, &definition, origin)?;
        Ok(HashMap::from([(descriptor.identity.clone(), descriptor)]))
    }

    /// Directory-scan mode: one descriptor per definition found under
    /// `base_dir`, in sorted file order. A directory with zero sensors
    /// yields an empty mapping, not an error; a malformed definition fails
    /// the whole directory.
    pub fn resolve_from_directory(
        &self,
        base_dir: &Path,
        origin: SensorOrigin,
    ) -> DiscoveryResult<HashMap<SensorIdentity, SensorDescriptor>> {
        let mut sensors = HashMap::new();
        for entry in WalkDir::new(base_dir).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| base_dir.to_path_buf());
                    return Err(DiscoveryError::Io {
                        path,
                        source: err.into(),
                    });
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if !entry.file_name().to_string_lossy().ends_with(DEFINITION_SUFFIX) {
                continue;
            }

            let path = entry.path();
            let definition = parse_definition(path)?;
            if !definition.enabled {
                debug!("skipping disabled sensor definition {}", path.display());
                continue;
            }
            let descriptor = build_descriptor(path, &definition, origin)?;
            sensors.insert(descriptor.identity.clone(), descriptor);
        }
        Ok(sensors)
    }
}

fn parse_definition(path: &Path) -> DiscoveryResult<SensorDefinition> {
    let raw = fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| DiscoveryError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}

fn build_descriptor(
    definition_path: &Path,
    definition: &SensorDefinition,
    origin: SensorOrigin,
) -> DiscoveryResult<SensorDescriptor> {
    let source_dir = definition_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let module_path = source_dir.join(&definition.entry_point);
    if !module_path.exists() {
        return Err(DiscoveryError::ModuleMissing {
            definition: definition_path.to_path_buf(),
            module: module_path,
        });
    }
    let module_path = fs::canonicalize(&module_path).map_err(|source| DiscoveryError::Io {
        path: module_path,
        source,
    })?;

    Ok(SensorDescriptor {
        identity: derive_identity(&module_path, &definition.class_name),
        module_path,
        class_name: definition.class_name.clone(),
        source_dir,
        origin,
        description: definition.description.clone(),
        poll_interval: definition.poll_interval,
    })
}

/// `<module file stem>.<class name>`, deterministic for unchanged input.
fn derive_identity(module_path: &Path, class_name: &str) -> SensorIdentity {
    let stem = module_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}.{class_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_sensor(dir: &Path, module: &str, class_name: &str, extra: &str) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(format!("{module}.so")), b"\x7fELF").unwrap();
        let definition = dir.join(format!("{module}.sensor.yaml"));
        fs::write(
            &definition,
            format!("class_name: {class_name}\nentry_point: {module}.so\n{extra}"),
        )
        .unwrap();
        definition
    }

    #[test]
    fn file_mode_returns_singleton_mapping() {
        let dir = TempDir::new().unwrap();
        let definition = write_sensor(dir.path(), "dir_watch", "DirWatch", "poll_interval: 5\n");

        let resolver = SensorModuleResolver::new();
        let sensors = resolver
            .resolve_from_file(&definition, SensorOrigin::SingleFile)
            .unwrap();

        assert_eq!(sensors.len(), 1);
        let descriptor = &sensors["dir_watch.DirWatch"];
        assert_eq!(descriptor.class_name, "DirWatch");
        assert_eq!(descriptor.origin, SensorOrigin::SingleFile);
        assert_eq!(descriptor.poll_interval, Some(5));
        assert!(descriptor.module_path.is_absolute());
    }

    #[test]
    fn file_mode_missing_path_is_not_found() {
        let dir = TempDir::new().unwrap();
        let resolver = SensorModuleResolver::new();
        let err = resolver
            .resolve_from_file(&dir.path().join("ghost.sensor.yaml"), SensorOrigin::SingleFile)
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::DefinitionNotFound(_)));
    }

    #[test]
    fn directory_mode_finds_all_definitions() {
        let dir = TempDir::new().unwrap();
        write_sensor(dir.path(), "alpha", "Alpha", "");
        write_sensor(dir.path(), "beta", "Beta", "description: watches beta\n");

        let resolver = SensorModuleResolver::new();
        let sensors = resolver
            .resolve_from_directory(dir.path(), SensorOrigin::System)
            .unwrap();

        assert_eq!(sensors.len(), 2);
        assert!(sensors.contains_key("alpha.Alpha"));
        assert_eq!(
            sensors["beta.Beta"].description.as_deref(),
            Some("watches beta")
        );
    }

    #[test]
    fn directory_mode_empty_directory_is_empty_mapping() {
        let dir = TempDir::new().unwrap();
        let resolver = SensorModuleResolver::new();
        let sensors = resolver
            .resolve_from_directory(dir.path(), SensorOrigin::System)
            .unwrap();
        assert!(sensors.is_empty());
    }

    #[test]
    fn directory_mode_ignores_unrelated_files() {
        let dir = TempDir::new().unwrap();
        write_sensor(dir.path(), "alpha", "Alpha", "");
        fs::write(dir.path().join("notes.yaml"), "not: a sensor").unwrap();

        let resolver = SensorModuleResolver::new();
        let sensors = resolver
            .resolve_from_directory(dir.path(), SensorOrigin::System)
            .unwrap();
        assert_eq!(sensors.len(), 1);
    }

    #[test]
    fn malformed_definition_fails_the_directory() {
        let dir = TempDir::new().unwrap();
        write_sensor(dir.path(), "alpha", "Alpha", "");
        fs::write(dir.path().join("broken.sensor.yaml"), ": not yaml [").unwrap();

        let resolver = SensorModuleResolver::new();
        let err = resolver
            .resolve_from_directory(dir.path(), SensorOrigin::Pack)
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Metadata { .. }));
    }

    #[test]
    fn missing_entry_point_module_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("orphan.sensor.yaml"),
            "class_name: Orphan\nentry_point: orphan.so\n",
        )
        .unwrap();

        let resolver = SensorModuleResolver::new();
        let err = resolver
            .resolve_from_directory(dir.path(), SensorOrigin::Pack)
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::ModuleMissing { .. }));
    }

    #[test]
    fn disabled_definitions_are_skipped_in_directory_mode() {
        let dir = TempDir::new().unwrap();
        write_sensor(dir.path(), "alpha", "Alpha", "");
        write_sensor(dir.path(), "muted", "Muted", "enabled: false\n");

        let resolver = SensorModuleResolver::new();
        let sensors = resolver
            .resolve_from_directory(dir.path(), SensorOrigin::System)
            .unwrap();
        assert_eq!(sensors.len(), 1);
        assert!(!sensors.contains_key("muted.Muted"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let dir = TempDir::new().unwrap();
        write_sensor(dir.path(), "alpha", "Alpha", "poll_interval: 30\n");
        write_sensor(dir.path(), "beta", "Beta", "");

        let resolver = SensorModuleResolver::new();
        let first = resolver
            .resolve_from_directory(dir.path(), SensorOrigin::System)
            .unwrap();
        let second = resolver
            .resolve_from_directory(dir.path(), SensorOrigin::System)
            .unwrap();

        assert_eq!(first, second);
    }
}
