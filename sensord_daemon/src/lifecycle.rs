//! Bootstrap lifecycle: an explicit, forward-only state machine from
//! configuration load to container handoff to store teardown.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use sensord_core::{DiscoveryMode, SensorRegistryAggregator};

use crate::config::SensordConfig;
use crate::logging;
use crate::runtime::SensorRuntime;
use crate::store::Store;

/// Exit code returned when the single-sensor override points at a
/// nonexistent file.
pub const EXIT_SENSOR_PATH_MISSING: i32 = 1;

/// Bootstrap phases, in order. Transitions are strictly sequential and
/// forward-only; there are no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Init,
    Configured,
    Logged,
    StoreConnected,
    PathsReady,
    RegistryBuilt,
    Running,
    StoreDisconnected,
}

impl Phase {
    /// Successor in the bootstrap sequence; `None` for the terminal phase.
    pub fn next(self) -> Option<Phase> {
        use Phase::*;
        Some(match self {
            Init => Configured,
            Configured => Logged,
            Logged => StoreConnected,
            StoreConnected => PathsReady,
            PathsReady => RegistryBuilt,
            RegistryBuilt => Running,
            Running => StoreDisconnected,
            StoreDisconnected => return None,
        })
    }
}

/// Drives the bootstrap sequence against the store and runtime
/// collaborators it owns.
pub struct Bootstrap<S, R> {
    phase: Phase,
    store: S,
    runtime: R,
}

impl<S: Store, R: SensorRuntime> Bootstrap<S, R> {
    pub fn new(store: S, runtime: R) -> Self {
        Self {
            phase: Phase::Init,
            store,
            runtime,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn advance(&mut self, next: Phase) -> Result<()> {
        if self.phase.next() != Some(next) {
            bail!("illegal lifecycle transition {:?} -> {next:?}", self.phase);
        }
        debug!("lifecycle {:?} -> {next:?}", self.phase);
        self.phase = next;
        Ok(())
    }

    /// Run the full bootstrap sequence and return the exit code reported by
    /// the container runtime.
    ///
    /// The store is disconnected after the runtime returns, whether it
    /// reports an exit code or an error. A panic inside the runtime unwinds
    /// past teardown and leaves the connection to the OS; see DESIGN.md for
    /// why no drop guard is used. Failures before the runtime starts are
    /// fatal and propagate immediately, except for a missing single-sensor
    /// override file, which resolves to [`EXIT_SENSOR_PATH_MISSING`] before
    /// any directory resolution runs.
    pub fn run(&mut self, config_path: &Path, sensor_path: Option<&Path>) -> Result<i32> {
        let config = SensordConfig::load(config_path)?;
        self.advance(Phase::Configured)?;

        logging::init(&config.logging)?;
        self.advance(Phase::Logged)?;

        self.store
            .connect(&config.store.name, &config.store.host, config.store.port)?;
        self.advance(Phase::StoreConnected)?;

        fs::create_dir_all(&config.sensors.modules_path).with_context(|| {
            format!(
                "cannot create sensor modules directory {}",
                config.sensors.modules_path.display()
            )
        })?;
        self.advance(Phase::PathsReady)?;

        let mode = match sensor_path {
            Some(path) => {
                info!("running in sensor testing mode");
                if !path.exists() {
                    error!("unable to find sensor file {}", path.display());
                    return Ok(EXIT_SENSOR_PATH_MISSING);
                }
                DiscoveryMode::Single {
                    path: path.to_path_buf(),
                }
            }
            None => DiscoveryMode::Multi {
                system_path: config.sensors.system_path.clone(),
                content_root: config.content.pack_root.clone(),
            },
        };
        let report = SensorRegistryAggregator::new().build_registry(&mode)?;
        self.advance(Phase::RegistryBuilt)?;

        self.advance(Phase::Running)?;
        let exit_code = self.runtime.run_sensors(&report.registry);

        self.store.disconnect()?;
        self.advance(Phase::StoreDisconnected)?;

        exit_code
    }
}
