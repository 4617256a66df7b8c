//! Handoff boundary to the sensor container runtime.

use anyhow::Result;
use sensord_core::SensorRegistry;
use tracing::info;

/// Sole consumer of the discovery output. Implementations run every sensor
/// in the registry concurrently and report the process exit code once they
/// stop. The registry view is read-only; it is never mutated after handoff.
pub trait SensorRuntime {
    fn run_sensors(&mut self, registry: &SensorRegistry) -> Result<i32>;
}

/// Stand-in runtime used by the binary: logs the registry it was handed and
/// exits cleanly. Sensor execution lives outside this crate.
#[derive(Debug, Default)]
pub struct ContainerHandoff;

impl SensorRuntime for ContainerHandoff {
    fn run_sensors(&mut self, registry: &SensorRegistry) -> Result<i32> {
        info!("container received {} sensors", registry.len());
        for identity in registry.identities() {
            info!("  {identity}");
        }
        Ok(0)
    }
}
