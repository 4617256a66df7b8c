use clap::Parser;
use std::path::PathBuf;
use std::process;

use sensord_daemon::config::DEFAULT_CONFIG_PATH;
use sensord_daemon::lifecycle::Bootstrap;
use sensord_daemon::runtime::ContainerHandoff;
use sensord_daemon::store::TcpStore;

/// Sensor-hosting daemon: discovers sensor plugins from the system path and
/// installed content packs, then hands the merged registry to the container
/// runtime. No subcommands; behavior is configuration-driven.
#[derive(Parser)]
#[command(name = "sensord")]
#[command(about = "Sensor-hosting daemon for system and pack sensors")]
#[command(version)]
struct Cli {
    /// Path to the daemon configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Run exactly one sensor from this definition file (testing mode)
    #[arg(long = "sensor-path", value_name = "FILE")]
    sensor_path: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let mut bootstrap = Bootstrap::new(TcpStore::new(), ContainerHandoff);
    match bootstrap.run(&cli.config, cli.sensor_path.as_deref()) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("sensord: {err:#}");
            process::exit(1);
        }
    }
}
