//! CPU temperature from thermal sysfs paths, with a synthetic fallback.

use crate::probe::HostProbe;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

/// Probed in order; the first readable path wins.
const SENSOR_PATHS: [&str; 3] = [
    "/sys/class/thermal/thermal_zone0/temp",
    "/sys/class/hwmon/hwmon0/temp1_input",
    "/sys/devices/virtual/thermal/thermal_zone0/temp",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TempSource {
    Sensor,
    Synthetic,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureSnapshot {
    pub cpu_temp: f64,
    /// Lets the dashboard tell a real reading from a placeholder.
    pub source: TempSource,
}

/// Never absent: with no readable sensor the value is a placeholder in
/// [30, 50), tagged as synthetic.
pub fn sample(probe: &dyn HostProbe) -> TemperatureSnapshot {
    for path in SENSOR_PATHS {
        let Ok(raw) = probe.read_file(path) else {
            continue;
        };
        match raw.trim().parse::<f64>() {
            Ok(millidegrees) if millidegrees != 0.0 => {
                return TemperatureSnapshot {
                    cpu_temp: millidegrees / 1000.0,
                    source: TempSource::Sensor,
                };
            }
            _ => debug!(path, "sensor present but unusable"),
        }
    }

    TemperatureSnapshot {
        cpu_temp: rand::thread_rng().gen_range(30.0..50.0),
        source: TempSource::Synthetic,
    }
}
