//! CPU sampling from /proc/stat and /proc/cpuinfo.

use crate::probe::HostProbe;
use crate::samplers::format_load_average;
use serde::Serialize;
use tracing::debug;

const PROC_STAT: &str = "/proc/stat";
const PROC_CPUINFO: &str = "/proc/cpuinfo";

/// Used when no MHz field can be read from cpuinfo.
const FALLBACK_SPEED_GHZ: f64 = 2.5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuSnapshot {
    /// Busy percentage derived from cumulative tick counters, i.e. the
    /// average since boot rather than an instantaneous reading. Kept
    /// that way on purpose to match the dashboard's expectations.
    pub usage: f64,
    pub cores: usize,
    pub speed: f64,
    pub load_avg: String,
}

pub fn sample(probe: &dyn HostProbe) -> CpuSnapshot {
    let (usage, cores) = match probe.read_file(PROC_STAT) {
        Ok(text) => usage_from_proc_stat(&text),
        Err(err) => {
            debug!(error = %err, "cannot read {PROC_STAT}");
            (0.0, 0)
        }
    };

    let speed = match probe.read_file(PROC_CPUINFO) {
        Ok(text) => speed_ghz_from_cpuinfo(&text).unwrap_or(FALLBACK_SPEED_GHZ),
        Err(err) => {
            debug!(error = %err, "cannot read {PROC_CPUINFO}");
            FALLBACK_SPEED_GHZ
        }
    };

    CpuSnapshot {
        usage,
        cores,
        speed,
        load_avg: format_load_average(probe.load_average()),
    }
}

/// Sums every tick category of each `cpuN` line into a grand total and
/// takes the idle column (4th field) as the idle total. Returns the
/// busy ratio as a percentage and the number of cores enumerated.
fn usage_from_proc_stat(text: &str) -> (f64, usize) {
    let mut total_tick: u64 = 0;
    let mut total_idle: u64 = 0;
    let mut cores = 0usize;

    for line in text.lines() {
        if !is_per_core_line(line) {
            continue;
        }
        cores += 1;
        let ticks: Vec<u64> = line
            .split_whitespace()
            .skip(1)
            .filter_map(|v| v.parse().ok())
            .collect();
        total_tick += ticks.iter().sum::<u64>();
        total_idle += ticks.get(3).copied().unwrap_or(0);
    }

    let usage = if total_tick > 0 {
        (total_tick - total_idle) as f64 / total_tick as f64 * 100.0
    } else {
        0.0
    };

    (usage, cores)
}

// "cpu0 ..." counts, the aggregate "cpu ..." line does not.
fn is_per_core_line(line: &str) -> bool {
    line.starts_with("cpu")
        && line
            .as_bytes()
            .get(3)
            .is_some_and(|b| b.is_ascii_digit())
}

fn speed_ghz_from_cpuinfo(text: &str) -> Option<f64> {
    for line in text.lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim() != "cpu MHz" {
            continue;
        }
        let mhz: f64 = value.trim().parse().ok()?;
        return Some((mhz / 1000.0 * 10.0).round() / 10.0);
    }
    None
}
