//! Per-family metric samplers and the combined snapshot.
//!
//! Each sampler is a stateless read of the current OS state through the
//! probe boundary. Families fail independently: CPU, memory,
//! temperature, and system degrade to constants or synthetic values,
//! while storage and network drop out entirely (serialized as null).

pub mod cpu;
pub mod memory;
pub mod network;
pub mod storage;
pub mod system;
pub mod temperature;

use crate::probe::HostProbe;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub cpu: cpu::CpuSnapshot,
    pub memory: memory::MemorySnapshot,
    pub storage: Option<storage::StorageSnapshot>,
    pub network: Option<network::NetworkSnapshot>,
    pub temperature: temperature::TemperatureSnapshot,
    pub system: system::SystemSnapshot,
}

/// Runs all six samplers unconditionally and stamps the result with the
/// current UTC time. Nothing is cached; every call is a fresh read.
pub fn collect_metrics(probe: &dyn HostProbe) -> MetricsSnapshot {
    MetricsSnapshot {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        cpu: cpu::sample(probe),
        memory: memory::sample(probe),
        storage: storage::sample(probe),
        network: network::sample(probe),
        temperature: temperature::sample(probe),
        system: system::sample(probe),
    }
}

/// "0.52 0.58 0.59" — three two-decimal values joined by single spaces.
pub(crate) fn format_load_average(load: [f64; 3]) -> String {
    format!("{:.2} {:.2} {:.2}", load[0], load[1], load[2])
}
