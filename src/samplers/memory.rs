//! Memory sampling from /proc/meminfo, with a coarse sysinfo fallback.

use crate::probe::HostProbe;
use serde::Serialize;
use tracing::warn;

const PROC_MEMINFO: &str = "/proc/meminfo";

/// All figures are pre-formatted strings: GB values with two decimals,
/// the usage percentage with one. The dashboard renders them verbatim.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    pub total: String,
    pub used: String,
    pub free: String,
    pub swap_total: String,
    pub swap_used: String,
    pub usage_percent: String,
}

pub fn sample(probe: &dyn HostProbe) -> MemorySnapshot {
    match probe.read_file(PROC_MEMINFO) {
        Ok(text) => from_meminfo(&text),
        Err(err) => {
            warn!(error = %err, "cannot read {PROC_MEMINFO}, using coarse memory totals");
            from_coarse_totals(probe)
        }
    }
}

fn from_meminfo(text: &str) -> MemorySnapshot {
    let mut total_kb: u64 = 0;
    let mut available_kb: u64 = 0;
    let mut free_kb: u64 = 0;
    let mut swap_total_kb: u64 = 0;
    let mut swap_free_kb: u64 = 0;

    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }
        let value: u64 = parts[1].parse().unwrap_or(0);
        match parts[0] {
            "MemTotal:" => total_kb = value,
            "MemAvailable:" => available_kb = value,
            "MemFree:" => free_kb = value,
            "SwapTotal:" => swap_total_kb = value,
            "SwapFree:" => swap_free_kb = value,
            _ => {}
        }
    }

    let used_kb = total_kb.saturating_sub(available_kb);
    let swap_used_kb = swap_total_kb.saturating_sub(swap_free_kb);

    MemorySnapshot {
        total: format!("{:.2}", kb_to_gb(total_kb)),
        used: format!("{:.2}", kb_to_gb(used_kb)),
        free: format!("{:.2}", kb_to_gb(free_kb)),
        swap_total: format!("{:.2}", kb_to_gb(swap_total_kb)),
        swap_used: format!("{:.2}", kb_to_gb(swap_used_kb)),
        usage_percent: format_usage_percent(used_kb, total_kb),
    }
}

/// Fallback when /proc/meminfo is entirely unreadable: byte totals from
/// the OS API. Swap is not available on this path and degrades to "0".
fn from_coarse_totals(probe: &dyn HostProbe) -> MemorySnapshot {
    let (total, free) = probe.memory_bytes();
    let used = total.saturating_sub(free);

    MemorySnapshot {
        total: format!("{:.2}", bytes_to_gb(total)),
        used: format!("{:.2}", bytes_to_gb(used)),
        free: format!("{:.2}", bytes_to_gb(free)),
        swap_total: "0".to_string(),
        swap_used: "0".to_string(),
        usage_percent: format_usage_percent(used, total),
    }
}

fn format_usage_percent(used: u64, total: u64) -> String {
    let percent = if total > 0 {
        used as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    format!("{percent:.1}")
}

fn kb_to_gb(kb: u64) -> f64 {
    kb as f64 / 1024.0 / 1024.0
}

fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0 / 1024.0
}
