//! Network sampling from /proc/net/dev plus a TCP connection count.

use crate::probe::HostProbe;
use serde::Serialize;
use tracing::debug;

const PROC_NET_DEV: &str = "/proc/net/dev";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    /// Cumulative since boot, summed over all interfaces.
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub connections: u64,
}

/// Absent entirely when the interface counter table cannot be read.
/// A failed connection count alone degrades to 0, not to null.
pub fn sample(probe: &dyn HostProbe) -> Option<NetworkSnapshot> {
    let table = match probe.read_file(PROC_NET_DEV) {
        Ok(text) => text,
        Err(err) => {
            debug!(error = %err, "cannot read {PROC_NET_DEV}");
            return None;
        }
    };

    let (bytes_received, bytes_sent) = totals_from_net_dev(&table);

    let connections = match probe.command_output("ss", &["-t"]) {
        Ok(out) => count_connection_lines(&out),
        Err(err) => {
            debug!(error = %err, "connection listing unavailable");
            0
        }
    };

    Some(NetworkSnapshot {
        bytes_received,
        bytes_sent,
        connections,
    })
}

/// /proc/net/dev carries two header lines, then one line per interface:
/// the name token followed by 16 counters, rx bytes first and tx bytes
/// ninth.
fn totals_from_net_dev(table: &str) -> (u64, u64) {
    let mut rx: u64 = 0;
    let mut tx: u64 = 0;

    for line in table.lines().skip(2) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 10 {
            continue;
        }
        rx += parts[1].parse::<u64>().unwrap_or(0);
        tx += parts[9].parse::<u64>().unwrap_or(0);
    }

    (rx, tx)
}

// `ss -t` prints one header line before the connection rows.
fn count_connection_lines(output: &str) -> u64 {
    output.lines().count().saturating_sub(1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::testing::FakeProbe;

    const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:    5000      50    0    0    0     0          0         0     5000      50    0    0    0     0       0          0
  eth0: 1000000    9000    0    0    0     0          0         0   500000    7000    0    0    0     0       0          0
 wlan0:  250000    2000    0    0    0     0          0         0   125000    1000    0    0    0     0       0          0
";

    const SS: &str = "\
State   Recv-Q  Send-Q  Local Address:Port   Peer Address:Port
ESTAB   0       0       10.0.0.2:443         10.0.0.9:51234
ESTAB   0       0       10.0.0.2:22          10.0.0.7:60122
";

    #[test]
    fn sums_rx_and_tx_across_all_interfaces() {
        let (rx, tx) = totals_from_net_dev(NET_DEV);
        assert_eq!(rx, 1_255_000);
        assert_eq!(tx, 630_000);
    }

    #[test]
    fn connection_count_excludes_the_header() {
        assert_eq!(count_connection_lines(SS), 2);
        assert_eq!(count_connection_lines(""), 0);
    }

    #[test]
    fn failed_connection_listing_degrades_to_zero() {
        let probe = FakeProbe::new().with_file(PROC_NET_DEV, NET_DEV);
        let snapshot = sample(&probe).expect("counters readable");
        assert_eq!(snapshot.bytes_received, 1_255_000);
        assert_eq!(snapshot.connections, 0);
    }

    #[test]
    fn unreadable_counter_table_yields_no_snapshot() {
        let probe = FakeProbe::new().with_command("ss -t", SS);
        assert!(sample(&probe).is_none());
    }
}
