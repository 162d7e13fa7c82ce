//! Storage sampling from `df` in human-readable and inode modes.
//!
//! Aggregate totals cover the root filesystem only; the per-filesystem
//! list passes the first three `df` rows through verbatim.

use crate::probe::HostProbe;
use serde::Serialize;
use tracing::debug;

const DF_ARGS: [&str; 2] = ["-h", "--output=source,size,used,avail,pcent,target"];
const DF_INODE_ARGS: [&str; 2] = ["-i", "--output=source,itotal,iused,iavail,ipcent,target"];

/// How many filesystems the dashboard shows.
const FILESYSTEM_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct FilesystemEntry {
    pub source: String,
    pub size: String,
    pub used: String,
    pub avail: String,
    pub percent: String,
    pub mount: String,
}

/// Root-filesystem totals are integer GB strings; memory totals keep
/// two decimals. The asymmetry is what the dashboard was built against.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSnapshot {
    pub total: String,
    pub used: String,
    pub free: String,
    pub usage_percent: String,
    pub inode_percent: String,
    pub filesystems: Vec<FilesystemEntry>,
}

/// All-or-nothing: if the primary `df` report cannot be produced the
/// whole family is absent, never a partial object.
pub fn sample(probe: &dyn HostProbe) -> Option<StorageSnapshot> {
    let report = match probe.command_output("df", &DF_ARGS) {
        Ok(out) => out,
        Err(err) => {
            debug!(error = %err, "df report unavailable");
            return None;
        }
    };

    let mut filesystems = parse_df_report(&report);

    let root = filesystems.iter().find(|fs| fs.mount == "/");
    let (total, used, free, usage_percent) = match root {
        Some(root) => (
            parse_size(&root.size),
            parse_size(&root.used),
            parse_size(&root.avail),
            leading_int(&root.percent),
        ),
        None => (0.0, 0.0, 0.0, 0),
    };

    let inode_percent = match probe.command_output("df", &DF_INODE_ARGS) {
        Ok(out) => inode_percent_from_report(&out),
        Err(err) => {
            debug!(error = %err, "inode report unavailable");
            "0".to_string()
        }
    };

    filesystems.truncate(FILESYSTEM_LIMIT);

    Some(StorageSnapshot {
        total: format!("{total:.0}"),
        used: format!("{used:.0}"),
        free: format!("{free:.0}"),
        usage_percent: usage_percent.to_string(),
        inode_percent,
        filesystems,
    })
}

fn parse_df_report(report: &str) -> Vec<FilesystemEntry> {
    report
        .lines()
        .skip(1) // header
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 6 {
                return None;
            }
            Some(FilesystemEntry {
                source: parts[0].to_string(),
                size: parts[1].to_string(),
                used: parts[2].to_string(),
                avail: parts[3].to_string(),
                percent: parts[4].to_string(),
                mount: parts[5].to_string(),
            })
        })
        .collect()
}

fn inode_percent_from_report(report: &str) -> String {
    report
        .lines()
        .skip(1)
        .find(|line| line.contains('/'))
        .and_then(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            (parts.len() >= 5).then(|| parts[4].to_string())
        })
        .unwrap_or_else(|| "0".to_string())
}

/// Converts a `df -h` size like "512M" or "2G" into GB. A bare number
/// is taken as GB already; anything unparseable is 0.
pub fn parse_size(raw: &str) -> f64 {
    let raw = raw.trim();
    let (number, factor) = if let Some(n) = raw.strip_suffix('K') {
        (n, 1.0 / (1024.0 * 1024.0))
    } else if let Some(n) = raw.strip_suffix('M') {
        (n, 1.0 / 1024.0)
    } else if let Some(n) = raw.strip_suffix('G') {
        (n, 1.0)
    } else if let Some(n) = raw.strip_suffix('T') {
        (n, 1024.0)
    } else {
        (raw, 1.0)
    };

    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return 0.0;
    }
    number.parse::<f64>().map(|v| v * factor).unwrap_or(0.0)
}

fn leading_int(raw: &str) -> i64 {
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::testing::FakeProbe;

    const DF: &str = "\
Filesystem      Size  Used Avail Use% Mounted on
/dev/sda2       100G   34G   66G  34% /
/dev/sda1       512M  100M  412M  20% /boot
tmpfs            16G     0   16G   0% /dev/shm
/dev/sdb1         1T  200G  824G  20% /data
";

    const DF_INODES: &str = "\
Filesystem      Inodes  IUsed   IFree IUse% Mounted on
/dev/sda2      6553600 655360 5898240   10% /
";

    fn probe_with_df() -> FakeProbe {
        FakeProbe::new()
            .with_command("df -h --output=source,size,used,avail,pcent,target", DF)
            .with_command(
                "df -i --output=source,itotal,iused,iavail,ipcent,target",
                DF_INODES,
            )
    }

    #[test]
    fn size_table_matches_df_suffixes() {
        assert_eq!(parse_size("512M"), 0.5);
        assert_eq!(parse_size("2G"), 2.0);
        assert_eq!(parse_size("1T"), 1024.0);
        assert_eq!(parse_size("100"), 100.0);
        assert_eq!(parse_size(""), 0.0);
        assert_eq!(parse_size("abcG"), 0.0);
        assert_eq!(parse_size("1024K"), 1.0 / 1024.0);
    }

    #[test]
    fn totals_come_from_the_root_mount() {
        let snapshot = sample(&probe_with_df()).expect("df available");
        assert_eq!(snapshot.total, "100");
        assert_eq!(snapshot.used, "34");
        assert_eq!(snapshot.free, "66");
        assert_eq!(snapshot.usage_percent, "34");
        assert_eq!(snapshot.inode_percent, "10%");
    }

    #[test]
    fn filesystem_list_keeps_first_three_rows_verbatim() {
        let snapshot = sample(&probe_with_df()).expect("df available");
        assert_eq!(snapshot.filesystems.len(), 3);
        assert_eq!(snapshot.filesystems[0].source, "/dev/sda2");
        assert_eq!(snapshot.filesystems[1].size, "512M");
        assert_eq!(snapshot.filesystems[1].percent, "20%");
    }

    #[test]
    fn missing_root_mount_zeroes_totals_but_keeps_filesystems() {
        let report = "Filesystem Size Used Avail Use% Mounted on\n\
                      /dev/sdb1 1T 200G 824G 20% /data\n";
        let probe = FakeProbe::new()
            .with_command("df -h --output=source,size,used,avail,pcent,target", report);
        let snapshot = sample(&probe).expect("df available");
        assert_eq!(snapshot.total, "0");
        assert_eq!(snapshot.used, "0");
        assert_eq!(snapshot.free, "0");
        assert_eq!(snapshot.usage_percent, "0");
        assert_eq!(snapshot.inode_percent, "0");
        assert_eq!(snapshot.filesystems.len(), 1);
    }

    #[test]
    fn unavailable_df_yields_no_snapshot_at_all() {
        assert!(sample(&FakeProbe::new()).is_none());
    }
}
