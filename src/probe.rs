//! Narrow boundary around OS access so every sampler stays testable
//! without a real host.

use std::fs;
use std::io;
use std::process::Command;
use sysinfo::{System, SystemExt};

/// Everything the samplers are allowed to ask the host for.
///
/// One trait covers all six families: text files (procfs/sysfs),
/// subprocess output, and the handful of OS APIs that have no file
/// representation worth parsing.
pub trait HostProbe: Send + Sync {
    fn read_file(&self, path: &str) -> io::Result<String>;
    fn command_output(&self, program: &str, args: &[&str]) -> io::Result<String>;
    fn load_average(&self) -> [f64; 3];
    fn uptime_seconds(&self) -> u64;
    fn hostname(&self) -> Option<String>;
    /// (total, free) in bytes. Coarse fallback for when /proc/meminfo
    /// is unreadable.
    fn memory_bytes(&self) -> (u64, u64);
}

/// Production probe backed by std and sysinfo.
///
/// Subprocess calls block without a timeout; a hung external tool
/// blocks the request that triggered it.
pub struct OsProbe;

impl OsProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OsProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for OsProbe {
    fn read_file(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn command_output(&self, program: &str, args: &[&str]) -> io::Result<String> {
        let output = Command::new(program).args(args).output()?;
        if !output.status.success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{program} exited with {}", output.status),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn load_average(&self) -> [f64; 3] {
        let load = System::new().load_average();
        [load.one, load.five, load.fifteen]
    }

    fn uptime_seconds(&self) -> u64 {
        System::new().uptime()
    }

    fn hostname(&self) -> Option<String> {
        System::new().host_name()
    }

    fn memory_bytes(&self) -> (u64, u64) {
        let mut system = System::new();
        system.refresh_memory();
        (system.total_memory(), system.free_memory())
    }
}

#[cfg(test)]
pub mod testing {
    use super::HostProbe;
    use std::collections::HashMap;
    use std::io;

    /// In-memory probe for failure-injection tests: any file or command
    /// not explicitly provided behaves as unavailable.
    #[derive(Default)]
    pub struct FakeProbe {
        files: HashMap<String, String>,
        commands: HashMap<String, String>,
        load: [f64; 3],
        uptime: u64,
        hostname: Option<String>,
        memory: (u64, u64),
    }

    impl FakeProbe {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(path.to_string(), content.to_string());
            self
        }

        pub fn with_command(mut self, cmdline: &str, output: &str) -> Self {
            self.commands.insert(cmdline.to_string(), output.to_string());
            self
        }

        pub fn with_load(mut self, load: [f64; 3]) -> Self {
            self.load = load;
            self
        }

        pub fn with_uptime(mut self, seconds: u64) -> Self {
            self.uptime = seconds;
            self
        }

        pub fn with_hostname(mut self, hostname: &str) -> Self {
            self.hostname = Some(hostname.to_string());
            self
        }

        pub fn with_memory(mut self, total: u64, free: u64) -> Self {
            self.memory = (total, free);
            self
        }
    }

    impl HostProbe for FakeProbe {
        fn read_file(&self, path: &str) -> io::Result<String> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
        }

        fn command_output(&self, program: &str, args: &[&str]) -> io::Result<String> {
            let mut cmdline = program.to_string();
            for arg in args {
                cmdline.push(' ');
                cmdline.push_str(arg);
            }
            self.commands
                .get(&cmdline)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, cmdline))
        }

        fn load_average(&self) -> [f64; 3] {
            self.load
        }

        fn uptime_seconds(&self) -> u64 {
            self.uptime
        }

        fn hostname(&self) -> Option<String> {
            self.hostname.clone()
        }

        fn memory_bytes(&self) -> (u64, u64) {
            self.memory
        }
    }
}
