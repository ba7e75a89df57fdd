//! Memory pressure sampling.
//!
//! The engine samples memory every few expansions and evicts part of the
//! open set once usage crosses the configured threshold. Probes report a
//! usage fraction in `[0, 1]`.

/// Sizes of the engine's growing containers at sampling time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub open: usize,
    pub known: usize,
}

/// Source of memory usage samples.
pub trait MemoryProbe {
    /// Current usage as a fraction of the maximum available.
    fn usage(&mut self, stats: &MemoryStats) -> f64;
}

/// Resident memory of this process as a fraction of the memory it may use.
///
/// Reads `VmRSS` from `/proc/self/status` and divides it by `MemTotal`, or
/// by the cgroup v2 `memory.max` limit when that is lower. Other processes
/// on the host do not count. On platforms without procfs, or if a file
/// cannot be read, usage is reported as 0 (eviction never fires) and a
/// warning is logged once.
#[derive(Debug, Default)]
pub struct ProcessMemory {
    warned: bool,
}

impl ProcessMemory {
    /// Creates a probe that has not warned yet.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(target_os = "linux")]
    fn read() -> Option<f64> {
        let status = std::fs::read_to_string("/proc/self/status").ok()?;
        let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
        let rss_kb = parse_status_rss(&status)?;
        let mut limit_kb = parse_mem_total(&meminfo)?;
        if let Some(cgroup_kb) = std::fs::read_to_string("/sys/fs/cgroup/memory.max")
            .ok()
            .and_then(|limit| parse_cgroup_limit(&limit))
        {
            limit_kb = limit_kb.min(cgroup_kb);
        }
        usage_fraction(rss_kb, limit_kb)
    }

    #[cfg(not(target_os = "linux"))]
    fn read() -> Option<f64> {
        None
    }
}

impl MemoryProbe for ProcessMemory {
    fn usage(&mut self, _stats: &MemoryStats) -> f64 {
        match Self::read() {
            Some(usage) => usage,
            None => {
                if !self.warned {
                    tracing::warn!("process memory information unavailable; open-set eviction disabled");
                    self.warned = true;
                }
                0.0
            }
        }
    }
}

/// Value in kB of a `Name:   123 kB` line.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn kb_field(text: &str, name: &str) -> Option<u64> {
    text.lines()
        .find(|line| line.starts_with(name))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}

/// Resident set size from a `/proc/<pid>/status` body.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_status_rss(status: &str) -> Option<u64> {
    kb_field(status, "VmRSS:")
}

/// `MemTotal` from a `/proc/meminfo` body; `None` when missing or zero.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_mem_total(meminfo: &str) -> Option<u64> {
    kb_field(meminfo, "MemTotal:").filter(|&kb| kb > 0)
}

/// Limit in kB from a cgroup v2 `memory.max` body; `None` for `max`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_cgroup_limit(limit: &str) -> Option<u64> {
    limit
        .trim()
        .parse::<u64>()
        .ok()
        .map(|bytes| bytes / 1024)
        .filter(|&kb| kb > 0)
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn usage_fraction(used_kb: u64, limit_kb: u64) -> Option<f64> {
    if limit_kb == 0 {
        return None;
    }
    Some((used_kb as f64 / limit_kb as f64).min(1.0))
}

/// Treats `max_states` stored states (open plus known identities) as full.
///
/// Deterministic, which makes it the probe of choice for tests and for
/// bounding a run on a shared machine.
#[derive(Debug, Clone, Copy)]
pub struct StateBudget {
    pub max_states: usize,
}

impl StateBudget {
    /// Creates a budget of `max_states` stored states.
    pub fn new(max_states: usize) -> Self {
        Self { max_states }
    }
}

impl MemoryProbe for StateBudget {
    fn usage(&mut self, stats: &MemoryStats) -> f64 {
        if self.max_states == 0 {
            return 1.0;
        }
        (stats.open + stats.known) as f64 / self.max_states as f64
    }
}
