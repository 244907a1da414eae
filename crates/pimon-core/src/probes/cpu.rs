//! CPU probe — utilization percentages, core frequency, load average.
//!
//! Utilization derives from the aggregate `cpu` line of `/proc/stat`, diffed
//! against the previous invocation's snapshot. The first invocation reports
//! the since-boot ratio. This interior snapshot is the one piece of
//! cross-tick probe state in the crate; everything else is re-read fresh.

use std::path::Path;
use std::sync::Mutex;

use crate::probe::{Probe, Readings};

use super::helpers::read_first_f64;

const PROC_STAT: &str = "/proc/stat";
const CPUFREQ_DIR: &str = "/sys/devices/system/cpu/cpu0/cpufreq";

/// Aggregate CPU tick counters from the `cpu ` line of `/proc/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CpuTicks {
    user: u64,
    nice: u64,
    system: u64,
    idle: u64,
    iowait: u64,
    irq: u64,
    softirq: u64,
    steal: u64,
}

impl CpuTicks {
    fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }
}

/// Parse the aggregate `cpu ` line out of a `/proc/stat` dump.
fn parse_cpu_ticks(stat: &str) -> Option<CpuTicks> {
    let rest = stat.lines().find_map(|l| l.strip_prefix("cpu "))?;
    let fields: Vec<u64> = rest
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    if fields.len() < 4 {
        return None;
    }
    Some(CpuTicks {
        user: fields[0],
        nice: fields[1],
        system: fields[2],
        idle: fields[3],
        iowait: fields.get(4).copied().unwrap_or(0),
        irq: fields.get(5).copied().unwrap_or(0),
        softirq: fields.get(6).copied().unwrap_or(0),
        steal: fields.get(7).copied().unwrap_or(0),
    })
}

/// Compute (user, system, idle) percentages between two snapshots.
///
/// Returns `None` when no ticks elapsed between the snapshots.
fn utilization(prev: &CpuTicks, cur: &CpuTicks) -> Option<(f64, f64, f64)> {
    let dt = cur.total().saturating_sub(prev.total());
    if dt == 0 {
        return None;
    }
    let pct = |d: u64| d as f64 / dt as f64 * 100.0;
    Some((
        pct(cur.user.saturating_sub(prev.user)),
        pct(cur.system.saturating_sub(prev.system)),
        pct(cur.idle.saturating_sub(prev.idle)),
    ))
}

pub struct CpuProbe {
    prev: Mutex<Option<CpuTicks>>,
}

impl CpuProbe {
    pub fn new() -> Self {
        Self {
            prev: Mutex::new(None),
        }
    }
}

impl Default for CpuProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn loadavg_1m() -> Option<f64> {
    #[cfg(unix)]
    {
        let mut values = [0.0_f64; 3];
        // SAFETY: `getloadavg` writes up to `n` doubles to a valid buffer.
        let n = unsafe { libc::getloadavg(values.as_mut_ptr(), 3) };
        if n >= 1 { Some(values[0]) } else { None }
    }
    #[cfg(not(unix))]
    {
        None
    }
}

impl Probe for CpuProbe {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn is_available(&self) -> bool {
        Path::new(PROC_STAT).exists()
    }

    fn collect(&self) -> Readings {
        let mut out = Readings::new();

        if let Ok(stat) = std::fs::read_to_string(PROC_STAT)
            && let Some(cur) = parse_cpu_ticks(&stat)
        {
            // No previous snapshot yet: diff against zero, i.e. since boot.
            let prev = self
                .prev
                .lock()
                .map(|mut slot| slot.replace(cur))
                .unwrap_or(None)
                .unwrap_or(CpuTicks {
                    user: 0,
                    nice: 0,
                    system: 0,
                    idle: 0,
                    iowait: 0,
                    irq: 0,
                    softirq: 0,
                    steal: 0,
                });
            if let Some((user, system, idle)) = utilization(&prev, &cur) {
                out.insert("cpu_user_pct".to_string(), user);
                out.insert("cpu_system_pct".to_string(), system);
                out.insert("cpu_idle_pct".to_string(), idle);
            }
        }

        let freq_dir = Path::new(CPUFREQ_DIR);
        for (file, key) in [
            ("scaling_cur_freq", "cpu_freq_current_mhz"),
            ("cpuinfo_min_freq", "cpu_freq_min_mhz"),
            ("cpuinfo_max_freq", "cpu_freq_max_mhz"),
        ] {
            if let Some(khz) = read_first_f64(&freq_dir.join(file)) {
                out.insert(key.to_string(), khz / 1000.0);
            }
        }

        if let Some(load) = loadavg_1m() {
            out.insert("cpu_load_1m".to_string(), load);
        }

        out
    }
}
