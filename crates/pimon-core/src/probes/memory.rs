//! Memory probe — RAM and swap usage from `/proc/meminfo`.

use std::path::Path;

use crate::probe::{Probe, Readings};

const PROC_MEMINFO: &str = "/proc/meminfo";

const KIB_PER_MIB: f64 = 1024.0;

/// Parse the fields of a `/proc/meminfo` dump into metric keys.
///
/// `mem_used_mb` is total minus available; `mem_free_mb` reports the
/// *available* figure (memory reclaimable without swapping), not `MemFree`.
fn meminfo_readings(text: &str) -> Readings {
    let mut total = None;
    let mut available = None;
    let mut swap_total = None;
    let mut swap_free = None;

    for line in text.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(kib) = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<f64>().ok())
        else {
            continue;
        };
        match key {
            "MemTotal" => total = Some(kib),
            "MemAvailable" => available = Some(kib),
            "SwapTotal" => swap_total = Some(kib),
            "SwapFree" => swap_free = Some(kib),
            _ => {}
        }
    }

    let mut out = Readings::new();
    if let (Some(total), Some(available)) = (total, available) {
        let used = total - available;
        out.insert("mem_total_mb".to_string(), total / KIB_PER_MIB);
        out.insert("mem_used_mb".to_string(), used / KIB_PER_MIB);
        out.insert("mem_free_mb".to_string(), available / KIB_PER_MIB);
        if total > 0.0 {
            out.insert("mem_used_pct".to_string(), used / total * 100.0);
        }
    }
    if let (Some(swap_total), Some(swap_free)) = (swap_total, swap_free) {
        let used = swap_total - swap_free;
        out.insert("swap_total_mb".to_string(), swap_total / KIB_PER_MIB);
        out.insert("swap_used_mb".to_string(), used / KIB_PER_MIB);
        let pct = if swap_total > 0.0 {
            used / swap_total * 100.0
        } else {
            0.0
        };
        out.insert("swap_used_pct".to_string(), pct);
    }
    out
}

pub struct MemoryProbe;

impl Probe for MemoryProbe {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn is_available(&self) -> bool {
        Path::new(PROC_MEMINFO).exists()
    }

    fn collect(&self) -> Readings {
        std::fs::read_to_string(PROC_MEMINFO)
            .map(|text| meminfo_readings(&text))
            .unwrap_or_default()
    }
}
