//! Firmware probe — SoC measurements via the `vcgencmd` tool.
//!
//! The tool is located once, by running its `version` subcommand against an
//! ordered candidate list; the first success (or the lack of any) is cached
//! for the whole run. Each collect then issues one blocking invocation per
//! metric family: temperature, every voltage domain, every clock domain, and
//! the aggregate power query. The domain lists are declarative tables.

use std::sync::OnceLock;

use crate::parse::{first_number, parse_clock_hz, parse_power_rails, parse_volts};
use crate::probe::{Probe, Readings};

use super::helpers::{run_command, sanitize_key};

/// Candidate tool locations, tried in order.
pub const TOOL_CANDIDATES: &[&str] = &["/usr/bin/vcgencmd", "/bin/vcgencmd", "vcgencmd"];

/// Voltage domains queried with `measure_volts <domain>`.
const VOLT_DOMAINS: &[&str] = &["core", "sdram_c", "sdram_i", "sdram_p"];

/// Clock domains queried with `measure_clock <domain>`.
const CLOCK_DOMAINS: &[&str] = &["arm", "core", "v3d", "h264", "isp", "hevc", "emmc", "pixel"];

/// Try each candidate path with the `version` health check; first hit wins.
fn detect_tool(candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .find(|path| run_command(path, &["version"]).is_some_and(|out| !out.trim().is_empty()))
        .cloned()
}

pub struct FirmwareProbe {
    candidates: Vec<String>,
    tool: OnceLock<Option<String>>,
}

impl FirmwareProbe {
    pub fn new() -> Self {
        Self::with_candidates(TOOL_CANDIDATES.iter().map(|s| s.to_string()).collect())
    }

    /// Probe with an alternate candidate list. Test seam.
    pub fn with_candidates(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            tool: OnceLock::new(),
        }
    }

    /// Resolved tool path; detection runs on first use and is cached.
    fn tool(&self) -> Option<&str> {
        self.tool
            .get_or_init(|| detect_tool(&self.candidates))
            .as_deref()
    }
}

impl Default for FirmwareProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for FirmwareProbe {
    fn name(&self) -> &'static str {
        "vcgencmd"
    }

    fn is_available(&self) -> bool {
        self.tool().is_some()
    }

    fn collect(&self) -> Readings {
        let mut out = Readings::new();
        let Some(tool) = self.tool() else {
            return out;
        };

        if let Some(temp) = run_command(tool, &["measure_temp"]).and_then(|s| first_number(&s)) {
            out.insert("vc_temp_c".to_string(), temp);
        }

        for dom in VOLT_DOMAINS {
            if let Some(volts) =
                run_command(tool, &["measure_volts", dom]).and_then(|s| parse_volts(&s))
            {
                out.insert(format!("vc_volt_{dom}_v"), volts);
            }
        }

        for clk in CLOCK_DOMAINS {
            if let Some(hz) =
                run_command(tool, &["measure_clock", clk]).and_then(|s| parse_clock_hz(&s))
            {
                out.insert(format!("vc_clk_{clk}_hz"), hz as f64);
            }
        }

        if let Some(power) = run_command(tool, &["measure_power"]) {
            for rail in parse_power_rails(&power) {
                let rail_key = sanitize_key(&rail.rail);
                out.insert(format!("vc_power_{rail_key}_mw"), rail.power_mw);
                out.insert(format!("vc_curr_{rail_key}_ma"), rail.current_ma);
                out.insert(format!("vc_volt_{rail_key}_v"), rail.voltage_v);
            }
        }

        out
    }
}
