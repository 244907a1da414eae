//! Thermal probe — per-zone temperatures from the thermal-zone tree.

use std::path::PathBuf;

use crate::probe::{Probe, Readings};
use crate::units::normalize_temp_c;

use super::helpers::{read_trimmed, sanitize_key};

const THERMAL_ROOT: &str = "/sys/class/thermal";

pub struct ThermalProbe {
    root: PathBuf,
}

impl ThermalProbe {
    pub fn new() -> Self {
        Self::with_root(THERMAL_ROOT)
    }

    /// Probe an alternate tree root. Test seam.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ThermalProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for ThermalProbe {
    fn name(&self) -> &'static str {
        "thermal"
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn collect(&self) -> Readings {
        let mut out = Readings::new();
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return out;
        };
        for entry in entries.flatten() {
            let dir = entry.path();
            let Some(dir_name) = dir.file_name().and_then(|s| s.to_str()).map(str::to_string)
            else {
                continue;
            };
            if !dir_name.starts_with("thermal_zone") {
                continue;
            }
            let Some(raw) = read_trimmed(&dir.join("temp")).and_then(|s| s.parse::<f64>().ok())
            else {
                log::debug!("thermal: skipping zone {dir_name} with unreadable temp");
                continue;
            };
            let zone_type = read_trimmed(&dir.join("type")).unwrap_or(dir_name);
            out.insert(
                format!("therm_{}_c", sanitize_key(&zone_type)),
                normalize_temp_c(raw),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fake_zone(root: &Path, name: &str, temp: &str, zone_type: Option<&str>) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("temp"), temp).unwrap();
        if let Some(t) = zone_type {
            std::fs::write(dir.join("type"), t).unwrap();
        }
    }

    #[test]
    fn reads_zone_with_type_label() {
        let tmp = tempfile::tempdir().unwrap();
        fake_zone(tmp.path(), "thermal_zone0", "52300\n", Some("cpu-thermal\n"));
        let r = ThermalProbe::with_root(tmp.path()).collect();
        assert_eq!(r["therm_cpu-thermal_c"], 52.3);
    }

    #[test]
    fn falls_back_to_zone_directory_name() {
        let tmp = tempfile::tempdir().unwrap();
        fake_zone(tmp.path(), "thermal_zone1", "48000\n", None);
        let r = ThermalProbe::with_root(tmp.path()).collect();
        assert_eq!(r["therm_thermal_zone1_c"], 48.0);
    }

    #[test]
    fn already_scaled_reading_passes_through() {
        let tmp = tempfile::tempdir().unwrap();
        fake_zone(tmp.path(), "thermal_zone0", "45.5\n", Some("soc\n"));
        let r = ThermalProbe::with_root(tmp.path()).collect();
        assert_eq!(r["therm_soc_c"], 45.5);
    }

    #[test]
    fn bad_zone_does_not_affect_others() {
        let tmp = tempfile::tempdir().unwrap();
        fake_zone(tmp.path(), "thermal_zone0", "garbage\n", Some("dead\n"));
        fake_zone(tmp.path(), "thermal_zone1", "61000\n", Some("gpu thermal\n"));
        // A zone directory with no temp file at all.
        std::fs::create_dir_all(tmp.path().join("thermal_zone2")).unwrap();
        let r = ThermalProbe::with_root(tmp.path()).collect();
        assert_eq!(r.len(), 1);
        assert_eq!(r["therm_gpu_thermal_c"], 61.0);
    }

    #[test]
    fn missing_tree_is_empty_not_error() {
        let probe = ThermalProbe::with_root("/definitely/not/here");
        assert!(!probe.is_available());
        assert!(probe.collect().is_empty());
    }

    #[test]
    fn non_zone_directories_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        fake_zone(tmp.path(), "cooling_device0", "1\n", None);
        assert!(ThermalProbe::with_root(tmp.path()).collect().is_empty());
    }
}
