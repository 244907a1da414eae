//! Hardware-monitor probe — sensor channels from the hwmon tree.
//!
//! The tree is re-enumerated fresh on every collect; device and channel sets
//! can change across boots or hot-plug, so nothing here is cached. Channel
//! kinds are a declarative table: adding a kind is a data edit, not new
//! control flow.

use std::path::PathBuf;

use crate::probe::{Probe, Readings};
use crate::units::{normalize_power_mw, normalize_temp_c, normalize_voltage_v};

use super::helpers::{read_trimmed, sanitize_key};

const HWMON_ROOT: &str = "/sys/class/hwmon";

/// One hwmon channel kind: the sysfs file prefix, the metric-key unit
/// suffix, and the scale normalizer its readings pass through.
struct ChannelKind {
    prefix: &'static str,
    suffix: &'static str,
    normalize: fn(f64) -> f64,
}

fn passthrough(v: f64) -> f64 {
    v
}

/// The four channel kinds: power, voltage, current, temperature.
/// Current is reported in mA unscaled.
const CHANNEL_KINDS: &[ChannelKind] = &[
    ChannelKind {
        prefix: "power",
        suffix: "mw",
        normalize: normalize_power_mw,
    },
    ChannelKind {
        prefix: "in",
        suffix: "v",
        normalize: normalize_voltage_v,
    },
    ChannelKind {
        prefix: "curr",
        suffix: "ma",
        normalize: passthrough,
    },
    ChannelKind {
        prefix: "temp",
        suffix: "c",
        normalize: normalize_temp_c,
    },
];

/// Match `<prefix><digits>_input` and return the channel stem (`power1`).
fn channel_stem<'a>(file_name: &'a str, kind: &ChannelKind) -> Option<&'a str> {
    let stem = file_name.strip_suffix("_input")?;
    let index = stem.strip_prefix(kind.prefix)?;
    if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(stem)
}

pub struct HwmonProbe {
    root: PathBuf,
}

impl HwmonProbe {
    pub fn new() -> Self {
        Self::with_root(HWMON_ROOT)
    }

    /// Probe an alternate tree root. Test seam.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for HwmonProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for HwmonProbe {
    fn name(&self) -> &'static str {
        "hwmon"
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn collect(&self) -> Readings {
        let mut out = Readings::new();
        let Ok(devices) = std::fs::read_dir(&self.root) else {
            return out;
        };
        for device in devices.flatten() {
            let dir = device.path();
            if !dir.is_dir() {
                continue;
            }
            let Some(dir_name) = dir.file_name().and_then(|s| s.to_str()).map(str::to_string)
            else {
                continue;
            };
            let name = read_trimmed(&dir.join("name"))
                .map(|s| sanitize_key(&s))
                .unwrap_or(dir_name);

            let Ok(files) = std::fs::read_dir(&dir) else {
                continue;
            };
            for file in files.flatten() {
                let path = file.path();
                let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                    continue;
                };
                let Some((kind, stem)) = CHANNEL_KINDS
                    .iter()
                    .find_map(|k| channel_stem(file_name, k).map(|stem| (k, stem)))
                else {
                    continue;
                };
                // One bad channel must not affect its siblings.
                let Some(raw) = read_trimmed(&path).and_then(|s| s.parse::<f64>().ok()) else {
                    log::debug!("hwmon: skipping unreadable channel {}", path.display());
                    continue;
                };
                let label = read_trimmed(&dir.join(format!("{stem}_label")))
                    .map(|s| sanitize_key(&s))
                    .unwrap_or_else(|| stem.to_string());
                out.insert(
                    format!("hwmon_{name}_{label}_{}", kind.suffix),
                    (kind.normalize)(raw),
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fake_device(root: &Path, dir: &str, name: Option<&str>) -> PathBuf {
        let d = root.join(dir);
        std::fs::create_dir_all(&d).unwrap();
        if let Some(n) = name {
            std::fs::write(d.join("name"), format!("{n}\n")).unwrap();
        }
        d
    }

    #[test]
    fn reads_labeled_channels_of_every_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let dev = fake_device(tmp.path(), "hwmon0", Some("rpi_adc"));
        std::fs::write(dev.join("power1_input"), "50000\n").unwrap();
        std::fs::write(dev.join("power1_label"), "VDD_5V\n").unwrap();
        std::fs::write(dev.join("in0_input"), "3300\n").unwrap();
        std::fs::write(dev.join("in0_label"), "EXT5V\n").unwrap();
        std::fs::write(dev.join("curr1_input"), "123\n").unwrap();
        std::fs::write(dev.join("curr1_label"), "core current\n").unwrap();
        std::fs::write(dev.join("temp1_input"), "52000\n").unwrap();

        let r = HwmonProbe::with_root(tmp.path()).collect();
        // Micro-unit power scaled to mW, millivolts to V, millidegrees to C.
        assert_eq!(r["hwmon_rpi_adc_VDD_5V_mw"], 50.0);
        assert_eq!(r["hwmon_rpi_adc_EXT5V_v"], 3.3);
        // Current passes through unscaled.
        assert_eq!(r["hwmon_rpi_adc_core_current_ma"], 123.0);
        // Label file absent: fall back to the channel stem.
        assert_eq!(r["hwmon_rpi_adc_temp1_c"], 52.0);
    }

    #[test]
    fn device_name_falls_back_to_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dev = fake_device(tmp.path(), "hwmon3", None);
        std::fs::write(dev.join("in2_input"), "1.8\n").unwrap();
        let r = HwmonProbe::with_root(tmp.path()).collect();
        assert_eq!(r["hwmon_hwmon3_in2_v"], 1.8);
    }

    #[test]
    fn bad_channel_does_not_affect_siblings() {
        let tmp = tempfile::tempdir().unwrap();
        let dev = fake_device(tmp.path(), "hwmon0", Some("pmic"));
        std::fs::write(dev.join("power1_input"), "not a number\n").unwrap();
        std::fs::write(dev.join("power2_input"), "1234\n").unwrap();
        std::fs::write(dev.join("curr1_input"), "55\n").unwrap();

        let r = HwmonProbe::with_root(tmp.path()).collect();
        assert_eq!(r.len(), 2);
        assert_eq!(r["hwmon_pmic_power2_mw"], 1234.0);
        assert_eq!(r["hwmon_pmic_curr1_ma"], 55.0);
    }

    #[test]
    fn non_channel_files_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let dev = fake_device(tmp.path(), "hwmon0", Some("chip"));
        std::fs::write(dev.join("uevent"), "x\n").unwrap();
        std::fs::write(dev.join("intrusion0_input"), "1\n").unwrap();
        std::fs::write(dev.join("power_input"), "5\n").unwrap();
        assert!(HwmonProbe::with_root(tmp.path()).collect().is_empty());
    }

    #[test]
    fn missing_tree_is_empty_not_error() {
        let probe = HwmonProbe::with_root("/definitely/not/here");
        assert!(!probe.is_available());
        assert!(probe.collect().is_empty());
    }

    #[test]
    fn channel_stem_matching() {
        let power = &CHANNEL_KINDS[0];
        assert_eq!(channel_stem("power1_input", power), Some("power1"));
        assert_eq!(channel_stem("power12_input", power), Some("power12"));
        assert_eq!(channel_stem("power_input", power), None);
        assert_eq!(channel_stem("power1_label", power), None);
        let volt = &CHANNEL_KINDS[1];
        assert_eq!(channel_stem("in0_input", volt), Some("in0"));
        assert_eq!(channel_stem("intrusion0_input", volt), None);
    }
}
