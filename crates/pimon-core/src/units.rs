//! Magnitude-heuristic unit normalization.
//!
//! The hwmon tree and the firmware tool report values without scale metadata:
//! a power channel may be micro- or milliwatts, a voltage channel milli- or
//! whole volts, a temperature milli- or whole degrees. These helpers apply
//! fixed magnitude thresholds to disambiguate. The thresholds are a documented
//! heuristic; they are intentionally not derived from the value's physical
//! plausibility, and they are idempotent for already-normalized input.

/// Power threshold above which a reading is assumed to be microwatts.
const POWER_MICRO_THRESHOLD: f64 = 10_000.0;
/// Voltage threshold above which a reading is assumed to be millivolts.
const VOLTAGE_MILLI_THRESHOLD: f64 = 10.0;
/// Temperature threshold above which a reading is assumed to be millidegrees.
const TEMP_MILLI_THRESHOLD: f64 = 200.0;

/// Normalize a power reading to milliwatts.
pub fn normalize_power_mw(raw: f64) -> f64 {
    if raw > POWER_MICRO_THRESHOLD {
        raw / 1000.0
    } else {
        raw
    }
}

/// Normalize a voltage reading to volts.
pub fn normalize_voltage_v(raw: f64) -> f64 {
    if raw > VOLTAGE_MILLI_THRESHOLD {
        raw / 1000.0
    } else {
        raw
    }
}

/// Normalize a temperature reading to degrees Celsius.
pub fn normalize_temp_c(raw: f64) -> f64 {
    if raw > TEMP_MILLI_THRESHOLD {
        raw / 1000.0
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_micro_scaled_down() {
        assert_eq!(normalize_power_mw(50_000.0), 50.0);
    }

    #[test]
    fn power_milli_unchanged() {
        assert_eq!(normalize_power_mw(50.0), 50.0);
    }

    #[test]
    fn power_at_threshold_unchanged() {
        assert_eq!(normalize_power_mw(10_000.0), 10_000.0);
    }

    #[test]
    fn voltage_milli_scaled_down() {
        assert_eq!(normalize_voltage_v(3300.0), 3.3);
    }

    #[test]
    fn voltage_base_unchanged() {
        assert_eq!(normalize_voltage_v(3.3), 3.3);
    }

    #[test]
    fn voltage_at_threshold_unchanged() {
        assert_eq!(normalize_voltage_v(10.0), 10.0);
    }

    #[test]
    fn temp_milli_scaled_down() {
        assert_eq!(normalize_temp_c(52_000.0), 52.0);
    }

    #[test]
    fn temp_degrees_unchanged() {
        assert_eq!(normalize_temp_c(52.0), 52.0);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_power_mw(50_000.0);
        assert_eq!(normalize_power_mw(once), once);
        let once = normalize_voltage_v(3300.0);
        assert_eq!(normalize_voltage_v(once), once);
        let once = normalize_temp_c(52_000.0);
        assert_eq!(normalize_temp_c(once), once);
    }
}
