//! Parsers for firmware-tool output.
//!
//! Pure text scanners, decoupled from process invocation so they can be fed
//! captured transcripts. The tool's output formats:
//!
//! - `measure_temp`:  `temp=52.3'C`
//! - `measure_volts`: `volt=0.9200V`
//! - `measure_clock`: `frequency(48)=600000000`
//! - `measure_power`: one line per rail,
//!   `rail: VDD_CORE power: 1234.5mW current: 456.7mA voltage: 0.85V`

/// One rail row from the aggregate power query.
#[derive(Debug, Clone, PartialEq)]
pub struct RailPower {
    pub rail: String,
    pub power_mw: f64,
    pub current_ma: f64,
    pub voltage_v: f64,
}

/// Parse the numeric prefix of a token, ignoring a trailing unit suffix
/// (`1234.5mW` -> 1234.5, `0.85V` -> 0.85).
fn numeric_prefix(token: &str) -> Option<f64> {
    let end = token
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))))
        .map_or(token.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }
    token[..end].parse().ok()
}

/// Extract the first number embedded in free text (`temp=52.3'C` -> 52.3).
pub fn first_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            // Include a leading sign when present.
            let start = if i > 0 && (bytes[i - 1] == b'-' || bytes[i - 1] == b'+') {
                i - 1
            } else {
                i
            };
            return numeric_prefix(&s[start..]);
        }
    }
    None
}

/// Parse a `volt=<value>V` reading from a voltage-domain query.
pub fn parse_volts(s: &str) -> Option<f64> {
    let (_, rest) = s.split_once("volt=")?;
    numeric_prefix(rest.trim())
}

/// Parse the integer frequency after `=` from a clock-domain query.
pub fn parse_clock_hz(s: &str) -> Option<u64> {
    let (_, rest) = s.split_once('=')?;
    let digits: &str = rest
        .trim()
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or("");
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse every rail row of a `measure_power` transcript.
///
/// Each line is scanned for the labeled fields `rail:`, `power:`, `current:`
/// and `voltage:`; a line missing any of the four is skipped. Unparsable
/// lines never affect their siblings.
pub fn parse_power_rails(s: &str) -> Vec<RailPower> {
    s.lines().filter_map(parse_power_line).collect()
}

fn parse_power_line(line: &str) -> Option<RailPower> {
    let mut rail = None;
    let mut power_mw = None;
    let mut current_ma = None;
    let mut voltage_v = None;

    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        match token {
            "rail:" => rail = tokens.next().map(str::to_string),
            "power:" => power_mw = tokens.next().and_then(numeric_prefix),
            "current:" => current_ma = tokens.next().and_then(numeric_prefix),
            "voltage:" => voltage_v = tokens.next().and_then(numeric_prefix),
            _ => {}
        }
    }

    Some(RailPower {
        rail: rail?,
        power_mw: power_mw?,
        current_ma: current_ma?,
        voltage_v: voltage_v?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // first_number
    // -----------------------------------------------------------------------

    #[test]
    fn first_number_measure_temp_transcript() {
        assert_eq!(first_number("temp=52.3'C"), Some(52.3));
    }

    #[test]
    fn first_number_plain_integer() {
        assert_eq!(first_number("throttled=0x50000"), Some(0.0));
    }

    #[test]
    fn first_number_negative() {
        assert_eq!(first_number("offset=-3.5C"), Some(-3.5));
    }

    #[test]
    fn first_number_no_digits() {
        assert_eq!(first_number("error: not supported"), None);
        assert_eq!(first_number(""), None);
    }

    // -----------------------------------------------------------------------
    // parse_volts
    // -----------------------------------------------------------------------

    #[test]
    fn volts_transcript() {
        assert_eq!(parse_volts("volt=0.9200V"), Some(0.92));
    }

    #[test]
    fn volts_sdram_transcript() {
        assert_eq!(parse_volts("volt=1.1000V"), Some(1.1));
    }

    #[test]
    fn volts_missing_field() {
        assert_eq!(parse_volts("temp=52.3'C"), None);
        assert_eq!(parse_volts("volt=garbage"), None);
    }

    // -----------------------------------------------------------------------
    // parse_clock_hz
    // -----------------------------------------------------------------------

    #[test]
    fn clock_transcript() {
        assert_eq!(parse_clock_hz("frequency(48)=600000000"), Some(600_000_000));
    }

    #[test]
    fn clock_arm_transcript() {
        assert_eq!(
            parse_clock_hz("frequency(0)=1500398464"),
            Some(1_500_398_464)
        );
    }

    #[test]
    fn clock_unparsable() {
        assert_eq!(parse_clock_hz("frequency(48)="), None);
        assert_eq!(parse_clock_hz("no equals sign"), None);
    }

    // -----------------------------------------------------------------------
    // parse_power_rails
    // -----------------------------------------------------------------------

    #[test]
    fn power_rail_single_line() {
        let rails =
            parse_power_rails("rail: VDD_CORE power: 1234.5mW current: 456.7mA voltage: 0.85V");
        assert_eq!(
            rails,
            vec![RailPower {
                rail: "VDD_CORE".to_string(),
                power_mw: 1234.5,
                current_ma: 456.7,
                voltage_v: 0.85,
            }]
        );
    }

    #[test]
    fn power_rail_multi_line_transcript() {
        let out = "rail: VDD_CORE power: 2711.0mW current: 3010.2mA voltage: 0.90V\n\
                   rail: DDR_VDD2 power: 140.6mW current: 127.8mA voltage: 1.10V\n\
                   rail: 3V3_SYS power: 264.0mW current: 80.0mA voltage: 3.30V";
        let rails = parse_power_rails(out);
        assert_eq!(rails.len(), 3);
        assert_eq!(rails[1].rail, "DDR_VDD2");
        assert_eq!(rails[1].power_mw, 140.6);
        assert_eq!(rails[2].voltage_v, 3.3);
    }

    #[test]
    fn power_rail_malformed_line_skipped() {
        let out = "rail: VDD_CORE power: 1.0mW current: 2.0mA voltage: 0.9V\n\
                   rail: BROKEN power: current: 2.0mA voltage: 0.9V\n\
                   total power consumption unavailable\n\
                   rail: 3V3_SYS power: 3.0mW current: 4.0mA voltage: 3.3V";
        let rails = parse_power_rails(out);
        assert_eq!(rails.len(), 2);
        assert_eq!(rails[0].rail, "VDD_CORE");
        assert_eq!(rails[1].rail, "3V3_SYS");
    }

    #[test]
    fn power_rail_empty_output() {
        assert!(parse_power_rails("").is_empty());
    }
}
