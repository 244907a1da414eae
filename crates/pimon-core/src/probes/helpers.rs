//! Shared helpers used by multiple probe implementations.

use std::path::Path;

/// Read a file and return its trimmed contents, `None` if unreadable or empty.
pub fn read_trimmed(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let v = raw.trim();
    if v.is_empty() { None } else { Some(v.to_string()) }
}

/// Read the first whitespace-separated field of a file as an `f64`.
pub fn read_first_f64(path: &Path) -> Option<f64> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.split_whitespace().next().and_then(|v| v.parse().ok()))
}

/// Run a subprocess and return its stdout as a `String`.
///
/// Returns `None` if the command fails to spawn or exits with a non-zero
/// status. This is the shared helper for probes that shell out to external
/// tools.
pub fn run_command(program: &str, args: &[&str]) -> Option<String> {
    let output = std::process::Command::new(program)
        .args(args)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Map a free-form label into a metric-key fragment: lowercase preserved,
/// whitespace and key-hostile characters become underscores.
pub fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_trimmed_strips_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("name");
        std::fs::write(&path, "rpi_volt\n").unwrap();
        assert_eq!(read_trimmed(&path), Some("rpi_volt".to_string()));
    }

    #[test]
    fn read_trimmed_empty_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("name");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(read_trimmed(&path), None);
        assert_eq!(read_trimmed(&dir.path().join("missing")), None);
    }

    #[test]
    fn read_first_f64_takes_first_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uptime");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "12345.67 99999.0").unwrap();
        assert_eq!(read_first_f64(&path), Some(12345.67));
    }

    #[test]
    fn read_first_f64_non_numeric_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad");
        std::fs::write(&path, "not-a-number\n").unwrap();
        assert_eq!(read_first_f64(&path), None);
    }

    #[test]
    fn run_command_echo() {
        let out = run_command("echo", &["hello"]);
        assert_eq!(out.unwrap().trim(), "hello");
    }

    #[test]
    fn run_command_missing_binary() {
        assert!(run_command("/nonexistent/binary", &[]).is_none());
    }

    #[test]
    fn run_command_failing_status() {
        assert!(run_command("false", &[]).is_none());
    }

    #[test]
    fn sanitize_key_replaces_spaces() {
        assert_eq!(sanitize_key("cpu thermal"), "cpu_thermal");
        assert_eq!(sanitize_key("VDD_CORE"), "VDD_CORE");
        assert_eq!(sanitize_key("3V3 (sys)"), "3V3__sys_");
    }
}
