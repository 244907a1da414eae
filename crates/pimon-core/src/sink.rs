//! Sink adapter — append-only CSV store plus the condensed status line.
//!
//! `persist` may fail fatally (destination errors terminate the run, there
//! is no retry policy); `summarize` never fails. The store is opened,
//! written, and released within each append, so no file handle lives across
//! ticks.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::schema::{Record, Schema};

/// Per-tick output operations the sampler drives.
pub trait Sink {
    /// Append one row consistent with the frozen schema.
    fn persist(&mut self, schema: &Schema, record: &Record) -> io::Result<()>;

    /// Emit a condensed live-status line. Infallible.
    fn summarize(&self, schema: &Schema, record: &Record);
}

/// CSV file sink. The header row is `timestamp` followed by the schema keys
/// in column order; every subsequent row aligns positionally. Absent values
/// serialize as empty fields, never omitted or reordered.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Create the sink, writing the header if the file is new or empty.
    pub fn create(path: impl Into<PathBuf>, schema: &Schema) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let needs_header = std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        if needs_header {
            let mut file = std::fs::File::create(&path)?;
            writeln!(file, "timestamp,{}", schema.keys().join(","))?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for CsvSink {
    fn persist(&mut self, schema: &Schema, record: &Record) -> io::Result<()> {
        let mut row = String::with_capacity(32 + schema.len() * 8);
        row.push_str(&record.timestamp);
        for value in record.values() {
            row.push(',');
            if let Some(v) = value {
                row.push_str(&v.to_string());
            }
        }
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{row}")
    }

    fn summarize(&self, schema: &Schema, record: &Record) {
        println!("{}", status_line(schema, record, &self.path));
    }
}

/// Build the condensed status line: CPU utilization, best-available
/// temperature (firmware die reading preferred, else the hottest thermal
/// zone), and the sum of every power-denominated value present.
pub fn status_line(schema: &Schema, record: &Record, path: &Path) -> String {
    let cpu = record
        .get(schema, "cpu_user_pct")
        .map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}%"));

    let temp = best_temperature(schema, record)
        .map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}C"));

    let power = total_power_mw(schema, record)
        .map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"));

    format!(
        "{} | CPU {} | Temp {} | Power(mW) {} | rows-> {}",
        record.timestamp,
        cpu,
        temp,
        power,
        path.display()
    )
}

/// Prefer the firmware-reported die temperature; otherwise the maximum of
/// all thermal-zone readings.
fn best_temperature(schema: &Schema, record: &Record) -> Option<f64> {
    if let Some(t) = record.get(schema, "vc_temp_c") {
        return Some(t);
    }
    schema
        .iter_record(record)
        .filter(|(key, _)| key.starts_with("therm_"))
        .filter_map(|(_, v)| v)
        .fold(None, |best, v| Some(best.map_or(v, |b: f64| b.max(v))))
}

/// Sum of every `_mw`-denominated value present this tick. `None` when the
/// schema carries no power keys at all.
fn total_power_mw(schema: &Schema, record: &Record) -> Option<f64> {
    let mut saw_key = false;
    let mut total = 0.0;
    for (key, value) in schema.iter_record(record) {
        if key.ends_with("_mw") {
            saw_key = true;
            if let Some(v) = value {
                total += v;
            }
        }
    }
    saw_key.then_some(total)
}
