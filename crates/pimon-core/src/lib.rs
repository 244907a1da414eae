//! # pimon-core
//!
//! Core telemetry pipeline for Raspberry Pi-class hosts: source probes over
//! OS counters, the `vcgencmd` firmware tool, and the hwmon sensor tree;
//! unit normalizers that reconcile their inconsistent scales; and a
//! frozen-schema recorder that keeps every persisted row the same shape for
//! the life of a run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//!
//! use pimon_core::{CsvSink, Sampler, SamplerConfig, all_probes};
//!
//! let sampler = Sampler::initialize(all_probes(true));
//! let mut sink = CsvSink::create("metrics.csv", sampler.schema()).unwrap();
//! let running = Arc::new(AtomicBool::new(true));
//! sampler
//!     .run(&mut sink, &SamplerConfig::default(), &running)
//!     .unwrap();
//! ```
//!
//! ## Architecture
//!
//! Probes → Readings (partial, per tick) → frozen Schema overlay → Record →
//! Sink (CSV append + status line).
//!
//! Probes never fail visibly: any internal error reduces to omitting the
//! affected keys for that tick. Source availability is checked once, before
//! the schema freezes; the schema never changes afterward, so a key that
//! appears later is dropped and a key that disappears serializes as an
//! explicit empty field.

pub mod meta;
pub mod parse;
pub mod probe;
pub mod probes;
pub mod sampler;
pub mod schema;
pub mod sink;
pub mod units;

pub use meta::{MachineInfo, RunMeta, detect_machine_info, iso8601_now};
pub use probe::{Probe, Readings};
pub use probes::all_probes;
pub use sampler::{RunStats, Sampler, SamplerConfig};
pub use schema::{Record, Schema};
pub use sink::{CsvSink, Sink, status_line};
pub use units::{normalize_power_mw, normalize_temp_c, normalize_voltage_v};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
