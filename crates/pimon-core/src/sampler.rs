//! Sample scheduler — the fixed-interval, single-threaded tick loop.
//!
//! Each tick stamps the current time, runs every enabled probe serially in
//! registry order, overlays the results onto a schema-shaped record, hands
//! the record to the sink, then sleeps for the configured interval. The
//! sleep is computed independently of how long the probes took, so tick
//! spacing drifts upward under sustained load rather than self-correcting.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::meta::iso8601_now;
use crate::probe::{Probe, Readings};
use crate::schema::{Record, Schema};
use crate::sink::Sink;

/// Granularity of the interruptible inter-tick sleep.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// Loop configuration.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Wall-clock pause between ticks.
    pub interval: Duration,
    /// Stop once this much time has elapsed since loop start, checked once
    /// per completed tick. `None` runs until interrupted.
    pub duration: Option<Duration>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            duration: None,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub ticks: u64,
    pub started_at: String,
    pub ended_at: String,
    pub elapsed: Duration,
}

/// The probe registry plus the schema frozen from its initial full pass.
pub struct Sampler {
    probes: Vec<Box<dyn Probe>>,
    schema: Schema,
}

impl Sampler {
    /// Check availability once, drop unavailable sources for the whole run,
    /// execute one full probe pass, and freeze the schema from its keys.
    pub fn initialize(probes: Vec<Box<dyn Probe>>) -> Self {
        let mut enabled: Vec<Box<dyn Probe>> = Vec::with_capacity(probes.len());
        for probe in probes {
            if probe.is_available() {
                enabled.push(probe);
            } else {
                log::warn!("source '{}' unavailable, disabled for this run", probe.name());
            }
        }

        let initial = collect_serial(&enabled);
        let schema = Schema::freeze(&initial);
        log::debug!(
            "schema frozen: {} keys from {} sources",
            schema.len(),
            enabled.len()
        );

        Self {
            probes: enabled,
            schema,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Names of the sources that survived availability detection.
    pub fn probe_names(&self) -> Vec<String> {
        self.probes.iter().map(|p| p.name().to_string()).collect()
    }

    /// One tick: stamp, collect serially, overlay onto a fresh record.
    pub fn sample(&self) -> Record {
        let mut record = self.schema.new_record(iso8601_now());
        let readings = collect_serial(&self.probes);
        self.schema.overlay(&mut record, &readings);
        record
    }

    /// Run the sample loop until the duration bound elapses or `running` is
    /// cleared. Sink persist errors are fatal and abort the loop; the
    /// running flag is only consulted between ticks, never mid-row.
    pub fn run(
        &self,
        sink: &mut dyn Sink,
        config: &SamplerConfig,
        running: &AtomicBool,
    ) -> io::Result<RunStats> {
        let started_at = iso8601_now();
        let start = Instant::now();
        let mut ticks = 0u64;

        while running.load(Ordering::SeqCst) {
            let record = self.sample();
            sink.persist(&self.schema, &record)?;
            sink.summarize(&self.schema, &record);
            ticks += 1;

            if let Some(bound) = config.duration
                && start.elapsed() >= bound
            {
                break;
            }
            interruptible_sleep(config.interval, running);
        }

        Ok(RunStats {
            ticks,
            started_at,
            ended_at: iso8601_now(),
            elapsed: start.elapsed(),
        })
    }
}

/// Invoke every probe serially, in registry order, merging their readings.
fn collect_serial(probes: &[Box<dyn Probe>]) -> Readings {
    let mut merged = Readings::new();
    for probe in probes {
        merged.extend(probe.collect());
    }
    merged
}

/// Sleep for `total`, waking early if the running flag clears.
fn interruptible_sleep(total: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + total;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}
