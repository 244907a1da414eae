//! `pimon record` — run the sample loop and append rows to a CSV file.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pimon_core::{CsvSink, RunMeta, Sampler, SamplerConfig, all_probes, detect_machine_info};

/// Run the record command.
pub fn run(interval: f64, duration: f64, out: &Path, no_vcgencmd: bool) {
    if !interval.is_finite() || interval < 0.0 {
        eprintln!("Invalid --interval value: {interval}. Expected a finite value >= 0.");
        std::process::exit(2);
    }
    if !duration.is_finite() || duration < 0.0 {
        eprintln!("Invalid --duration value: {duration}. Expected a finite value >= 0.");
        std::process::exit(2);
    }

    let config = SamplerConfig {
        interval: Duration::from_secs_f64(interval),
        duration: (duration > 0.0).then(|| Duration::from_secs_f64(duration)),
    };

    // Availability detection and schema freeze, before the loop starts.
    let sampler = Sampler::initialize(all_probes(!no_vcgencmd));
    if sampler.schema().is_empty() {
        eprintln!("Error: no metrics available from any source on this host");
        std::process::exit(1);
    }

    let mut sink = match CsvSink::create(out, sampler.schema()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error creating {}: {e}", out.display());
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    println!("Recording telemetry");
    println!("  Sources:   {}", sampler.probe_names().join(", "));
    println!("  Schema:    {} keys", sampler.schema().len());
    println!("  Interval:  {interval:.1}s");
    match config.duration {
        Some(d) => println!("  Duration:  {:.0}s", d.as_secs_f64()),
        None => println!("  Duration:  until Ctrl+C"),
    }
    println!("  Output:    {}", out.display());
    println!();

    let machine = detect_machine_info();
    let stats = match sampler.run(&mut sink, &config, &running) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Error writing {}: {e}", out.display());
            std::process::exit(1);
        }
    };

    println!();
    println!(
        "Recorded {} rows in {:.1}s -> {}",
        stats.ticks,
        stats.elapsed.as_secs_f64(),
        out.display()
    );

    let meta = RunMeta {
        version: 1,
        id: RunMeta::new_id(),
        started_at: stats.started_at,
        ended_at: stats.ended_at,
        duration_ms: stats.elapsed.as_millis() as u64,
        interval_ms: config.interval.as_millis() as u64,
        duration_bound_ms: config.duration.map(|d| d.as_millis() as u64),
        ticks: stats.ticks,
        schema_keys: sampler.schema().len(),
        probes: sampler.probe_names(),
        machine,
        pimon_version: pimon_core::VERSION.to_string(),
    };
    let meta_path = out.with_extension("run.json");
    match meta.write(&meta_path) {
        Ok(()) => println!("Run metadata saved to {}", meta_path.display()),
        // The CSV is the product; metadata failures are not fatal.
        Err(e) => eprintln!("Warning: could not write {}: {e}", meta_path.display()),
    }
}
