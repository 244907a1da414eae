//! `pimon probes` — list source probes and their availability.

use pimon_core::all_probes;

pub fn run(no_vcgencmd: bool) {
    println!("Source probes on this host:");
    for probe in all_probes(!no_vcgencmd) {
        let status = if probe.is_available() {
            "available"
        } else {
            "unavailable"
        };
        println!("  {:<10} {status}", probe.name());
    }
    if no_vcgencmd {
        println!("  {:<10} disabled (--no-vcgencmd)", "vcgencmd");
    }
}
