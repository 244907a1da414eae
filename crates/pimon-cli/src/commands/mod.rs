//! Subcommand implementations.

pub mod probes;
pub mod record;
pub mod snapshot;

/// Write a JSON document to a file, exiting on failure.
pub fn write_json(value: &serde_json::Value, path: &str, label: &str) {
    let json = serde_json::to_string_pretty(value).unwrap_or_default();
    match std::fs::write(path, json) {
        Ok(()) => println!("{label} written to {path}"),
        Err(e) => {
            eprintln!("Error writing {path}: {e}");
            std::process::exit(1);
        }
    }
}
