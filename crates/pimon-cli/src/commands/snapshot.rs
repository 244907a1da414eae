//! `pimon snapshot` — one full probe pass, printed as JSON.

use pimon_core::{Sampler, all_probes};
use serde_json::{Map, Value, json};

pub fn run(output: Option<&str>, no_vcgencmd: bool) {
    let sampler = Sampler::initialize(all_probes(!no_vcgencmd));
    let record = sampler.sample();

    let mut doc = Map::new();
    doc.insert("timestamp".to_string(), json!(record.timestamp));
    doc.insert("sources".to_string(), json!(sampler.probe_names()));
    let mut metrics = Map::new();
    for (key, value) in sampler.schema().iter_record(&record) {
        metrics.insert(key.to_string(), value.map_or(Value::Null, |v| json!(v)));
    }
    doc.insert("metrics".to_string(), Value::Object(metrics));
    let doc = Value::Object(doc);

    match output {
        Some(path) => super::write_json(&doc, path, "Snapshot"),
        None => println!("{}", serde_json::to_string_pretty(&doc).unwrap_or_default()),
    }
}
