//! Frozen metric schema and per-tick records.
//!
//! The schema is computed once, from one full probe pass before the sample
//! loop starts, and never mutated afterward. Every persisted row carries
//! exactly the schema's columns in the schema's order. A key that first
//! appears after the freeze is dropped at overlay time — a documented
//! limitation of schema stability, not an error; a key that stops appearing
//! yields an absent slot, never a removed column.

use std::collections::HashMap;

use crate::probe::Readings;

/// Immutable, ordered set of metric keys established at startup.
#[derive(Debug, Clone)]
pub struct Schema {
    keys: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Freeze a schema from the initial full probe pass: the sorted set of
    /// every key observed.
    pub fn freeze(readings: &Readings) -> Self {
        // Readings is an ordered map, so iteration is already sorted and
        // deduplicated.
        let keys: Vec<String> = readings.keys().cloned().collect();
        let index = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();
        Self { keys, index }
    }

    /// Schema keys in persisted column order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Column index of a key, if it was present at freeze time.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// A record with every slot absent.
    pub fn new_record(&self, timestamp: String) -> Record {
        Record {
            timestamp,
            values: vec![None; self.keys.len()],
        }
    }

    /// Overlay a tick's probe readings onto a record, restricted to keys
    /// already in the schema. Unknown keys are silently dropped.
    pub fn overlay(&self, record: &mut Record, readings: &Readings) {
        for (key, value) in readings {
            if let Some(i) = self.index_of(key) {
                record.values[i] = Some(*value);
            }
        }
    }

    /// Iterate `(key, value)` pairs of a record in column order.
    pub fn iter_record<'a>(
        &'a self,
        record: &'a Record,
    ) -> impl Iterator<Item = (&'a str, Option<f64>)> {
        self.keys
            .iter()
            .zip(&record.values)
            .map(|(k, v)| (k.as_str(), *v))
    }
}

/// One tick's worth of values: a timestamp plus one optional slot per
/// schema column. Created and discarded each tick.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: String,
    values: Vec<Option<f64>>,
}

impl Record {
    /// Values in schema column order.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Value of a schema key, `None` when absent this tick.
    pub fn get(&self, schema: &Schema, key: &str) -> Option<f64> {
        schema.index_of(key).and_then(|i| self.values[i])
    }
}
