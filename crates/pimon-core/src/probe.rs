//! Abstract source probe trait.
//!
//! Every telemetry subsystem (CPU counters, the firmware tool, the hwmon
//! tree, ...) implements [`Probe`]. A probe queries one subsystem and returns
//! whatever metric keys it could read this tick; it never fails visibly.

use std::collections::BTreeMap;

/// Partial mapping from metric key to value produced by one probe invocation.
///
/// A key that a probe could not read this tick is simply absent — absence
/// means "not available", never zero.
pub type Readings = BTreeMap<String, f64>;

/// Trait that every source probe implements.
pub trait Probe: Send + Sync {
    /// Stable source name, used as the metric-key namespace prefix.
    fn name(&self) -> &'static str;

    /// Check whether this subsystem can be queried on this host.
    ///
    /// Evaluated once, before the schema is frozen; an unavailable probe is
    /// dropped for the whole run rather than re-checked every tick.
    fn is_available(&self) -> bool;

    /// Query the subsystem. Infallible by contract: any internal error
    /// (missing file, spawn failure, malformed text) reduces to omitting the
    /// affected keys, never to a panic or error return.
    fn collect(&self) -> Readings;
}
