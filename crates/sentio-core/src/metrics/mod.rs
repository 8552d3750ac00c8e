//! In-process metrics registry.
//!
//! Counter and histogram families with declared label names, backed by
//! `DashMap` and atomics. Recording is lock-free per series; rendering
//! produces the Prometheus text exposition format (v0.0.4) with families
//! and series sorted so the output is deterministic.
//!
//! Recording through a handle is best-effort: a sample with the wrong label
//! arity or a non-finite value is dropped with a warning, never an error.
//! Registration is the only fallible operation.

pub mod counter;
pub mod histogram;

pub use counter::{CounterFamily, CounterHandle};
pub use histogram::{HistogramFamily, HistogramHandle, HistogramSnapshot};

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{Result, SentioError};

/// Escape label values per the exposition format.
pub(crate) fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// `name="value"` pairs joined with commas, in declared label order.
pub(crate) fn format_series_labels(names: &[String], values: &[String]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn same_labels(declared: &[String], requested: &[&str]) -> bool {
    declared.len() == requested.len() && declared.iter().zip(requested).all(|(a, b)| a == b)
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SentioError::Config("metric name must not be empty".into()));
    }
    Ok(())
}

fn validate_label_names(label_names: &[&str]) -> Result<()> {
    if label_names.iter().any(|l| l.is_empty()) {
        return Err(SentioError::Config("label names must not be empty".into()));
    }
    Ok(())
}

enum Family {
    Counter(Arc<CounterFamily>),
    Histogram(Arc<HistogramFamily>),
}

/// Process-wide registry of named metric families.
#[derive(Default)]
pub struct MetricsRegistry {
    families: DashMap<String, Family>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a counter family, or return a handle to an existing one with
    /// an identical definition. An incompatible re-registration fails.
    pub fn register_counter(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
    ) -> Result<CounterHandle> {
        validate_name(name)?;
        validate_label_names(label_names)?;

        match self.families.entry(name.to_string()) {
            Entry::Occupied(e) => match e.get() {
                Family::Counter(f) if same_labels(f.label_names(), label_names) => {
                    Ok(CounterHandle::new(Arc::clone(f)))
                }
                _ => Err(SentioError::Config(format!(
                    "metric {name} already registered with an incompatible definition"
                ))),
            },
            Entry::Vacant(v) => {
                let f = Arc::new(CounterFamily::new(name, help, label_names));
                v.insert(Family::Counter(Arc::clone(&f)));
                Ok(CounterHandle::new(f))
            }
        }
    }

    /// Register a histogram family. `buckets` are ascending finite upper
    /// bounds; an implicit `+Inf` bucket catches everything above the last.
    pub fn register_histogram(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
        buckets: &[f64],
    ) -> Result<HistogramHandle> {
        validate_name(name)?;
        validate_label_names(label_names)?;
        if buckets.is_empty() {
            return Err(SentioError::Config(format!(
                "metric {name}: bucket list must not be empty"
            )));
        }
        if buckets.iter().any(|b| !b.is_finite()) {
            return Err(SentioError::Config(format!(
                "metric {name}: bucket bounds must be finite"
            )));
        }
        if buckets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SentioError::Config(format!(
                "metric {name}: bucket bounds must be strictly ascending"
            )));
        }

        match self.families.entry(name.to_string()) {
            Entry::Occupied(e) => match e.get() {
                Family::Histogram(f)
                    if same_labels(f.label_names(), label_names) && f.buckets() == buckets =>
                {
                    Ok(HistogramHandle::new(Arc::clone(f)))
                }
                _ => Err(SentioError::Config(format!(
                    "metric {name} already registered with an incompatible definition"
                ))),
            },
            Entry::Vacant(v) => {
                let f = Arc::new(HistogramFamily::new(name, help, label_names, buckets));
                v.insert(Family::Histogram(Arc::clone(&f)));
                Ok(HistogramHandle::new(f))
            }
        }
    }

    /// Render every family in Prometheus text exposition format.
    ///
    /// Only atomic loads and short map reads happen here; writers are never
    /// blocked for the duration of a render.
    pub fn render(&self) -> String {
        let mut names: Vec<String> = self.families.iter().map(|e| e.key().clone()).collect();
        names.sort();

        let mut out = String::with_capacity(1024);
        for name in names {
            if let Some(family) = self.families.get(&name) {
                match family.value() {
                    Family::Counter(f) => f.render(&mut out),
                    Family::Histogram(f) => f.render(&mut out),
                }
            }
        }
        out
    }
}
