//! Histogram families with dynamic label values.
//!
//! Bucket counts are cumulative as required by the exposition format; sums
//! are `f64` carried in an `AtomicU64` as raw bits and updated with a CAS
//! loop, so observation stays lock-free.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::format_series_labels;

#[derive(Debug)]
struct Series {
    bucket_counts: Vec<AtomicU64>,
    count: AtomicU64,
    sum_bits: AtomicU64,
}

impl Series {
    fn new(buckets: usize) -> Self {
        Self {
            bucket_counts: (0..buckets).map(|_| AtomicU64::new(0)).collect(),
            count: AtomicU64::new(0),
            sum_bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    fn observe(&self, bounds: &[f64], value: f64) {
        // Cumulative buckets: every bound >= value gets the observation.
        for (i, &le) in bounds.iter().enumerate() {
            if value <= le {
                self.bucket_counts[i].fetch_add(1, Ordering::Relaxed);
            }
        }
        self.count.fetch_add(1, Ordering::Relaxed);

        let mut cur = self.sum_bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + value).to_bits();
            match self
                .sum_bits
                .compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(now) => cur = now,
            }
        }
    }

    fn sum(&self) -> f64 {
        f64::from_bits(self.sum_bits.load(Ordering::Relaxed))
    }
}

/// Point-in-time view of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    pub sum: f64,
    pub count: u64,
    /// Cumulative per-bucket counts, one per configured bound.
    pub buckets: Vec<u64>,
}

/// A named histogram keyed by label values, with fixed ascending bucket
/// bounds and an implicit `+Inf` bucket.
#[derive(Debug)]
pub struct HistogramFamily {
    name: String,
    help: String,
    label_names: Vec<String>,
    bounds: Vec<f64>,
    series: DashMap<Vec<String>, Series>,
}

impl HistogramFamily {
    pub(crate) fn new(name: &str, help: &str, label_names: &[&str], bounds: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
            bounds: bounds.to_vec(),
            series: DashMap::new(),
        }
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn buckets(&self) -> &[f64] {
        &self.bounds
    }

    /// Record one observation. Samples with the wrong label arity, or values
    /// that would break sum monotonicity (negative, NaN, infinite), are
    /// dropped with a warning.
    pub(crate) fn observe(&self, label_values: &[&str], value: f64) {
        if label_values.len() != self.label_names.len() {
            tracing::warn!(
                metric = %self.name,
                expected = self.label_names.len(),
                got = label_values.len(),
                "label arity mismatch, sample dropped"
            );
            return;
        }
        if !value.is_finite() || value < 0.0 {
            tracing::warn!(metric = %self.name, value, "non-finite or negative observation dropped");
            return;
        }
        let key: Vec<String> = label_values.iter().map(|s| s.to_string()).collect();
        self.series
            .entry(key)
            .or_insert_with(|| Series::new(self.bounds.len()))
            .observe(&self.bounds, value);
    }

    /// Snapshot one series, or `None` if it was never observed.
    pub fn snapshot(&self, label_values: &[&str]) -> Option<HistogramSnapshot> {
        let key: Vec<String> = label_values.iter().map(|s| s.to_string()).collect();
        self.series.get(&key).map(|s| HistogramSnapshot {
            sum: s.sum(),
            count: s.count.load(Ordering::Relaxed),
            buckets: s
                .bucket_counts
                .iter()
                .map(|b| b.load(Ordering::Relaxed))
                .collect(),
        })
    }

    /// Render in Prometheus text exposition format: `_bucket` lines per
    /// bound plus `+Inf`, then `_sum` and `_count`, series sorted by label
    /// values.
    pub(crate) fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} histogram", self.name);

        let mut keys: Vec<Vec<String>> = self.series.iter().map(|e| e.key().clone()).collect();
        keys.sort();

        for key in keys {
            let Some(series) = self.series.get(&key) else {
                continue;
            };
            let label_str = format_series_labels(&self.label_names, &key);
            let prefix = if label_str.is_empty() {
                String::new()
            } else {
                format!("{label_str},")
            };

            for (i, &le) in self.bounds.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{}_bucket{{{}le=\"{}\"}} {}",
                    self.name,
                    prefix,
                    le,
                    series.bucket_counts[i].load(Ordering::Relaxed)
                );
            }
            let count = series.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", self.name, prefix, count);

            if label_str.is_empty() {
                let _ = writeln!(out, "{}_sum {}", self.name, series.sum());
                let _ = writeln!(out, "{}_count {}", self.name, count);
            } else {
                let _ = writeln!(out, "{}_sum{{{}}} {}", self.name, label_str, series.sum());
                let _ = writeln!(out, "{}_count{{{}}} {}", self.name, label_str, count);
            }
        }
    }
}

/// Cheap cloneable handle to a registered histogram family.
#[derive(Clone, Debug)]
pub struct HistogramHandle {
    family: Arc<HistogramFamily>,
}

impl HistogramHandle {
    pub(crate) fn new(family: Arc<HistogramFamily>) -> Self {
        Self { family }
    }

    /// Record one observation for the series identified by `label_values`.
    pub fn observe(&self, label_values: &[&str], value: f64) {
        self.family.observe(label_values, value);
    }

    /// Snapshot one series, or `None` if it was never observed.
    pub fn snapshot(&self, label_values: &[&str]) -> Option<HistogramSnapshot> {
        self.family.snapshot(label_values)
    }
}
