//! Counter families with dynamic label values.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::format_series_labels;

/// A named, monotonically increasing counter keyed by label values.
#[derive(Debug)]
pub struct CounterFamily {
    name: String,
    help: String,
    label_names: Vec<String>,
    series: DashMap<Vec<String>, AtomicU64>,
}

impl CounterFamily {
    pub(crate) fn new(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
            series: DashMap::new(),
        }
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    /// Add `v` to the series identified by `label_values`, creating it at 0
    /// first if never observed. A sample with the wrong label arity is
    /// dropped with a warning.
    pub(crate) fn add(&self, label_values: &[&str], v: u64) {
        if label_values.len() != self.label_names.len() {
            tracing::warn!(
                metric = %self.name,
                expected = self.label_names.len(),
                got = label_values.len(),
                "label arity mismatch, sample dropped"
            );
            return;
        }
        let key: Vec<String> = label_values.iter().map(|s| s.to_string()).collect();
        self.series
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series; 0 if never incremented.
    pub fn value(&self, label_values: &[&str]) -> u64 {
        let key: Vec<String> = label_values.iter().map(|s| s.to_string()).collect();
        self.series
            .get(&key)
            .map(|s| s.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format, series sorted by label
    /// values for deterministic output.
    pub(crate) fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} counter", self.name);

        let mut rows: Vec<(Vec<String>, u64)> = self
            .series
            .iter()
            .map(|e| (e.key().clone(), e.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();

        for (values, v) in rows {
            if self.label_names.is_empty() {
                let _ = writeln!(out, "{} {}", self.name, v);
            } else {
                let _ = writeln!(
                    out,
                    "{}{{{}}} {}",
                    self.name,
                    format_series_labels(&self.label_names, &values),
                    v
                );
            }
        }
    }
}

/// Cheap cloneable handle to a registered counter family.
#[derive(Clone, Debug)]
pub struct CounterHandle {
    family: Arc<CounterFamily>,
}

impl CounterHandle {
    pub(crate) fn new(family: Arc<CounterFamily>) -> Self {
        Self { family }
    }

    /// Increment by 1.
    pub fn inc(&self, label_values: &[&str]) {
        self.family.add(label_values, 1);
    }

    /// Increment by an arbitrary amount.
    pub fn add(&self, label_values: &[&str], v: u64) {
        self.family.add(label_values, v);
    }

    /// Current value of one series; 0 if never incremented.
    pub fn value(&self, label_values: &[&str]) -> u64 {
        self.family.value(label_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(labels: &[&str]) -> CounterFamily {
        CounterFamily::new("test_total", "Test counter", labels)
    }

    #[test]
    fn increments_accumulate_per_series() {
        let f = family(&["endpoint"]);
        f.add(&["/predict"], 1);
        f.add(&["/predict"], 1);
        f.add(&["/"], 5);

        assert_eq!(f.value(&["/predict"]), 2);
        assert_eq!(f.value(&["/"]), 5);
        assert_eq!(f.value(&["/metrics"]), 0);
    }

    #[test]
    fn arity_mismatch_drops_sample() {
        let f = family(&["endpoint", "method"]);
        f.add(&["/predict"], 1);
        assert_eq!(f.value(&["/predict", "POST"]), 0);

        let mut out = String::new();
        f.render(&mut out);
        assert!(!out.contains("test_total{"), "no series may be created: {out}");
    }

    #[test]
    fn concurrent_increments_lose_nothing() {
        use std::thread;

        let f = Arc::new(family(&["endpoint"]));
        let mut handles = vec![];
        for _ in 0..8 {
            let f = Arc::clone(&f);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    f.add(&["/predict"], 1);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(f.value(&["/predict"]), 8_000);
    }
}
