//! Prometheus-style counters for the runtime.
//!
//! A `CounterVec` keys its counters by the already-rendered label set
//! (`action="use_item",group="red"`), with label names sorted, so `get` and
//! the scrape output agree on identity and `/metrics` output is stable.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::command::CommandOutcome;
use crate::host::ActionKind;

/// `k="v"` pairs sorted by name, with `\`, `"` and newlines escaped.
fn render_labels(labels: &[(&str, &str)]) -> String {
    let mut pairs = labels.to_vec();
    pairs.sort_unstable_by_key(|(k, _)| *k);
    let mut out = String::new();
    for (i, (k, v)) in pairs.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(k);
        out.push_str("=\"");
        for ch in v.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                c => out.push(c),
            }
        }
        out.push('"');
    }
    out
}

#[derive(Default)]
pub struct CounterVec {
    series: DashMap<String, AtomicU64>,
}

impl CounterVec {
    pub fn add(&self, labels: &[(&str, &str)], n: u64) {
        self.series
            .entry(render_labels(labels))
            .or_default()
            .fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Value for an exact label set; untouched series read as 0.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.series
            .get(&render_labels(labels))
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    fn write_to(&self, name: &str, out: &mut String) {
        let mut series: Vec<(String, u64)> = self
            .series
            .iter()
            .map(|e| (e.key().clone(), e.value().load(Ordering::Relaxed)))
            .collect();
        series.sort_unstable();

        let _ = writeln!(out, "# TYPE {name} counter");
        for (labels, value) in series {
            let _ = writeln!(out, "{name}{{{labels}}} {value}");
        }
    }
}

#[derive(Default)]
pub struct RuntimeMetrics {
    /// Command outcomes by status.
    pub commands: CounterVec,
    /// Rejected actions by group and action.
    pub denials: CounterVec,
    /// Objects removed from actors by sweeps, by group.
    pub removed_objects: CounterVec,
}

impl RuntimeMetrics {
    pub fn record_command(&self, outcome: &CommandOutcome) {
        self.commands.inc(&[("status", outcome.status())]);
    }

    pub fn record_denial(&self, group: &str, action: ActionKind) {
        self.denials.inc(&[("group", group), ("action", action.as_str())]);
    }

    pub fn record_removed(&self, group: &str, n: u64) {
        if n > 0 {
            self.removed_objects.add(&[("group", group)], n);
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.commands.write_to("begone_commands_total", &mut out);
        self.denials.write_to("begone_denials_total", &mut out);
        self.removed_objects.write_to("begone_removed_objects_total", &mut out);
        out
    }
}
