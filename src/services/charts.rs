//! Hardware distribution charts.
//!
//! Users are bucketed by CPU model, GPU model and rounded memory size. Each
//! category keeps its [`TOP_BUCKETS`] most frequent labels and folds the rest
//! into an `Other` bucket, then the buckets are laid out as pie segments.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{HardwareRecord, UNKNOWN_LABEL};
use crate::services::hardware::parse_hardware;
use crate::services::memory::memory_bucket_label;

pub const TOP_BUCKETS: usize = 7;
pub const OTHER_LABEL: &str = "Other";
pub const EMPTY_PLACEHOLDER: &str = "No users to chart.";

pub const PALETTE: [&str; 10] = [
    "#60a5fa", "#34d399", "#f472b6", "#fbbf24", "#a78bfa", "#f87171", "#22d3ee", "#86efac",
    "#fca5a5", "#c084fc",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBucket {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSegment {
    pub label: String,
    pub value: usize,
    pub color: &'static str,
    pub start_deg: i64,
    pub end_deg: i64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: &'static str,
    pub segments: Vec<ChartSegment>,
}

impl Chart {
    /// CSS `conic-gradient(...)` body for the pie.
    pub fn conic_gradient(&self) -> String {
        let stops: Vec<String> = self
            .segments
            .iter()
            .map(|s| format!("{} {}deg {}deg", s.color, s.start_deg, s.end_deg))
            .collect();
        format!("conic-gradient({})", stops.join(", "))
    }
}

/// The three per-category bucket lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HardwareDistribution {
    pub cpu: Vec<ChartBucket>,
    pub gpu: Vec<ChartBucket>,
    pub memory: Vec<ChartBucket>,
}

/// Count occurrences keeping first-seen order, which the stable sort in
/// [`bucketize`] then uses to break ties.
pub fn tally<I, S>(labels: I) -> Vec<ChartBucket>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<ChartBucket> = Vec::new();
    for label in labels {
        let label = label.into();
        match index.get(&label) {
            Some(&i) => buckets[i].value += 1,
            None => {
                index.insert(label.clone(), buckets.len());
                buckets.push(ChartBucket { label, value: 1 });
            }
        }
    }
    buckets
}

pub fn bucketize(mut buckets: Vec<ChartBucket>, top: usize) -> Vec<ChartBucket> {
    buckets.sort_by(|a, b| b.value.cmp(&a.value));
    if buckets.len() <= top {
        return buckets;
    }
    let rest: usize = buckets[top..].iter().map(|b| b.value).sum();
    buckets.truncate(top);
    buckets.push(ChartBucket { label: OTHER_LABEL.to_string(), value: rest });
    buckets
}

fn memory_label(hw: &HardwareRecord) -> String {
    hw.memory()
        .and_then(memory_bucket_label)
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

/// Bucket already parsed records.
pub fn distribution(records: &[HardwareRecord]) -> HardwareDistribution {
    HardwareDistribution {
        cpu: bucketize(tally(records.iter().map(|r| r.cpu_label())), TOP_BUCKETS),
        gpu: bucketize(tally(records.iter().map(|r| r.gpu_label())), TOP_BUCKETS),
        memory: bucketize(tally(records.iter().map(memory_label)), TOP_BUCKETS),
    }
}

/// Bucket raw `hardware` values straight from user payloads.
pub fn distribution_from_raw<'a, I>(raw: I) -> HardwareDistribution
where
    I: IntoIterator<Item = &'a serde_json::Value>,
{
    let records: Vec<HardwareRecord> = raw.into_iter().map(parse_hardware).collect();
    distribution(&records)
}

pub fn segments(buckets: &[ChartBucket]) -> Vec<ChartSegment> {
    let total = match buckets.iter().map(|b| b.value).sum::<usize>() {
        0 => 1,
        n => n,
    } as f64;
    let mut acc = 0.0_f64;
    buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let frac = b.value as f64 / total;
            let start_deg = (acc * 360.0).round() as i64;
            acc += frac;
            let end_deg = (acc * 360.0).round() as i64;
            ChartSegment {
                label: b.label.clone(),
                value: b.value,
                color: PALETTE[i % PALETTE.len()],
                start_deg,
                end_deg,
                percent: (frac * 1000.0).round() / 10.0,
            }
        })
        .collect()
}

impl HardwareDistribution {
    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty() && self.gpu.is_empty() && self.memory.is_empty()
    }

    pub fn charts(&self) -> Vec<Chart> {
        vec![
            Chart { title: "CPU Models", segments: segments(&self.cpu) },
            Chart { title: "GPU Models", segments: segments(&self.gpu) },
            Chart { title: "Memory (GB)", segments: segments(&self.memory) },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cpu_only(cpu: &str) -> serde_json::Value {
        json!({ "cpu": cpu })
    }

    #[test]
    fn nine_distinct_cpus_fold_into_other() {
        let raw: Vec<_> = (1..=9).map(|i| cpu_only(&format!("CPU {}", i))).collect();
        let dist = distribution_from_raw(raw.iter());
        assert_eq!(dist.cpu.len(), 8);
        let last = dist.cpu.last().unwrap();
        assert_eq!(last.label, OTHER_LABEL);
        assert_eq!(last.value, 2);
        assert_eq!(dist.cpu.iter().map(|b| b.value).sum::<usize>(), 9);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let buckets = bucketize(tally(["b", "a", "a", "c", "b"]), TOP_BUCKETS);
        let labels: Vec<_> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn memory_buckets_use_rounded_gigabytes() {
        let raw = vec![
            json!({"memory": "16777216"}),
            json!("CPU: i5. Memory: 16384"),
            json!({"cpu": "x"}),
            serde_json::Value::Null,
        ];
        let dist = distribution_from_raw(raw.iter());
        assert_eq!(dist.memory[0], ChartBucket { label: "Unknown".into(), value: 2 });
        assert_eq!(dist.memory[1], ChartBucket { label: "16 GB".into(), value: 1 });
        assert_eq!(dist.memory[2], ChartBucket { label: "16384 GB".into(), value: 1 });
        assert_eq!(dist.gpu, vec![ChartBucket { label: "Unknown".into(), value: 4 }]);
    }

    #[test]
    fn segment_angles_cover_the_circle() {
        let buckets = bucketize(tally(["a", "a", "a", "b", "b", "c", "d"]), TOP_BUCKETS);
        let segs = segments(&buckets);
        let span: i64 = segs.iter().map(|s| s.end_deg - s.start_deg).sum();
        assert!((span - 360).abs() <= segs.len() as i64);
        assert_eq!(segs[0].start_deg, 0);
        assert_eq!(segs.last().unwrap().end_deg, 360);
        for pair in segs.windows(2) {
            assert_eq!(pair[0].end_deg, pair[1].start_deg);
        }
        assert_eq!(segs[0].percent, 42.9);
        assert_eq!(segs[0].color, PALETTE[0]);
    }

    #[test]
    fn palette_cycles() {
        let buckets: Vec<_> = (0..12).map(|i| ChartBucket { label: i.to_string(), value: 1 }).collect();
        let segs = segments(&buckets);
        assert_eq!(segs[10].color, PALETTE[0]);
        assert_eq!(segs[11].color, PALETTE[1]);
    }

    #[test]
    fn empty_input_yields_no_segments() {
        let dist = distribution(&[]);
        assert!(dist.is_empty());
        assert!(segments(&dist.cpu).is_empty());
        let zero = segments(&[ChartBucket { label: "x".into(), value: 0 }]);
        assert_eq!(zero[0].end_deg, 0);
    }
}
