//! Plain-text trend table over a run.

use std::collections::BTreeMap;

use crate::leak::{RunLog, delta};

#[derive(Debug, Default)]
struct Trend {
    first: u64,
    last: u64,
    samples: usize,
    growths: usize,
}

/// One row per tracked type seen during the run: first and last count, net
/// change, and in how many consecutive iteration pairs the count went up.
///
/// A type missing from the iteration just before is a fresh baseline, not growth.
pub fn render_trend(run_log: &RunLog) -> String {
    if run_log.is_empty() {
        return "=== Leak Trend ===\nNo iterations recorded.\n".to_string();
    }

    let mut trends: BTreeMap<&str, Trend> = BTreeMap::new();
    let mut previous = None;
    for iteration in run_log {
        for (name, item) in &iteration.leaks {
            let trend = trends.entry(name.as_str()).or_default();
            if trend.samples == 0 {
                trend.first = item.count;
            }
            if delta(item, previous).is_some_and(|d| d > 0) {
                trend.growths += 1;
            }
            trend.last = item.count;
            trend.samples += 1;
        }
        previous = Some(iteration);
    }

    let mut out = String::from("=== Leak Trend ===\n");
    out.push_str(&format!("Iterations:         {}\n", run_log.len()));
    if trends.is_empty() {
        out.push_str("No tracked types observed.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<32} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
        "Type", "Samples", "First", "Last", "Delta", "Growths"
    ));
    out.push_str(&"-".repeat(78));
    out.push('\n');
    for (name, trend) in &trends {
        let delta = trend.last as i64 - trend.first as i64;
        out.push_str(&format!(
            "{:<32} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
            name,
            trend.samples,
            trend.first,
            trend.last,
            format!("{delta:+}"),
            trend.growths,
        ));
    }
    out
}
