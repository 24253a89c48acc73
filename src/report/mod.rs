use std::fmt::Write;

use crate::availability::{CycleResult, DomainAggregator};
use crate::http_probe::result::ProbeResult;

const SEPARATOR_WIDTH: usize = 75;

/// One line per probe: URL, status code, latency and the resulting classification.
pub fn format_probe_line(result: &ProbeResult) -> String {
    let code = result
        .http_status
        .map(|c| c.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "{} - Status Code:{}, Latency:{:.2}ms --> Status = {}",
        result.url,
        code,
        result.latency_ms(),
        result.status
    )
}

/// Lifetime availability for every domain probed in this cycle, in the cycle's first-seen order.
pub fn summary_rows(cycle: &CycleResult, aggregator: &DomainAggregator) -> Vec<(String, u8)> {
    cycle
        .domains()
        .filter_map(|domain| Some((domain.to_string(), aggregator.percentage(domain)?)))
        .collect()
}

pub fn format_summary(cycle_number: u64, rows: &[(String, u8)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Results after Test cycle #{cycle_number} ends:");
    let _ = writeln!(out);
    for (domain, percentage) in rows {
        let _ = writeln!(out, "{domain} has {percentage}% availability percentage");
    }
    let _ = write!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
    out
}

pub fn print_probe(result: &ProbeResult) {
    println!("{}", format_probe_line(result));
}

pub fn print_summary(cycle_number: u64, cycle: &CycleResult, aggregator: &DomainAggregator) {
    println!(
        "{}",
        format_summary(cycle_number, &summary_rows(cycle, aggregator))
    );
}
