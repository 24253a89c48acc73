use crate::http_probe::result::{ProbeResult, Status};

use super::aggregator::{DomainAggregator, percentage};

/// Outcomes of a single cycle grouped by domain, in first-seen order.
#[derive(Debug, Default)]
pub struct CycleResult {
    domains: Vec<(String, Vec<Status>)>,
}

impl CycleResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, domain: &str, status: Status) {
        match self.domains.iter_mut().find(|(d, _)| d == domain) {
            Some((_, outcomes)) => outcomes.push(status),
            None => self.domains.push((domain.to_string(), vec![status])),
        }
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|(d, _)| d.as_str())
    }

    /// Availability within this cycle only.
    pub fn percentage(&self, domain: &str) -> Option<u8> {
        self.domains
            .iter()
            .find(|(d, _)| d == domain)
            .map(|(_, outcomes)| {
                let up = outcomes.iter().filter(|s| s.is_up()).count() as u64;
                percentage(up, outcomes.len() as u64)
            })
    }

    /// Fold every outcome of this cycle into the lifetime counts.
    pub fn record_into(&self, aggregator: &mut DomainAggregator) {
        for (domain, outcomes) in &self.domains {
            for status in outcomes {
                aggregator.record(domain, *status);
            }
        }
    }
}

impl<'a> FromIterator<&'a ProbeResult> for CycleResult {
    fn from_iter<I: IntoIterator<Item = &'a ProbeResult>>(iter: I) -> Self {
        let mut cycle = CycleResult::new();
        for result in iter {
            cycle.push(&result.domain, result.status);
        }
        cycle
    }
}
