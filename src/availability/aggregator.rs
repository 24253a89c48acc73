use std::collections::HashMap;

use crate::http_probe::result::Status;

/// Lifetime UP/total counts for one domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStats {
    pub up_count: u64,
    pub total_count: u64,
}

impl DomainStats {
    pub fn record(&mut self, status: Status) {
        self.total_count += 1;
        if status.is_up() {
            self.up_count += 1;
        }
    }

    pub fn percentage(&self) -> u8 {
        percentage(self.up_count, self.total_count)
    }
}

/// One row of [`DomainAggregator::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAvailability {
    pub domain: String,
    pub up_count: u64,
    pub total_count: u64,
    pub percentage: u8,
}

/// Accumulates outcomes per domain for the lifetime of the process.
///
/// Counts are never reset. Domains are remembered in the order they were first recorded
/// so snapshots are stable.
#[derive(Debug, Default)]
pub struct DomainAggregator {
    stats: HashMap<String, DomainStats>,
    order: Vec<String>,
}

impl DomainAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, domain: &str, status: Status) {
        if !self.stats.contains_key(domain) {
            self.order.push(domain.to_string());
        }
        self.stats.entry(domain.to_string()).or_default().record(status);
    }

    pub fn stats(&self, domain: &str) -> Option<DomainStats> {
        self.stats.get(domain).copied()
    }

    /// Lifetime availability, `None` for a domain that was never probed.
    pub fn percentage(&self, domain: &str) -> Option<u8> {
        self.stats.get(domain).map(DomainStats::percentage)
    }

    pub fn snapshot(&self) -> Vec<DomainAvailability> {
        self.order
            .iter()
            .filter_map(|domain| {
                let stats = self.stats.get(domain)?;
                Some(DomainAvailability {
                    domain: domain.clone(),
                    up_count: stats.up_count,
                    total_count: stats.total_count,
                    percentage: stats.percentage(),
                })
            })
            .collect()
    }
}

/// `round(100 * up / total)` with halves rounded up, 0 when nothing was recorded.
/// Only a clean record reports 100; anything short of it is capped at 99.
pub fn percentage(up: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let up = up.min(total);
    let rounded = (200 * up + total) / (2 * total);
    if up < total { rounded.min(99) as u8 } else { rounded as u8 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(0, 1), 0);
        assert_eq!(percentage(1, 1), 100);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(199, 200), 99);
        assert_eq!(percentage(200, 200), 100);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_percentage_is_100_only_when_all_up() {
        for total in 1..=250u64 {
            for up in 0..=total {
                let pct = percentage(up, total);
                assert!(pct <= 100);
                assert_eq!(pct == 100, up == total, "{up}/{total}");
            }
        }
    }

    #[test]
    fn test_record_counts() {
        let mut aggregator = DomainAggregator::new();
        aggregator.record("fetch.com", Status::Up);
        aggregator.record("fetch.com", Status::Down);
        aggregator.record("www.fetchrewards.com", Status::Up);

        assert_eq!(
            aggregator.stats("fetch.com"),
            Some(DomainStats {
                up_count: 1,
                total_count: 2
            })
        );
        assert_eq!(aggregator.percentage("fetch.com"), Some(50));
        assert_eq!(aggregator.percentage("www.fetchrewards.com"), Some(100));
        assert_eq!(aggregator.percentage("unknown.com"), None);
        assert_eq!(aggregator.snapshot().len(), 2);
    }

    #[test]
    fn test_lifetime_up_down_up() {
        let mut aggregator = DomainAggregator::new();
        for status in [Status::Up, Status::Down, Status::Up] {
            aggregator.record("fetch.com", status);
            let stats = aggregator.stats("fetch.com").expect("recorded");
            assert!(stats.up_count <= stats.total_count);
        }
        assert_eq!(aggregator.percentage("fetch.com"), Some(67));
    }

    #[test]
    fn test_snapshot_first_seen_order() {
        let mut aggregator = DomainAggregator::new();
        assert!(aggregator.snapshot().is_empty());
        aggregator.record("b.com", Status::Down);
        aggregator.record("a.com", Status::Up);
        aggregator.record("b.com", Status::Up);

        let snapshot = aggregator.snapshot();
        let domains: Vec<&str> = snapshot.iter().map(|d| d.domain.as_str()).collect();
        assert_eq!(domains, ["b.com", "a.com"]);
        assert_eq!(
            snapshot[0],
            DomainAvailability {
                domain: "b.com".to_string(),
                up_count: 1,
                total_count: 2,
                percentage: 50,
            }
        );
    }
}
