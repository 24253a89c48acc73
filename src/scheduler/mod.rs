//! The cycle loop.
//!
//! One cycle probes every endpoint, folds the outcomes into the lifetime
//! [`DomainAggregator`], prints the summary and then waits for the next cycle.
//! Cancellation arrives through a `watch` channel and is checked before each
//! cycle, after each cycle and during the wait between cycles.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Client;
use tokio::sync::watch;
use tokio::task::JoinError;
use tokio::time::sleep;

use crate::availability::{CycleResult, DomainAggregator};
use crate::config::EndpointDescriptor;
use crate::http_probe::prelude::*;
use crate::report;

/// Pause between the end of one cycle and the start of the next.
pub const CYCLE_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    RunningCycle,
    Sleeping,
    Terminated,
}

pub struct CycleScheduler {
    client: Client,
    endpoints: Vec<EndpointDescriptor>,
    aggregator: DomainAggregator,
    interval: Duration,
    cycle_count: u64,
    state: SchedulerState,
}

impl CycleScheduler {
    /// `interval` is the pause between cycles, normally [`CYCLE_INTERVAL`].
    pub fn new(client: Client, endpoints: Vec<EndpointDescriptor>, interval: Duration) -> Self {
        Self {
            client,
            endpoints,
            aggregator: DomainAggregator::new(),
            interval,
            cycle_count: 0,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of cycles started so far. Numbering starts at 1 and never resets.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Lifetime counts, the only view of them outside the cycle report.
    pub fn aggregator(&self) -> &DomainAggregator {
        &self.aggregator
    }

    /// Run cycles until `shutdown` flips to `true` (or its sender goes away).
    /// Returns the number of completed cycles.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        log::info!(
            "Probing {} endpoint(s) every {}s",
            self.endpoints.len(),
            self.interval.as_secs()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.run_cycle().await;

            if *shutdown.borrow() {
                break;
            }

            self.state = SchedulerState::Sleeping;
            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    log::info!("Shutdown requested while sleeping");
                    break;
                }
            }
        }

        self.state = SchedulerState::Terminated;
        self.cycle_count
    }

    /// Run the loop on a background task until `signal` resolves, then wait for the
    /// cycle in flight to finish. Returns the stopped scheduler and whether the signal fired.
    ///
    /// If `signal` fails the loop keeps running and this only returns when the task ends.
    pub async fn run_until<F>(mut self, signal: F) -> Result<(Self, bool), JoinError>
    where
        F: Future<Output = std::io::Result<()>>,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            self.run(shutdown_rx).await;
            self
        });

        let signalled = match signal.await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
                true
            }
            Err(e) => {
                log::error!("Unable to listen for shutdown signal: {e}");
                false
            }
        };

        let scheduler = handle.await?;
        Ok((scheduler, signalled))
    }

    /// Run one full cycle: probe, aggregate, report.
    ///
    /// Probes run as separate tasks but are joined in configuration order, so the probe
    /// lines and the domain order of the summary do not depend on which probe finished first.
    pub async fn run_cycle(&mut self) -> Vec<ProbeResult> {
        self.state = SchedulerState::RunningCycle;
        self.cycle_count += 1;
        let cycle_number = self.cycle_count;
        let started_at = Utc::now();
        let start = Instant::now();
        log::info!("Cycle #{cycle_number} started at {}", started_at.to_rfc3339());

        let handles: Vec<_> = self
            .endpoints
            .iter()
            .map(|endpoint| {
                let client = self.client.clone();
                let endpoint = endpoint.clone();
                tokio::spawn(async move { probe_endpoint(&client, &endpoint).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (handle, endpoint) in handles.into_iter().zip(&self.endpoints) {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    log::error!("Probe task for {} failed: {e}", endpoint.label());
                    failed_probe(endpoint, e.to_string())
                }
            };
            if let Some(e) = &result.error {
                log::debug!("Probe error for {}: {e}", endpoint.label());
            }
            report::print_probe(&result);
            results.push(result);
        }

        let cycle: CycleResult = results.iter().collect();
        cycle.record_into(&mut self.aggregator);

        for domain in cycle.domains() {
            if let Some(stats) = self.aggregator.stats(domain) {
                log::debug!(
                    "Cycle #{cycle_number}: {domain} at {}% this cycle, {}/{} UP lifetime",
                    cycle.percentage(domain).unwrap_or_default(),
                    stats.up_count,
                    stats.total_count
                );
            }
        }

        report::print_summary(cycle_number, &cycle, &self.aggregator);
        log::info!(
            "Cycle #{cycle_number} finished in {:.2}s",
            start.elapsed().as_secs_f64()
        );

        results
    }
}

fn failed_probe(endpoint: &EndpointDescriptor, error: String) -> ProbeResult {
    ProbeResult {
        url: endpoint.raw_url.clone(),
        domain: endpoint.domain().to_string(),
        http_status: None,
        latency: Duration::ZERO,
        status: Status::Down,
        error: Some(error),
    }
}
