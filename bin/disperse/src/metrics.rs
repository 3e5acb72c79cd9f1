//! Prometheus metrics for the disperse client.
//!
//! One submission is one sample: [`Metrics::record_submission`] is called
//! once per `submit`, whatever its outcome.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;
use workflow::{DisperseError, DisperseOutcome};

/// Aggregated metrics for the disperse client.
///
/// Metrics are registered with the global metrics registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "disperse_submissions_total",
            "Total number of disperse submissions started"
        );
        describe_counter!(
            "disperse_success_total",
            "Total number of confirmed disperse transactions"
        );
        describe_counter!(
            "disperse_failure_total",
            "Total failed submissions by error kind and phase"
        );
        describe_counter!(
            "disperse_approvals_total",
            "Total number of approval transactions confirmed"
        );
        describe_counter!(
            "disperse_recipients_total",
            "Total number of recipients paid"
        );
        describe_histogram!(
            "disperse_duration_seconds",
            "Duration of each submission in seconds"
        );
    }

    /// Record the result of one submission.
    pub fn record_submission(
        &self,
        result: &Result<DisperseOutcome, DisperseError>,
        duration: Duration,
    ) {
        counter!("disperse_submissions_total").increment(1);
        histogram!("disperse_duration_seconds").record(duration.as_secs_f64());

        match result {
            Ok(outcome) => {
                counter!("disperse_success_total").increment(1);
                counter!("disperse_recipients_total").increment(outcome.recipients as u64);
                if outcome.approval.is_some() {
                    counter!("disperse_approvals_total").increment(1);
                }
            }
            Err(err) => {
                let phase = if err.is_validation() { "validation" } else { "chain" };
                counter!(
                    "disperse_failure_total",
                    "kind" => err.kind().as_str(),
                    "phase" => phase
                )
                .increment(1);
            }
        }
    }
}

/// Serve `/metrics` on `0.0.0.0:port`.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(std::net::SocketAddr::from(([0, 0, 0, 0], port)))
        .install()
        .map_err(|e| eyre::eyre!("Cannot serve metrics on port {port}: {e}"))
}
