//! HTTP liveness probe.

use serde::Serialize;
use std::time::Duration;

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The endpoint answered with a 2xx status.
    Reachable { status: u16 },
    /// Connection failed or the endpoint answered with an error status.
    Unreachable { reason: String },
    TimedOut,
}

impl ProbeOutcome {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Reachable { .. })
    }

    /// `running` or `stopped`.
    pub fn service_state(&self) -> &'static str {
        if self.is_running() {
            "running"
        } else {
            "stopped"
        }
    }
}

/// Probe result with the URL that was hit.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub url: String,
    pub state: &'static str,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

impl HealthReport {
    pub fn new(url: &str, outcome: ProbeOutcome) -> Self {
        Self {
            url: url.to_string(),
            state: outcome.service_state(),
            outcome,
        }
    }
}

/// GET `url` once, bounded by `timeout`. Never retries.
pub fn probe(url: &str, timeout: Duration) -> ProbeOutcome {
    // Local endpoint: proxy settings from the environment would only get in the way.
    let client = match reqwest::blocking::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .no_proxy()
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return ProbeOutcome::Unreachable {
                reason: e.to_string(),
            }
        }
    };

    tracing::debug!("Probing {} (timeout {:?})", url, timeout);
    let outcome = match client.get(url).send() {
        Ok(response) if response.status().is_success() => ProbeOutcome::Reachable {
            status: response.status().as_u16(),
        },
        Ok(response) => ProbeOutcome::Unreachable {
            reason: format!("HTTP {}", response.status()),
        },
        Err(e) if e.is_timeout() => ProbeOutcome::TimedOut,
        Err(e) if e.is_connect() => ProbeOutcome::Unreachable {
            reason: "connection refused".to_string(),
        },
        Err(e) => ProbeOutcome::Unreachable {
            reason: e.to_string(),
        },
    };
    tracing::debug!("Probe result: {:?}", outcome);
    outcome
}
