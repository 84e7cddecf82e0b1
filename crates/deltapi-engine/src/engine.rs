//! Run controller and report aggregation
//!
//! The [`Engine`] owns the two clients and a clock for the duration of a run
//! and drives the action list one action at a time:
//!
//! 1. mark the report `Running` and notify the observer
//! 2. dispatch to A, then to B
//! 3. compare and store the terminal report, notify the observer again
//! 4. auto-pause on failure if enabled, otherwise wait the pacing delay
//!
//! Pause and stop requests arrive through [`RunControl`] and are honoured only
//! between actions.

use crate::client::{BasicHttpClient, HttpClient};
use crate::control::{RunControl, RunState, RunTicket};
use crate::dispatcher::dispatch_pair;
use crate::error::EngineResult;
use deltapi_config::{RunConfig, DEFAULT_DELAY_MS, DEFAULT_PAUSE_POLL_MS};
use deltapi_core::{
    compare_with_diff, Action, ActionReport, Clock, Report, ReportStatus, SystemClock,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pacing and failure policy of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Wait between two completed actions
    pub delay: Duration,
    /// Pause automatically after an action fails
    pub pause_after_failure: bool,
    /// How often a paused run re-reads its control state
    pub pause_poll_interval: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            pause_after_failure: false,
            pause_poll_interval: Duration::from_millis(DEFAULT_PAUSE_POLL_MS),
        }
    }
}

impl From<&RunConfig> for RunOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            delay: config.delay(),
            pause_after_failure: config.pause_after_failure,
            pause_poll_interval: config.pause_poll_interval(),
        }
    }
}

/// Differential test engine
pub struct Engine {
    client_a: Arc<dyn HttpClient>,
    client_b: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    options: RunOptions,
    control: RunControl,
}

impl Engine {
    /// Create an engine over two clients with the system clock and default options
    pub fn new(client_a: Arc<dyn HttpClient>, client_b: Arc<dyn HttpClient>) -> Self {
        Self {
            client_a,
            client_b,
            clock: Arc::new(SystemClock),
            options: RunOptions::default(),
            control: RunControl::new(),
        }
    }

    /// Build an engine with reqwest clients for the two configured servers
    pub fn from_config(config: &RunConfig) -> EngineResult<Self> {
        config.validate()?;

        let timeout = config.request_timeout();
        let client_a = BasicHttpClient::new("A", &config.server_a, timeout)?;
        let client_b = BasicHttpClient::new("B", &config.server_b, timeout)?;

        Ok(Self::new(Arc::new(client_a), Arc::new(client_b))
            .with_options(RunOptions::from(config)))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Handle for pausing, resuming and stopping runs of this engine
    pub fn control(&self) -> RunControl {
        self.control.clone()
    }

    /// Run a single action against both servers and compare the results
    pub async fn run_one(&self, action: &Action) -> ActionReport {
        let (result_a, result_b) =
            dispatch_pair(self.client_a.as_ref(), self.client_b.as_ref(), action).await;

        let (report, diff) = compare_with_diff(action.clone(), result_a, result_b);
        if let Some(diff) = diff {
            debug!(%action, %diff, "Responses differ");
        }
        report
    }

    /// Run every action in order and collect the report
    ///
    /// `on_report` is called synchronously with `(index, report)` when an
    /// action starts running and again when it completes. If the run is
    /// stopped, the remaining actions are reported as `Waiting`.
    ///
    /// Fails only if another run already holds this engine's controller.
    pub async fn run_all<F>(&self, actions: &[Action], mut on_report: F) -> EngineResult<Report>
    where
        F: FnMut(usize, &ActionReport) + Send,
    {
        let ticket = self.control.start()?;
        let _guard = FinishOnDrop {
            control: &self.control,
            ticket,
        };

        let begin = self.clock.now();
        let mut reports: Vec<ActionReport> =
            actions.iter().cloned().map(ActionReport::waiting).collect();
        info!(count = reports.len(), "Starting run");

        let mut index = 0;
        while index < reports.len() {
            match self.control.state_for(ticket) {
                RunState::Ready => {
                    let remaining = reports.len() - index;
                    info!(index, remaining, "Run stopped before completion");
                    break;
                }
                RunState::Paused => {
                    tokio::time::sleep(self.options.pause_poll_interval).await;
                    continue;
                }
                RunState::Running => {}
            }

            let report = &mut reports[index];
            report.mark_running();
            on_report(index, report);

            *report = self.run_one(&actions[index]).await;
            let status = report.status();
            debug!(index, action = %report.action(), %status, "Action completed");
            on_report(index, report);

            index += 1;

            if status == ReportStatus::Failure && self.options.pause_after_failure {
                if self.control.pause_run(ticket).is_ok() {
                    warn!(index = index - 1, "Pausing run after failure");
                }
            } else if index < reports.len() && !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }
        }

        let end = self.clock.now();
        let report = Report::new(begin, end, reports);
        info!(summary = %report.summary(), "Run finished");
        Ok(report)
    }
}

/// Returns the controller to `Ready` when a run ends, even if its future is dropped
struct FinishOnDrop<'a> {
    control: &'a RunControl,
    ticket: RunTicket,
}

impl Drop for FinishOnDrop<'_> {
    fn drop(&mut self) {
        self.control.finish(self.ticket);
    }
}
