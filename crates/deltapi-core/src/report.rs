//! Per-action and per-run reports

use crate::action::Action;
use crate::compare::compare;
use crate::result::ActionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an action within a run
///
/// ```text
/// Waiting → Running → Success
///                   ↘ Failure
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReportStatus {
    #[default]
    Waiting,
    Running,
    Success,
    Failure,
}

impl ReportStatus {
    /// Whether both results are in and the status can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Success | ReportStatus::Failure)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportStatus::Waiting => "Waiting",
            ReportStatus::Running => "Running",
            ReportStatus::Success => "Success",
            ReportStatus::Failure => "Failure",
        };
        f.pad(name)
    }
}

/// Report for one action: its status and, once run, both servers' results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    action: Action,
    status: ReportStatus,
    result_a: Option<ActionResult>,
    result_b: Option<ActionResult>,
}

impl ActionReport {
    /// A freshly loaded action that has not been dispatched yet
    pub fn waiting(action: Action) -> Self {
        Self {
            action,
            status: ReportStatus::Waiting,
            result_a: None,
            result_b: None,
        }
    }

    /// A finished action; the status is derived from the two results
    pub fn completed(action: Action, result_a: ActionResult, result_b: ActionResult) -> Self {
        compare(action, result_a, result_b)
    }

    /// A finished action whose status was already derived from its results
    pub(crate) fn terminal(
        action: Action,
        status: ReportStatus,
        result_a: ActionResult,
        result_b: ActionResult,
    ) -> Self {
        Self {
            action,
            status,
            result_a: Some(result_a),
            result_b: Some(result_b),
        }
    }

    /// Mark a waiting action as dispatched; results from an earlier run are cleared
    pub fn mark_running(&mut self) {
        self.status = ReportStatus::Running;
        self.result_a = None;
        self.result_b = None;
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn result_a(&self) -> Option<&ActionResult> {
        self.result_a.as_ref()
    }

    pub fn result_b(&self) -> Option<&ActionResult> {
        self.result_b.as_ref()
    }
}

/// Counts of action statuses in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub success: usize,
    pub failure: usize,
    pub waiting: usize,
    pub total: usize,
}

impl ReportSummary {
    /// Whether every action ran and matched
    pub fn all_passed(&self) -> bool {
        self.success == self.total
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} passed, {} failed, {} not run",
            self.success, self.total, self.failure, self.waiting
        )
    }
}

/// Outcome of a full or partial run
///
/// Reports appear in input order. Actions left unrun by a stop stay `Waiting`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    reports: Vec<ActionReport>,
}

impl Report {
    pub fn new(begin: DateTime<Utc>, end: DateTime<Utc>, reports: Vec<ActionReport>) -> Self {
        Self {
            begin,
            end,
            reports,
        }
    }

    pub fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn reports(&self) -> &[ActionReport] {
        &self.reports
    }

    /// Wall-clock time between begin and end
    pub fn total_time(&self) -> chrono::Duration {
        self.end - self.begin
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.reports.len(),
            ..ReportSummary::default()
        };
        for report in &self.reports {
            match report.status() {
                ReportStatus::Success => summary.success += 1,
                ReportStatus::Failure => summary.failure += 1,
                ReportStatus::Waiting | ReportStatus::Running => summary.waiting += 1,
            }
        }
        summary
    }
}
