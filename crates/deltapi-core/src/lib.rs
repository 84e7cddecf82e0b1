//! Core types for differential API testing
//!
//! This crate provides the data model shared by the engine and its front ends:
//! the recorded [`Action`], the per-server [`ActionResult`], the per-action
//! [`ActionReport`] and the run-level [`Report`]. It also holds the pure
//! response comparison rules, since an action report's terminal status is
//! derived from its two results and never set on its own.
//!
//! ```text
//!   Action ──► server A ──► ActionResult A ─┐
//!          └─► server B ──► ActionResult B ─┴─► compare ──► ActionReport
//! ```

mod action;
mod clock;
pub mod compare;
mod report;
mod result;

pub use action::{Action, ParseVerbError, Verb};
pub use clock::{Clock, SystemClock};
pub use compare::{
    canonical_json, compare, compare_with_diff, derive_status, mismatch, Mismatch,
};
pub use report::{ActionReport, Report, ReportStatus, ReportSummary};
pub use result::{ActionResult, ErrorEnvelope, ErrorKind};

/// Re-export of the JSON value type used for response content
pub use serde_json::Value;
