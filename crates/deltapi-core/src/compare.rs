//! Response comparison
//!
//! Two results are equivalent when their status codes match (a missing code
//! matches only another missing code) and their contents serialize to the same
//! canonical JSON text. Content is only serialized once the status codes agree.
//!
//! The canonical form is the compact `serde_json` serialization of the content
//! as it was received. Object keys keep the order the server sent them, so two
//! semantically equal payloads with different key order do not match.

use crate::action::Action;
use crate::report::{ActionReport, ReportStatus};
use crate::result::ActionResult;
use serde_json::Value;
use std::fmt;

/// Why two results were judged different
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    StatusCode { a: Option<u16>, b: Option<u16> },
    Content { a: String, b: String },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn code(code: &Option<u16>) -> String {
            code.map(|c| c.to_string())
                .unwrap_or_else(|| "none".to_string())
        }

        match self {
            Mismatch::StatusCode { a, b } => {
                write!(f, "status code differs: A={} B={}", code(a), code(b))
            }
            Mismatch::Content { a, b } => write!(f, "content differs: A={} B={}", a, b),
        }
    }
}

/// Canonical textual form of a result's content; absent content is `null`
pub fn canonical_json(content: Option<&Value>) -> String {
    match content {
        Some(value) => value.to_string(),
        None => Value::Null.to_string(),
    }
}

/// Find the first difference between two results, if any
pub fn mismatch(a: &ActionResult, b: &ActionResult) -> Option<Mismatch> {
    if a.status_code() != b.status_code() {
        return Some(Mismatch::StatusCode {
            a: a.status_code(),
            b: b.status_code(),
        });
    }

    let canonical_a = canonical_json(a.content());
    let canonical_b = canonical_json(b.content());
    if canonical_a != canonical_b {
        return Some(Mismatch::Content {
            a: canonical_a,
            b: canonical_b,
        });
    }

    None
}

/// Terminal status for a pair of results
pub fn derive_status(a: &ActionResult, b: &ActionResult) -> ReportStatus {
    status_of(mismatch(a, b).as_ref())
}

fn status_of(diff: Option<&Mismatch>) -> ReportStatus {
    match diff {
        None => ReportStatus::Success,
        Some(_) => ReportStatus::Failure,
    }
}

/// Build the terminal report for an action from its two results
pub fn compare(action: Action, a: ActionResult, b: ActionResult) -> ActionReport {
    compare_with_diff(action, a, b).0
}

/// Like [`compare`], also returning the difference that caused a failure
///
/// The results are compared once; the status is derived from that comparison.
pub fn compare_with_diff(
    action: Action,
    a: ActionResult,
    b: ActionResult,
) -> (ActionReport, Option<Mismatch>) {
    let diff = mismatch(&a, &b);
    let report = ActionReport::terminal(action, status_of(diff.as_ref()), a, b);
    (report, diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{ErrorEnvelope, ErrorKind};
    use serde_json::json;
    use std::time::Duration;

    fn ok(status: u16, content: Value) -> ActionResult {
        ActionResult::new(Duration::from_millis(5), status, Some(content))
    }

    #[test]
    fn test_same_status_same_content_is_success() {
        let a = ok(200, json!({"a": 1}));
        let b = ok(200, json!({"a": 1}));
        assert_eq!(mismatch(&a, &b), None);
        assert_eq!(derive_status(&a, &b), ReportStatus::Success);
    }

    #[test]
    fn test_status_mismatch_is_failure() {
        let a = ok(200, json!({"a": 1}));
        let b = ok(404, json!({"a": 1}));
        assert_eq!(
            mismatch(&a, &b),
            Some(Mismatch::StatusCode {
                a: Some(200),
                b: Some(404)
            })
        );
        assert_eq!(derive_status(&a, &b), ReportStatus::Failure);
    }

    #[test]
    fn test_content_mismatch_is_failure() {
        let a = ok(200, json!({"a": 1}));
        let b = ok(200, json!({"a": 2}));
        assert_eq!(
            mismatch(&a, &b),
            Some(Mismatch::Content {
                a: r#"{"a":1}"#.to_string(),
                b: r#"{"a":2}"#.to_string(),
            })
        );
        assert_eq!(derive_status(&a, &b), ReportStatus::Failure);
    }

    #[test]
    fn test_absent_status_equals_absent_status() {
        let error = ErrorEnvelope::new(ErrorKind::Timeout, "timed out");
        let a = ActionResult::failed(Duration::from_millis(1), error.clone());
        let b = ActionResult::failed(Duration::from_millis(9), error);
        assert_eq!(derive_status(&a, &b), ReportStatus::Success);
    }

    #[test]
    fn test_failed_call_never_matches_real_response() {
        let a = ok(200, json!({"a": 1}));
        let b = ActionResult::failed(
            Duration::ZERO,
            ErrorEnvelope::new(ErrorKind::Connect, "refused"),
        );
        assert!(matches!(
            mismatch(&a, &b),
            Some(Mismatch::StatusCode { b: None, .. })
        ));
    }

    #[test]
    fn test_absent_content_equals_null_content() {
        let a = ActionResult::new(Duration::ZERO, 204, None);
        let b = ActionResult::new(Duration::ZERO, 204, Some(Value::Null));
        assert_eq!(derive_status(&a, &b), ReportStatus::Success);
    }

    #[test]
    fn test_key_order_is_significant() {
        let a: Value = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
        let a = ok(200, a);
        let b = ok(200, b);
        assert_eq!(derive_status(&a, &b), ReportStatus::Failure);
    }

    #[test]
    fn test_canonical_json_is_compact() {
        let value = json!({"name": "AAAA", "ids": [1, 2]});
        assert_eq!(canonical_json(Some(&value)), r#"{"name":"AAAA","ids":[1,2]}"#);
        assert_eq!(canonical_json(None), "null");
    }

    #[test]
    fn test_mismatch_display() {
        let m = Mismatch::StatusCode {
            a: Some(200),
            b: None,
        };
        assert_eq!(m.to_string(), "status code differs: A=200 B=none");
    }

    #[test]
    fn test_compare_builds_terminal_report() {
        let action = Action::new(crate::Verb::Get, "/api/Meth1");
        let report = compare(action.clone(), ok(200, json!([1])), ok(200, json!([1])));
        assert_eq!(report.action(), &action);
        assert_eq!(report.status(), ReportStatus::Success);
        assert!(report.result_a().is_some() && report.result_b().is_some());
    }

    #[test]
    fn test_compare_with_diff_matches_status() {
        let action = Action::new(crate::Verb::Get, "/api/Meth1");

        let (report, diff) =
            compare_with_diff(action.clone(), ok(200, json!(1)), ok(500, json!(1)));
        assert_eq!(report.status(), ReportStatus::Failure);
        assert_eq!(
            diff,
            Some(Mismatch::StatusCode {
                a: Some(200),
                b: Some(500)
            })
        );

        let (report, diff) = compare_with_diff(action, ok(200, json!(1)), ok(200, json!(1)));
        assert_eq!(report.status(), ReportStatus::Success);
        assert_eq!(diff, None);
    }
}
