//! Outcome of dispatching one action to one server

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Classification of a call that produced no usable response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Could not connect to the server
    Connect,
    /// The transport gave up waiting
    Timeout,
    /// Any other transport failure while sending the request
    Request,
    /// The response body could not be read
    Body,
    /// The response body was not valid JSON
    Deserialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Connect => write!(f, "connect"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Request => write!(f, "request"),
            ErrorKind::Body => write!(f, "body"),
            ErrorKind::Deserialization => write!(f, "deserialization"),
        }
    }
}

/// Structured error payload stored as content when a call fails
///
/// When a response did arrive but could not be decoded, the envelope also
/// keeps its status code and raw body, so two different undecodable
/// responses never look alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            body: None,
        }
    }

    /// Attach the response that was received before the failure
    pub fn with_response(mut self, status_code: u16, body: impl Into<String>) -> Self {
        self.status_code = Some(status_code);
        self.body = Some(body.into());
        self
    }

    /// Convert to the JSON object stored in [`ActionResult::content`]
    pub fn to_value(&self) -> Value {
        let mut value = serde_json::json!({
            "kind": self.kind,
            "message": self.message,
        });
        if let Some(status_code) = self.status_code {
            value["statusCode"] = status_code.into();
        }
        if let Some(body) = &self.body {
            value["body"] = body.as_str().into();
        }
        value
    }

    /// Recover an envelope from result content, if the content is one
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// Result of one call against one server
///
/// Produced once per (action, server) dispatch and never mutated afterwards.
/// A missing status code means the call failed before a response arrived;
/// the content then holds an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    #[serde(with = "duration_ms")]
    duration: Duration,
    status_code: Option<u16>,
    content: Option<Value>,
}

impl ActionResult {
    /// Result of a call that returned a response
    pub fn new(duration: Duration, status_code: u16, content: Option<Value>) -> Self {
        Self {
            duration,
            status_code: Some(status_code),
            content,
        }
    }

    /// Result of a call that failed; the status code is absent
    pub fn failed(duration: Duration, error: ErrorEnvelope) -> Self {
        Self {
            duration,
            status_code: None,
            content: Some(error.to_value()),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn content(&self) -> Option<&Value> {
        self.content.as_ref()
    }

    /// The error envelope, if this result records a failed call
    pub fn error(&self) -> Option<ErrorEnvelope> {
        if self.status_code.is_some() {
            return None;
        }
        self.content.as_ref().and_then(ErrorEnvelope::from_value)
    }
}

/// Serialize durations as fractional milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_nanos() as f64 / 1_000_000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = f64::deserialize(deserializer)?;
        if !millis.is_finite() || millis < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "invalid duration: {millis}"
            )));
        }
        Ok(Duration::from_nanos((millis * 1_000_000.0).round() as u64))
    }
}
