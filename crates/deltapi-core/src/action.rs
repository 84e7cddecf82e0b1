//! Recorded HTTP action replayed against both servers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a verb token does not name a supported HTTP method
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown verb '{0}'")]
pub struct ParseVerbError(pub String);

/// HTTP verb of a recorded action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    #[default]
    Get,
    Put,
    Post,
    Delete,
    Patch,
}

impl Verb {
    /// All verbs, in declaration order
    pub const ALL: [Verb; 5] = [Verb::Get, Verb::Put, Verb::Post, Verb::Delete, Verb::Patch];

    /// Upper-case method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Put => "PUT",
            Verb::Post => "POST",
            Verb::Delete => "DELETE",
            Verb::Patch => "PATCH",
        }
    }

    /// Whether requests with this verb carry the action's data as a body
    pub fn has_body(&self) -> bool {
        matches!(self, Verb::Put | Verb::Post | Verb::Patch)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so `{:<7}` column alignment works in status lines
        f.pad(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = ParseVerbError;

    /// Case-insensitive match against the supported verbs
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseVerbError(s.to_string()))
    }
}

/// One recorded request: verb, URL relative to the server base, optional body
///
/// Actions are immutable once built; the engine only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    verb: Verb,
    url: String,
    #[serde(default)]
    data: Option<String>,
}

impl Action {
    /// Create an action without a body
    pub fn new(verb: Verb, url: impl Into<String>) -> Self {
        Self {
            verb,
            url: url.into(),
            data: None,
        }
    }

    /// Attach a literal body to the action
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Body sent for this action: the data for body-carrying verbs (empty if
    /// absent), `None` for GET and DELETE
    pub fn body(&self) -> Option<&str> {
        if self.verb.has_body() {
            Some(self.data.as_deref().unwrap_or(""))
        } else {
            None
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.url)
    }
}
