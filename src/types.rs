//! Core types for parsed emails

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A message reduced to its subject, timestamp and display-ready plain-text body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Date sent, with the sender's UTC offset preserved
    pub date: Option<DateTime<FixedOffset>>,

    /// Subject header, verbatim
    pub subject: String,

    /// Normalized plain-text parts, joined with `\n`
    pub body: String,

    /// Attachment names (not populated yet)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,

    /// Links to remotely hosted attachments (not populated yet)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_links: Vec<String>,
}

impl Email {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// True when no plain-text content was found
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.date {
            Some(date) => writeln!(f, "Date: {}", date.to_rfc2822())?,
            None => writeln!(f, "Date: (unknown)")?,
        }
        writeln!(f, "Subject: {}", self.subject)?;
        writeln!(f)?;
        write!(f, "{}", self.body)
    }
}
