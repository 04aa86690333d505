//! Thread retrieval: provider wire types, the source trait and the fetch loop

use crate::error::{Error, Result};
use crate::parser::parse_email;
use crate::types::Email;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

static SENDER_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// base64url, accepting payloads with or without `=` padding
const RAW_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Provider search query selecting the threads to digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter(String);

impl SearchFilter {
    /// Threads whose messages come from `address`
    pub fn from_sender(address: &str) -> Result<Self> {
        let address = address.trim();
        if !SENDER_REGEX.is_match(address) {
            return Err(Error::InvalidFilter(format!(
                "not an email address: {address:?}"
            )));
        }
        Ok(Self(format!("from:{address}")))
    }

    /// Pass a query through untouched
    #[must_use]
    pub fn raw(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Response of a thread listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadList {
    #[serde(default)]
    pub threads: Vec<ThreadRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_size_estimate: Option<u32>,
}

/// Thread entry of a [`ThreadList`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRef {
    pub id: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_id: Option<String>,
}

/// A thread with its messages in conversation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
}

/// A message fetched in raw format; `raw` is the base64url RFC 5322 source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    pub raw: String,
}

impl RawMessage {
    /// Decode [`raw`](Self::raw) into message bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_raw(&self.raw).map_err(|e| Error::Decode {
            id: self.id.clone(),
            details: e.to_string(),
        })
    }
}

/// Deserialize a provider JSON response body into one of the wire types
pub fn from_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

/// Decode a base64url payload, padded or not
pub fn decode_raw(raw: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    RAW_ENGINE.decode(raw.trim())
}

/// A mail provider able to list and fetch threads.
///
/// Transport, authentication and paging are the implementor's concern.
pub trait MailSource {
    fn list_threads(&self, filter: &SearchFilter) -> Result<ThreadList>;

    fn get_thread(&self, thread_id: &str) -> Result<Thread>;

    fn get_raw_message(&self, message_id: &str) -> Result<RawMessage>;
}

/// Fetch and decode the first message of a thread
pub fn top_message<S: MailSource + ?Sized>(source: &S, thread_id: &str) -> Result<Vec<u8>> {
    let thread = source.get_thread(thread_id)?;
    let first = thread
        .messages
        .first()
        .ok_or_else(|| Error::EmptyThread(thread_id.to_string()))?;
    debug!("Fetching message {} of thread {thread_id}", first.id);
    source.get_raw_message(&first.id)?.decode()
}

/// Digest the top message of every thread matching `filter`, in listing order.
///
/// Stops at the first failure and returns it.
pub fn fetch_emails<S: MailSource + ?Sized>(
    source: &S,
    filter: &SearchFilter,
) -> Result<Vec<Email>> {
    let list = source.list_threads(filter)?;
    info!("Found {} threads for {filter}", list.threads.len());

    let emails = list
        .threads
        .iter()
        .map(|thread| {
            let raw = top_message(source, &thread.id)?;
            parse_email(&raw).map_err(Error::from)
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Parsed {} emails", emails.len());
    Ok(emails)
}
