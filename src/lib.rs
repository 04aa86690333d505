// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Digest
//!
//! Turns the top message of each mail thread into a display-ready record:
//! subject, timestamp, and a plain-text body with tidy paragraph spacing.
//!
//! # Pipeline
//!
//! - [`plain_text_parts`] walks a MIME tree and lazily yields every
//!   `text/plain` leaf, depth-first
//! - [`normalize_lines`] drops leading and trailing blank lines and caps
//!   interior blank runs at two
//! - [`parse`] / [`parse_email`] read `Subject` and `Date` and assemble the body
//! - [`fetch_emails`] drives a [`MailSource`] over every thread matching a
//!   [`SearchFilter`]
//!
//! # Example
//!
//! ```rust
//! use email_digest::parse_email;
//!
//! let raw = b"Subject: Hi\r\nDate: Mon, 01 Jan 2024 10:00:00 +0000\r\n\r\n\r\nHello\r\n\r\n\r\n\r\nWorld\r\n";
//! let email = parse_email(raw).unwrap();
//!
//! assert_eq!(email.subject, "Hi");
//! assert_eq!(email.body, "Hello\n\nWorld");
//! ```

mod config;
mod error;
mod mime;
mod normalize;
mod parser;
mod source;
mod types;

pub use config::*;
pub use error::{Error, ParseError, ParseResult, Result};
pub use mime::{MESSAGE_RFC822, MimePart, Part, PlainTextParts, TEXT_PLAIN, plain_text_parts};
pub use normalize::{BLANK, normalize_lines, normalize_text, split_lines, trim_line};
pub use parser::{DATE_FORMAT, parse, parse_date, parse_email};
pub use source::*;
pub use types::*;
