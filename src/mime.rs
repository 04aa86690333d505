//! MIME tree access and plain-text part extraction

use mailparse::ParsedMail;
use std::borrow::Cow;
use std::iter::FusedIterator;
use std::slice;
use tracing::warn;

/// Content type of the leaves whose payload ends up in the body
pub const TEXT_PLAIN: &str = "text/plain";

/// Encapsulated message; walked as a container of the message it carries
pub const MESSAGE_RFC822: &str = "message/rfc822";

/// Read-only view of a node in a decoded MIME tree.
///
/// A node is either a container with ordered children or a leaf with a
/// content type and an already-decoded textual payload.
pub trait MimePart: Sized {
    fn is_container(&self) -> bool;

    /// Ordered children; empty for leaves
    fn children(&self) -> &[Self];

    /// Lower-case `type/subtype`
    fn content_type(&self) -> &str;

    fn payload(&self) -> Cow<'_, str>;

    /// First value of the named header, matched case-insensitively
    fn header(&self, name: &str) -> Option<String>;

    fn is_plain_text(&self) -> bool {
        self.content_type().eq_ignore_ascii_case(TEXT_PLAIN)
    }
}

/// Header value as returned by [`MimePart::header`]: unfolded and trimmed,
/// encoded words left as they are.
fn header_value(raw: &str) -> String {
    raw.lines().collect::<String>().trim().to_string()
}

fn decode_payload(mail: &ParsedMail<'_>) -> String {
    match mail.get_body() {
        Ok(body) => body,
        Err(err) => {
            warn!("Falling back to raw body for {}: {err}", mail.ctype.mimetype);
            mail.get_body_raw().map_or_else(
                |err| {
                    warn!("Dropping undecodable {} part: {err}", mail.ctype.mimetype);
                    String::new()
                },
                |raw| String::from_utf8_lossy(&raw).into_owned(),
            )
        }
    }
}

/// Parse the message carried by a `message/rfc822` part
fn encapsulated(mail: &ParsedMail<'_>) -> Option<Part> {
    let raw = match mail.get_body_raw() {
        Ok(raw) => raw,
        Err(err) => {
            warn!("Skipping undecodable {MESSAGE_RFC822} part: {err}");
            return None;
        }
    };
    match mailparse::parse_mail(&raw) {
        Ok(inner) => Some(Part::from(&inner)),
        Err(err) => {
            warn!("Skipping unparsable {MESSAGE_RFC822} part: {err}");
            None
        }
    }
}

/// An owned MIME node.
///
/// Built directly, or converted from a [`ParsedMail`] with `Part::from`. The
/// conversion expands `message/rfc822` parts into a container holding the
/// encapsulated message and decodes payloads of `text/*` leaves only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    headers: Vec<(String, String)>,
    kind: PartKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PartKind {
    Container(Vec<Part>),
    Leaf {
        content_type: String,
        payload: String,
    },
}

impl Part {
    #[must_use]
    pub fn leaf(content_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            headers: Vec::new(),
            kind: PartKind::Leaf {
                content_type: content_type.into().to_ascii_lowercase(),
                payload: payload.into(),
            },
        }
    }

    #[must_use]
    pub const fn container(children: Vec<Self>) -> Self {
        Self {
            headers: Vec::new(),
            kind: PartKind::Container(children),
        }
    }

    /// Attach a header; earlier headers with the same name take precedence on lookup
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl MimePart for Part {
    fn is_container(&self) -> bool {
        matches!(self.kind, PartKind::Container(_))
    }

    fn children(&self) -> &[Self] {
        match &self.kind {
            PartKind::Container(children) => children,
            PartKind::Leaf { .. } => &[],
        }
    }

    fn content_type(&self) -> &str {
        match &self.kind {
            PartKind::Container(_) => "multipart/mixed",
            PartKind::Leaf { content_type, .. } => content_type,
        }
    }

    fn payload(&self) -> Cow<'_, str> {
        match &self.kind {
            PartKind::Container(_) => Cow::Borrowed(""),
            PartKind::Leaf { payload, .. } => Cow::Borrowed(payload),
        }
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| header_value(value))
    }
}

impl From<&ParsedMail<'_>> for Part {
    fn from(mail: &ParsedMail<'_>) -> Self {
        let headers = mail
            .headers
            .iter()
            .map(|h| (h.get_key(), String::from_utf8_lossy(h.get_value_raw()).into_owned()))
            .collect();
        let content_type = mail.ctype.mimetype.to_ascii_lowercase();

        let kind = if !mail.subparts.is_empty() {
            PartKind::Container(mail.subparts.iter().map(Self::from).collect())
        } else if content_type == MESSAGE_RFC822 {
            match encapsulated(mail) {
                Some(inner) => PartKind::Container(vec![inner]),
                None => PartKind::Leaf {
                    content_type,
                    payload: String::new(),
                },
            }
        } else {
            let payload = if content_type.starts_with("text/") {
                decode_payload(mail)
            } else {
                String::new()
            };
            PartKind::Leaf {
                content_type,
                payload,
            }
        };

        Self { headers, kind }
    }
}

// Unlink children onto a heap stack so dropping a deep tree does not recurse
impl Drop for Part {
    fn drop(&mut self) {
        let PartKind::Container(children) = &mut self.kind else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut part) = pending.pop() {
            if let PartKind::Container(children) = &mut part.kind {
                pending.append(children);
            }
        }
    }
}

/// Lazily yield the payload of every `text/plain` leaf under `root`,
/// depth-first and left to right.
///
/// Other leaves are skipped silently. Traversal keeps its own stack, so deeply
/// nested multiparts do not grow the call stack.
#[must_use]
pub const fn plain_text_parts<P: MimePart>(root: &P) -> PlainTextParts<'_, P> {
    PlainTextParts {
        root: Some(root),
        stack: Vec::new(),
    }
}

/// Iterator returned by [`plain_text_parts`]
#[derive(Debug)]
pub struct PlainTextParts<'a, P> {
    root: Option<&'a P>,
    stack: Vec<slice::Iter<'a, P>>,
}

impl<'a, P: MimePart> PlainTextParts<'a, P> {
    fn next_node(&mut self) -> Option<&'a P> {
        if let Some(root) = self.root.take() {
            return Some(root);
        }
        loop {
            let siblings = self.stack.last_mut()?;
            match siblings.next() {
                Some(node) => return Some(node),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<'a, P: MimePart> Iterator for PlainTextParts<'a, P> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.next_node() {
            if node.is_container() {
                self.stack.push(node.children().iter());
            } else if node.is_plain_text() {
                return Some(node.payload());
            }
        }
        None
    }
}

impl<P: MimePart> FusedIterator for PlainTextParts<'_, P> {}
