use chrono::{DateTime, TimeZone, Utc};
use email_digest::{Part, ParseError, parse, parse_date, parse_email};

#[test]
fn test_parse_simple_email() {
    let raw = b"From: sender@example.com\r\n\
                Subject: Hi\r\n\
                Date: Mon, 01 Jan 2024 10:00:00 +0000\r\n\
                \r\n\
                \r\n\
                \r\n\
                Hello\r\n\
                \r\n\
                \r\n\
                \r\n\
                World\r\n\
                \r\n";

    let email = parse_email(raw).unwrap();

    assert_eq!(email.subject, "Hi");
    assert_eq!(
        email.date.unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(email.body, "Hello\n\nWorld");
    assert!(email.attachments.is_empty());
    assert!(email.attachment_links.is_empty());
}

#[test]
fn test_parse_tree_end_to_end() {
    let message = Part::leaf("text/plain", "\n\nHello\n\n\n\nWorld\n")
        .with_header("Subject", "Hi")
        .with_header("Date", "Mon, 01 Jan 2024 10:00:00 +0000");

    let email = parse(&message).unwrap();

    assert_eq!(email.subject, "Hi");
    assert_eq!(
        email.date.unwrap().to_rfc3339(),
        "2024-01-01T10:00:00+00:00"
    );
    assert_eq!(email.body, "Hello\n\nWorld");
}

#[test]
fn test_parts_joined_with_newline() {
    let message = Part::container(vec![
        Part::leaf("text/plain", "A\nB"),
        Part::leaf("text/plain", "C"),
    ])
    .with_header("Date", "Mon, 01 Jan 2024 10:00:00 +0000");

    let email = parse(&message).unwrap();

    assert_eq!(email.body, "AB\nC");
}

#[test]
fn test_missing_subject_is_empty() {
    let message =
        Part::leaf("text/plain", "body").with_header("Date", "Mon, 01 Jan 2024 10:00:00 +0000");

    let email = parse(&message).unwrap();

    assert_eq!(email.subject, "");
    assert_eq!(email.body, "body");
}

#[test]
fn test_no_plain_text_gives_empty_body() {
    let message = Part::container(vec![Part::leaf("text/html", "<p>hi</p>")])
        .with_header("Subject", "Only HTML")
        .with_header("Date", "Mon, 01 Jan 2024 10:00:00 +0000");

    let email = parse(&message).unwrap();

    assert_eq!(email.body, "");
    assert!(email.is_empty());
}

#[test]
fn test_malformed_date_fails() {
    let message = Part::leaf("text/plain", "body")
        .with_header("Subject", "Hi")
        .with_header("Date", "01/01/2024");

    let err = parse(&message).unwrap_err();

    assert!(matches!(err, ParseError::InvalidDate { ref value, .. } if value == "01/01/2024"));
}

#[test]
fn test_missing_date_fails() {
    let message = Part::leaf("text/plain", "body").with_header("Subject", "Hi");

    let err = parse(&message).unwrap_err();

    assert!(matches!(err, ParseError::MissingHeader(ref h) if h == "Date"));
}

#[test]
fn test_date_keeps_offset() {
    let date = parse_date("Tue, 02 Jan 2024 08:30:00 +0200").unwrap();

    assert_eq!(date.offset().local_minus_utc(), 2 * 3600);
    assert_eq!(date.to_rfc3339(), "2024-01-02T08:30:00+02:00");
}

#[test]
fn test_date_strict_format() {
    for value in [
        "Mon, 01 Jan 24 10:00:00 +0000",
        "Mon, 01 Jan 2024 10:00 +0000",
        "Mon, 01 Jan 2024 10:00:00 GMT",
        "Mon, 01 Jan 2024 10:00:00 +0000 (UTC)",
        "01 Jan 2024 10:00:00 +0000",
        "Mon, 30 Feb 2024 10:00:00 +0000",
        "",
    ] {
        assert!(parse_date(value).is_err(), "{value:?} should be rejected");
    }
}

#[test]
fn test_parse_multipart_email() {
    let raw = b"From: a@example.com\r\n\
                Subject: Multi\r\n\
                Date: Tue, 02 Jan 2024 08:30:00 +0200\r\n\
                MIME-Version: 1.0\r\n\
                Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
                \r\n\
                --outer\r\n\
                Content-Type: multipart/alternative; boundary=\"inner\"\r\n\
                \r\n\
                --inner\r\n\
                Content-Type: text/plain; charset=utf-8\r\n\
                \r\n\
                First\r\n\
                \r\n\
                \r\n\
                \r\n\
                part\r\n\
                --inner\r\n\
                Content-Type: text/html\r\n\
                \r\n\
                <p>First</p>\r\n\
                --inner--\r\n\
                --outer\r\n\
                Content-Type: text/plain\r\n\
                \r\n\
                Second\r\n\
                --outer--\r\n";

    let email = parse_email(raw).unwrap();

    assert_eq!(email.subject, "Multi");
    assert_eq!(email.body, "First\n\npart\nSecond");
    let expected: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 2, 6, 30, 0).unwrap();
    assert_eq!(email.date.unwrap(), expected);
}

#[test]
fn test_parse_quoted_printable_part() {
    let raw = b"Subject: QP\r\n\
                Date: Mon, 01 Jan 2024 10:00:00 +0000\r\n\
                Content-Type: text/plain; charset=utf-8\r\n\
                Content-Transfer-Encoding: quoted-printable\r\n\
                \r\n\
                Caf=C3=A9 =\r\n\
                ouvert\r\n";

    let email = parse_email(raw).unwrap();

    assert_eq!(email.body, "Café ouvert");
}

#[test]
fn test_raw_malformed_date_fails() {
    let err = parse_email(b"Subject: Hi\r\nDate: 01/01/2024\r\n\r\nbody").unwrap_err();
    assert!(matches!(err, ParseError::InvalidDate { .. }));
}

#[test]
fn test_forwarded_message_text_included() {
    let raw = b"Subject: Fwd\r\n\
                Date: Mon, 01 Jan 2024 10:00:00 +0000\r\n\
                MIME-Version: 1.0\r\n\
                Content-Type: multipart/mixed; boundary=\"b\"\r\n\
                \r\n\
                --b\r\n\
                Content-Type: text/plain\r\n\
                \r\n\
                Outer\r\n\
                --b\r\n\
                Content-Type: message/rfc822\r\n\
                \r\n\
                Subject: Inner\r\n\
                Content-Type: text/plain\r\n\
                \r\n\
                Inner\r\n\
                --b--\r\n";

    let email = parse_email(raw).unwrap();

    assert_eq!(email.subject, "Fwd");
    assert_eq!(email.body, "Outer\nInner");
}

#[test]
fn test_encoded_subject_kept_verbatim() {
    let raw = b"Subject: =?utf-8?q?Caf=C3=A9?=\r\n\
                Date: Mon, 01 Jan 2024 10:00:00 +0000\r\n\
                \r\n\
                body";

    let email = parse_email(raw).unwrap();

    assert_eq!(email.subject, "=?utf-8?q?Caf=C3=A9?=");
}
