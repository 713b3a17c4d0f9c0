//! MIME encoding of an [`EmailMessage`]

use lazy_static::lazy_static;
use lettre::message::{
    header::{
        ContentType, Date, HeaderName, HeaderValue, Headers, MessageId, Subject, MIME_VERSION_1_0,
    },
    Attachment as AttachmentPart, MultiPart, SinglePart,
};
use uuid::Uuid;

use super::{Address, EmailMessage};

lazy_static! {
    static ref OCTET_STREAM: ContentType =
        ContentType::parse("application/octet-stream").expect("static content type");
}

/// A message ready for a transport.
///
/// Produced once per delivery attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedMessage {
    /// Sender given to the SMTP `MAIL FROM` command
    pub envelope_from: String,

    /// Recipients given to the SMTP `RCPT TO` commands
    pub envelope_to: Vec<String>,

    /// The RFC 2822 document
    pub body: Vec<u8>,
}

/// Encodes `email` as a `multipart/mixed` MIME document.
///
/// Parts are added in a fixed order: the text body and the HTML body, each
/// only when non-empty, then every attachment in input order. A message with
/// none of these carries a single empty text part.
pub fn build(email: &EmailMessage) -> EncodedMessage {
    let mut headers = Headers::new();

    headers.set(Subject::from(email.subject.clone().unwrap_or_default()));
    set_addresses(&mut headers, "From", std::slice::from_ref(&email.from));
    set_addresses(&mut headers, "Bcc", &email.bcc);
    set_addresses(&mut headers, "Cc", &email.cc);
    set_addresses(&mut headers, "To", &email.to);
    headers.set(Date::now());
    headers.set(MessageId::from(message_id(&email.from)));
    headers.set(MIME_VERSION_1_0);

    let mut body = headers.to_string().into_bytes();
    body.extend(multipart(email).formatted());

    EncodedMessage {
        envelope_from: email.from.envelope(),
        envelope_to: email.recipients(),
        body,
    }
}

/// Address headers are written pre-encoded so that display names always use
/// the `=?UTF-8?B?...?=` form. Lists are folded after every address since
/// lettre writes pre-encoded values as they are. Empty lists are left out.
fn set_addresses(headers: &mut Headers, name: &'static str, addresses: &[Address]) {
    if addresses.is_empty() {
        return;
    }

    headers.insert_raw(HeaderValue::dangerous_new_pre_encoded(
        HeaderName::new_from_ascii_str(name),
        Address::header_list(addresses),
        Address::folded_header_list(addresses),
    ));
}

fn multipart(email: &EmailMessage) -> MultiPart {
    let text = email.text_body.as_ref().filter(|text| !text.is_empty());
    let html = email.html_body.as_ref().filter(|html| !html.is_empty());

    let mut multipart = MultiPart::mixed().build();

    // a multipart needs at least one body part
    if let Some(text) = text {
        multipart = multipart.singlepart(SinglePart::plain(text.clone()));
    } else if html.is_none() && email.attachments.is_empty() {
        multipart = multipart.singlepart(SinglePart::plain(String::new()));
    }

    if let Some(html) = html {
        multipart = multipart.singlepart(SinglePart::html(html.clone()));
    }

    for attachment in &email.attachments {
        multipart = multipart.singlepart(
            AttachmentPart::new(attachment.filename.clone())
                .body(attachment.data.clone(), OCTET_STREAM.clone()),
        );
    }

    multipart
}

fn message_id(from: &Address) -> String {
    let email = from.envelope();
    let domain = email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
        .unwrap_or("localhost");

    format!("<{}@{}>", Uuid::now_v7(), domain)
}

#[cfg(test)]
mod tests {
    use crate::domain::message::Attachment;

    use super::*;

    fn rendered(email: &EmailMessage) -> String {
        String::from_utf8_lossy(&build(email).body).into_owned()
    }

    #[test]
    fn test_envelope_uses_bare_addresses() {
        let email = EmailMessage::new(Address::new(Some("Alice"), "alice@x.com"))
            .to(Address::new(Some("Bob"), "b@x.com"))
            .cc("c@x.com")
            .bcc("d@x.com");

        let encoded = build(&email);

        assert_eq!(encoded.envelope_from, "alice@x.com");
        assert_eq!(encoded.envelope_to, vec!["b@x.com", "c@x.com", "d@x.com"]);
    }

    #[test]
    fn test_to_header_mixes_bare_and_named_addresses() {
        let email = EmailMessage::new("from@x.com")
            .to((None::<&str>, "a@x.com"))
            .to((Some("Bob"), "b@x.com"))
            .text_body("hello");

        let body = rendered(&email);

        assert!(body.contains("\r\nTo: a@x.com,\r\n =?UTF-8?B?Qm9i?= <b@x.com>\r\n"));
    }

    #[test]
    fn test_address_headers() {
        let email = EmailMessage::new(Address::new(Some("Alice"), "alice@x.com"))
            .to("b@x.com")
            .cc(Address::new(Some("Carol"), "c@x.com"))
            .bcc("d@x.com")
            .text_body("hello");

        let body = rendered(&email);

        assert!(body.contains("From: =?UTF-8?B?QWxpY2U=?= <alice@x.com>\r\n"));
        assert!(body.contains("Cc: =?UTF-8?B?Q2Fyb2w=?= <c@x.com>\r\n"));
        assert!(body.contains("Bcc: d@x.com\r\n"));
        assert!(body.contains("MIME-Version: 1.0\r\n"));
        assert!(body.contains("Message-ID: <"));
        assert!(body.contains("@x.com>\r\n"));
    }

    #[test]
    fn test_long_recipient_lists_are_folded() {
        let email = (0..60).fold(EmailMessage::new("from@example.com"), |email, n| {
            email
                .to(Address::new(Some("Recipient Name"), format!("user{}@example.com", n)))
                .cc(format!("copy{}@example.com", n))
        });

        let body = rendered(&email);

        let longest = body.split("\r\n").map(str::len).max().unwrap_or_default();

        assert!(longest <= 998, "longest line is {} octets", longest);
        assert!(body.contains(
            "\r\nTo: =?UTF-8?B?UmVjaXBpZW50IE5hbWU=?= <user0@example.com>,\r\n =?UTF-8?B?UmVjaXBpZW50IE5hbWU=?= <user1@example.com>,\r\n"
        ));
        assert!(body.contains("\r\nCc: copy0@example.com,\r\n copy1@example.com,\r\n"));
        assert_eq!(build(&email).envelope_to.len(), 120);
    }

    #[test]
    fn test_line_breaks_in_addresses_do_not_add_headers() {
        let email = EmailMessage::new("from@x.com\r\nX-From: yes")
            .to("a@x.com\r\nX-Injected: yes")
            .bcc(Address::new(Some("Dave"), "d@x.com\nX-Bcc: leaked"))
            .text_body("hello");

        let encoded = build(&email);
        let body = String::from_utf8_lossy(&encoded.body);

        assert!(!body.contains("\r\nX-Injected"));
        assert!(!body.contains("\nX-Bcc"));
        assert!(!body.contains("\r\nX-From"));
        assert!(body.contains("\r\nTo: a@x.comX-Injected: yes\r\n"));
        assert_eq!(encoded.envelope_from, "from@x.comX-From: yes");
        assert_eq!(
            encoded.envelope_to,
            vec!["a@x.comX-Injected: yes", "d@x.comX-Bcc: leaked"]
        );
    }

    #[test]
    fn test_message_without_content_has_an_empty_text_part() {
        let body = rendered(&EmailMessage::new("from@x.com").to("a@x.com"));

        assert!(body.contains("Content-Type: multipart/mixed"));
        assert_eq!(body.matches("Content-Type: text/plain").count(), 1);
        assert!(!body.contains("text/html"));
    }

    #[test]
    fn test_empty_cc_and_bcc_are_left_out() {
        let body = rendered(&EmailMessage::new("from@x.com").to("a@x.com"));

        assert!(!body.contains("\r\nCc:"));
        assert!(!body.contains("\r\nBcc:"));
    }

    #[test]
    fn test_missing_subject_is_empty() {
        let body = rendered(&EmailMessage::new("from@x.com").to("a@x.com"));

        assert!(body.starts_with("Subject: \r\n") || body.starts_with("Subject:\r\n"));
    }

    #[test]
    fn test_subject_is_written() {
        let body = rendered(&EmailMessage::new("from@x.com").subject("Hello there"));

        assert!(body.starts_with("Subject: Hello there\r\n"));
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let body = rendered(&EmailMessage::new("from@x.com").subject("Héllo"));

        assert!(body.starts_with("Subject: =?"));
        assert!(!body.contains("Héllo"));
    }

    #[test]
    fn test_text_and_html_parts() {
        let body = rendered(
            &EmailMessage::new("from@x.com")
                .to("a@x.com")
                .text_body("plain words")
                .html_body("<p>rich words</p>"),
        );

        let text = body.find("Content-Type: text/plain").unwrap();
        let html = body.find("Content-Type: text/html").unwrap();

        assert!(body.contains("Content-Type: multipart/mixed"));
        assert!(text < html);
        assert!(body.contains("plain words"));
        assert!(body.contains("<p>rich words</p>"));
    }

    #[test]
    fn test_attachment_only() {
        let email = EmailMessage::new("from@x.com")
            .to("a@x.com")
            .text_body("")
            .html_body("")
            .attachment(Attachment::new("f.txt", "hi"));

        let body = rendered(&email);

        assert!(!body.contains("text/plain"));
        assert!(!body.contains("text/html"));
        assert_eq!(body.matches("Content-Disposition: attachment").count(), 1);
        assert!(body.contains("filename=\"f.txt\""));
        assert!(body.contains("Content-Type: application/octet-stream"));
    }

    #[test]
    fn test_attachments_keep_their_order() {
        let email = EmailMessage::new("from@x.com")
            .to("a@x.com")
            .text_body("see attached")
            .attachment(Attachment::new("first.bin", vec![0u8, 159, 146, 150]))
            .attachment(Attachment::new("second.bin", vec![1u8, 2, 3]));

        let body = rendered(&email);

        let text = body.find("see attached").unwrap();
        let first = body.find("first.bin").unwrap();
        let second = body.find("second.bin").unwrap();

        assert!(text < first);
        assert!(first < second);
    }

    #[test]
    fn test_parts_share_one_boundary() {
        let body = rendered(
            &EmailMessage::new("from@x.com")
                .to("a@x.com")
                .text_body("one")
                .html_body("<b>two</b>"),
        );

        let boundary = body
            .split("boundary=\"")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap()
            .to_string();

        assert_eq!(body.matches(&format!("--{}\r\n", boundary)).count(), 2);
        assert!(body.contains(&format!("--{}--", boundary)));
    }
}
