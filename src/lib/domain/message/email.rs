//! Email message

use super::Address;

/// A file attached to an email
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// Name the recipient sees
    pub filename: String,

    /// Raw content
    pub data: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// An email to deliver.
///
/// Nothing here is validated: a message without recipients is encoded just
/// the same, and it is up to the caller to not send one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    /// The subject, empty when `None`
    pub subject: Option<String>,

    /// The sender
    pub from: Address,

    /// Primary recipients
    pub to: Vec<Address>,

    /// Carbon copy recipients
    pub cc: Vec<Address>,

    /// Blind carbon copy recipients
    pub bcc: Vec<Address>,

    /// The plain text body
    pub text_body: Option<String>,

    /// The HTML body
    pub html_body: Option<String>,

    /// Attachments, in the order they are encoded
    pub attachments: Vec<Attachment>,
}

impl EmailMessage {
    /// Creates an empty email from `from`
    pub fn new(from: impl Into<Address>) -> Self {
        Self {
            subject: None,
            from: from.into(),
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            text_body: None,
            html_body: None,
            attachments: Vec::new(),
        }
    }

    /// Sets the subject
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Adds a primary recipient
    pub fn to(mut self, address: impl Into<Address>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Adds a carbon copy recipient
    pub fn cc(mut self, address: impl Into<Address>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Adds a blind carbon copy recipient
    pub fn bcc(mut self, address: impl Into<Address>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Sets the plain text body
    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.text_body = Some(text.into());
        self
    }

    /// Sets the HTML body
    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    /// Adds an attachment
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Envelope recipients: to, then cc, then bcc, duplicates included
    pub fn recipients(&self) -> Vec<String> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(Address::envelope)
            .collect()
    }
}
