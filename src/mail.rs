use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One addressee of a mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MailRecipient {
    pub address: String,
    pub display_name: String,
}

impl MailRecipient {
    pub fn new(address: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            display_name: display_name.into(),
        }
    }
}

/// A file sent along with a mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// An outgoing mail. Sending it is left to the caller's mail transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Mail {
    pub to: Vec<MailRecipient>,
    pub cc: Vec<MailRecipient>,
    pub bcc: Vec<MailRecipient>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

impl Mail {
    #[must_use]
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn add_to(&mut self, address: impl Into<String>, display_name: impl Into<String>) {
        self.to.push(MailRecipient::new(address, display_name));
    }

    /// Add `person` as a recipient, reading the address and name with the getters.
    pub fn add_to_with<T>(&mut self, person: &T, address: impl Fn(&T) -> String, name: impl Fn(&T) -> String) {
        self.to.push(MailRecipient::new(address(person), name(person)));
    }

    pub fn add_cc(&mut self, address: impl Into<String>, display_name: impl Into<String>) {
        self.cc.push(MailRecipient::new(address, display_name));
    }

    pub fn add_cc_with<T>(&mut self, person: &T, address: impl Fn(&T) -> String, name: impl Fn(&T) -> String) {
        self.cc.push(MailRecipient::new(address(person), name(person)));
    }

    pub fn add_bcc(&mut self, address: impl Into<String>, display_name: impl Into<String>) {
        self.bcc.push(MailRecipient::new(address, display_name));
    }

    pub fn add_bcc_with<T>(&mut self, person: &T, address: impl Fn(&T) -> String, name: impl Fn(&T) -> String) {
        self.bcc.push(MailRecipient::new(address(person), name(person)));
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }
}
