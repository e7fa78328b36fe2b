use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::crud::validate::{self, FieldErrors};
use crate::crud::{to_row, Form, Record};
use crate::database::{Row, Table};
use crate::filter::OrderBy;

/// Message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for ContactMessage {
    const TABLE: Table = Table::ContactMessages;
    const ORDER: OrderBy = OrderBy::desc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    /// Row for a new message: blank subject replaced by `default_subject`,
    /// always unread.
    pub fn into_row_with_subject(self, default_subject: &str) -> Row {
        let subject = validate::blank_to_none(self.subject).unwrap_or_else(|| default_subject.to_string());
        let mut row = Row::new();
        row.insert("name".into(), Value::String(self.name.trim().to_string()));
        row.insert("email".into(), Value::String(self.email.trim().to_string()));
        row.insert("subject".into(), Value::String(subject));
        row.insert("message".into(), Value::String(self.message.trim().to_string()));
        row.insert("read".into(), Value::Bool(false));
        row
    }
}

impl Form for ContactForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "name", &self.name);
        validate::required(&mut errors, "email", &self.email);
        validate::email(&mut errors, "email", Some(&self.email));
        validate::required(&mut errors, "message", &self.message);
        errors.into_result()
    }

    fn into_row(self) -> Row {
        self.into_row_with_subject(crate::config::DEFAULT_CONTACT_SUBJECT)
    }
}

/// Inbox-side changes to a message; only the read flag is editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
}

impl MessageFlags {
    pub fn mark_read() -> Self {
        Self { read: Some(true) }
    }
}

impl Form for MessageFlags {
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }

    fn into_row(self) -> Row {
        to_row(&self)
    }
}
