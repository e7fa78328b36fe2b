use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crud::validate::{self, FieldErrors};
use crate::crud::{Form, Record};
use crate::database::Table;
use crate::filter::OrderBy;

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Account able to sign in to the admin area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for User {
    const TABLE: Table = Table::Users;
    const ORDER: OrderBy = OrderBy::asc("email");

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Sign-in / sign-up body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Sign-in only needs both fields present; strength rules apply at sign-up.
    pub fn check_present(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "email", &self.email);
        validate::required(&mut errors, "password", &self.password);
        errors.into_result()
    }

    /// Emails are compared case-insensitively.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_ascii_lowercase()
    }
}

impl Form for Credentials {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "email", &self.email);
        validate::email(&mut errors, "email", Some(&self.email));
        validate::required(&mut errors, "password", &self.password);
        validate::min_chars(&mut errors, "password", &self.password, MIN_PASSWORD_CHARS);
        errors.into_result()
    }
}
