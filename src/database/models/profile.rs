use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crud::validate::{self, FieldErrors};
use crate::crud::{to_row, Form, Record};
use crate::database::{Row, Table};
use crate::filter::OrderBy;

/// Public-facing profile of one admin user; at most one per `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Profile {
    const TABLE: Table = Table::Profiles;
    const ORDER: OrderBy = OrderBy::asc("created_at");

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Full profile form; saving replaces every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub linkedin_url: Option<String>,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub website_url: Option<String>,
}

impl ProfileForm {
    /// Form pre-filled from a stored profile.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            title: profile.title.clone(),
            bio: profile.bio.clone(),
            location: profile.location.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            github_url: profile.github_url.clone(),
            linkedin_url: profile.linkedin_url.clone(),
            website_url: profile.website_url.clone(),
        }
    }
}

impl Form for ProfileForm {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "full_name", &self.full_name);
        validate::min_chars(&mut errors, "full_name", &self.full_name, 2);
        validate::email(&mut errors, "email", self.email.as_deref());
        validate::http_url(&mut errors, "github_url", self.github_url.as_deref());
        validate::http_url(&mut errors, "linkedin_url", self.linkedin_url.as_deref());
        validate::http_url(&mut errors, "website_url", self.website_url.as_deref());
        errors.into_result()
    }

    fn into_row(mut self) -> Row {
        self.full_name = self.full_name.trim().to_string();
        to_row(&self)
    }
}
