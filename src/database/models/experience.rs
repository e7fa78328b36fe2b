use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crud::validate::{self, FieldErrors};
use crate::crud::{to_row, Entity, Form, Record};
use crate::database::{Row, Table};
use crate::filter::OrderBy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "validate::technologies")]
    pub technologies: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Experience {
    const TABLE: Table = Table::Experience;
    const ORDER: OrderBy = OrderBy::asc("start_date");

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Experience {
    const LABEL: &'static str = "Experience";
    const PATH: &'static str = "experience";

    type Draft = ExperienceDraft;
    type Patch = ExperiencePatch;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDraft {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "validate::optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "validate::optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "validate::technologies")]
    pub technologies: Vec<String>,
}

impl From<&Experience> for ExperienceDraft {
    fn from(e: &Experience) -> Self {
        Self {
            company: e.company.clone(),
            position: e.position.clone(),
            location: e.location.clone(),
            start_date: Some(e.start_date),
            end_date: e.end_date,
            is_current: e.is_current,
            description: e.description.clone(),
            technologies: e.technologies.clone(),
        }
    }
}

impl Form for ExperienceDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "company", &self.company);
        validate::required(&mut errors, "position", &self.position);
        if self.start_date.is_none() {
            errors.add("start_date", "This field is required");
        }
        errors.into_result()
    }

    fn into_row(mut self) -> Row {
        self.company = self.company.trim().to_string();
        self.position = self.position.trim().to_string();
        if self.is_current {
            self.end_date = None;
        }
        to_row(&self)
    }
}

/// Partial update; absent fields are left as stored, `null` clears an
/// optional field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperiencePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "validate::nullable_text")]
    pub location: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "validate::optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "validate::nullable_date")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_current: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "validate::nullable_text")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "validate::optional_technologies")]
    pub technologies: Option<Vec<String>>,
}

impl Form for ExperiencePatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(company) = &self.company {
            validate::required(&mut errors, "company", company);
        }
        if let Some(position) = &self.position {
            validate::required(&mut errors, "position", position);
        }
        errors.into_result()
    }

    fn into_row(mut self) -> Row {
        self.company = self.company.map(|s| s.trim().to_string());
        self.position = self.position.map(|s| s.trim().to_string());
        if self.is_current == Some(true) {
            self.end_date = Some(None);
        }
        to_row(&self)
    }
}
