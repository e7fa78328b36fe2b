use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crud::validate::{self, FieldErrors};
use crate::crud::{to_row, Entity, Form, Record};
use crate::database::{Row, Table};
use crate::filter::OrderBy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Education {
    const TABLE: Table = Table::Education;
    const ORDER: OrderBy = OrderBy::asc("start_date");

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Education {
    const LABEL: &'static str = "Education";
    const PATH: &'static str = "education";

    type Draft = EducationDraft;
    type Patch = EducationPatch;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationDraft {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub field_of_study: Option<String>,
    #[serde(default, deserialize_with = "validate::optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "validate::optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default, deserialize_with = "validate::optional_text")]
    pub description: Option<String>,
}

impl From<&Education> for EducationDraft {
    fn from(e: &Education) -> Self {
        Self {
            institution: e.institution.clone(),
            degree: e.degree.clone(),
            field_of_study: e.field_of_study.clone(),
            start_date: e.start_date,
            end_date: e.end_date,
            is_current: e.is_current,
            description: e.description.clone(),
        }
    }
}

impl Form for EducationDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "institution", &self.institution);
        validate::required(&mut errors, "degree", &self.degree);
        errors.into_result()
    }

    fn into_row(mut self) -> Row {
        self.institution = self.institution.trim().to_string();
        self.degree = self.degree.trim().to_string();
        if self.is_current {
            self.end_date = None;
        }
        to_row(&self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "validate::nullable_text")]
    pub field_of_study: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "validate::nullable_date")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "validate::nullable_date")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_current: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "validate::nullable_text")]
    pub description: Option<Option<String>>,
}

impl Form for EducationPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(institution) = &self.institution {
            validate::required(&mut errors, "institution", institution);
        }
        if let Some(degree) = &self.degree {
            validate::required(&mut errors, "degree", degree);
        }
        errors.into_result()
    }

    fn into_row(mut self) -> Row {
        self.institution = self.institution.map(|s| s.trim().to_string());
        self.degree = self.degree.map(|s| s.trim().to_string());
        if self.is_current == Some(true) {
            self.end_date = Some(None);
        }
        to_row(&self)
    }
}
