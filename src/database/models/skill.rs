use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crud::validate::{self, FieldErrors};
use crate::crud::{to_row, Entity, Form, Record};
use crate::database::{Row, Table};
use crate::filter::OrderBy;

pub const MIN_PROFICIENCY: i16 = 1;
pub const MAX_PROFICIENCY: i16 = 5;
pub const DEFAULT_PROFICIENCY: i16 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub name: String,
    pub category: String,
    pub proficiency_level: i16,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Skill {
    const TABLE: Table = Table::Skills;
    const ORDER: OrderBy = OrderBy::asc("category");

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Skill {
    const LABEL: &'static str = "Skill";
    const PATH: &'static str = "skills";

    type Draft = SkillDraft;
    type Patch = SkillPatch;
}

/// Named proficiency levels 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProficiencyLevel {
    Beginner = 1,
    Elementary = 2,
    Intermediate = 3,
    Advanced = 4,
    Expert = 5,
}

impl ProficiencyLevel {
    pub fn from_level(level: i16) -> Option<Self> {
        match level {
            1 => Some(Self::Beginner),
            2 => Some(Self::Elementary),
            3 => Some(Self::Intermediate),
            4 => Some(Self::Advanced),
            5 => Some(Self::Expert),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Elementary => "Elementary",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl std::fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn default_proficiency() -> i16 {
    DEFAULT_PROFICIENCY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_proficiency")]
    pub proficiency_level: i16,
}

impl Default for SkillDraft {
    fn default() -> Self {
        Self { name: String::new(), category: String::new(), proficiency_level: DEFAULT_PROFICIENCY }
    }
}

impl From<&Skill> for SkillDraft {
    fn from(s: &Skill) -> Self {
        Self { name: s.name.clone(), category: s.category.clone(), proficiency_level: s.proficiency_level }
    }
}

impl Form for SkillDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, "name", &self.name);
        validate::required(&mut errors, "category", &self.category);
        validate::range(
            &mut errors,
            "proficiency_level",
            self.proficiency_level.into(),
            MIN_PROFICIENCY.into(),
            MAX_PROFICIENCY.into(),
        );
        errors.into_result()
    }

    fn into_row(mut self) -> Row {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        to_row(&self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proficiency_level: Option<i16>,
}

impl Form for SkillPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            validate::required(&mut errors, "name", name);
        }
        if let Some(category) = &self.category {
            validate::required(&mut errors, "category", category);
        }
        if let Some(level) = self.proficiency_level {
            validate::range(&mut errors, "proficiency_level", level.into(), MIN_PROFICIENCY.into(), MAX_PROFICIENCY.into());
        }
        errors.into_result()
    }

    fn into_row(mut self) -> Row {
        self.name = self.name.map(|s| s.trim().to_string());
        self.category = self.category.map(|s| s.trim().to_string());
        to_row(&self)
    }
}
