use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Field name -> message map produced by form validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the first message for `field`; later ones are ignored.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

pub fn required(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required");
    }
}

pub fn min_chars(errors: &mut FieldErrors, field: &str, value: &str, min: usize) {
    if value.trim().chars().count() < min {
        errors.add(field, format!("Must be at least {} characters", min));
    }
}

/// `local@domain.tld`; `None` passes.
pub fn email(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    if let Some(value) = value {
        if !is_email(value.trim()) {
            errors.add(field, "Please enter a valid email address");
        }
    }
}

/// Absolute http(s) URL; `None` passes.
pub fn http_url(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    if let Some(value) = value {
        let ok = url::Url::parse(value.trim())
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false);
        if !ok {
            errors.add(field, "Please enter a valid URL");
        }
    }
}

pub fn range(errors: &mut FieldErrors, field: &str, value: i64, min: i64, max: i64) {
    if value < min || value > max {
        errors.add(field, format!("Must be between {} and {}", min, max));
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty()
        && !host.is_empty()
        && !tld.is_empty()
        && !value.chars().any(char::is_whitespace)
        && !domain.contains('@')
}

/// Trims; blank becomes `None`.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

// Serde helpers for form fields. Drafts use the `optional_*` variants
// (absent, null and blank all mean unset). Patches use the `nullable_*`
// variants, which keep "absent" (`None`) apart from "clear" (`Some(None)`).

pub fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(blank_to_none(Option::<String>::deserialize(d)?))
}

pub fn nullable_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<String>>, D::Error> {
    optional_text(d).map(Some)
}

pub fn optional_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    match blank_to_none(Option::<String>::deserialize(d)?) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid date '{}', expected YYYY-MM-DD", s))),
    }
}

pub fn nullable_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<NaiveDate>>, D::Error> {
    optional_date(d).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrText {
    List(Vec<String>),
    Text(String),
}

/// Accepts `["a", "b"]` or `"a, b"`; entries are trimmed and blanks dropped.
pub fn technologies<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let items = match Option::<ListOrText>::deserialize(d)? {
        None => Vec::new(),
        Some(ListOrText::List(items)) => items,
        Some(ListOrText::Text(text)) => text.split(',').map(str::to_string).collect(),
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

pub fn optional_technologies<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    technologies(d).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_first_error_per_field() {
        let mut errors = FieldErrors::new();
        required(&mut errors, "name", "  ");
        min_chars(&mut errors, "name", "", 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("This field is required"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn email_shapes() {
        for good in ["ada@example.com", "a.b+c@mail.example.org"] {
            let mut errors = FieldErrors::new();
            email(&mut errors, "email", Some(good));
            assert!(errors.is_empty(), "{}", good);
        }
        for bad in ["ada", "ada@", "@example.com", "ada@example", "a da@example.com"] {
            let mut errors = FieldErrors::new();
            email(&mut errors, "email", Some(bad));
            assert!(!errors.is_empty(), "{}", bad);
        }
    }

    #[test]
    fn url_must_be_http() {
        let mut errors = FieldErrors::new();
        http_url(&mut errors, "github_url", Some("https://github.com/ada"));
        http_url(&mut errors, "website_url", None);
        assert!(errors.is_empty());
        http_url(&mut errors, "linkedin_url", Some("ftp://example.com"));
        http_url(&mut errors, "website_url", Some("example.com"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn proficiency_range() {
        let mut errors = FieldErrors::new();
        range(&mut errors, "proficiency_level", 5, 1, 5);
        assert!(errors.is_empty());
        range(&mut errors, "proficiency_level", 0, 1, 5);
        assert_eq!(errors.get("proficiency_level"), Some("Must be between 1 and 5"));
    }

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "optional_text")]
        note: Option<String>,
        #[serde(default, deserialize_with = "nullable_date")]
        end: Option<Option<NaiveDate>>,
        #[serde(default, deserialize_with = "technologies")]
        tech: Vec<String>,
    }

    #[test]
    fn field_helpers_normalize_input() {
        let p: Probe = serde_json::from_value(json!({ "note": "  ", "tech": "Rust, , Go " })).unwrap();
        assert_eq!(p.note, None);
        assert_eq!(p.end, None);
        assert_eq!(p.tech, vec!["Rust", "Go"]);

        let p: Probe = serde_json::from_value(json!({ "end": null, "tech": ["SQL"] })).unwrap();
        assert_eq!(p.end, Some(None));
        assert_eq!(p.tech, vec!["SQL"]);

        let p: Probe = serde_json::from_value(json!({ "end": "2024-02-29" })).unwrap();
        assert_eq!(p.end, Some(NaiveDate::from_ymd_opt(2024, 2, 29)));

        assert!(serde_json::from_value::<Probe>(json!({ "end": "last year" })).is_err());
    }
}
