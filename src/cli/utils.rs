use std::io::Read;

use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::client::Notice;
use crate::database::models::ProficiencyLevel;

/// Columns shown, in order, when a record is printed as one text line.
const SUMMARY_KEYS: &[&str] = &[
    "position",
    "company",
    "degree",
    "institution",
    "name",
    "category",
    "full_name",
    "subject",
    "email",
];

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            match (response.as_object_mut(), data) {
                (Some(object), Some(Value::Object(extra))) => object.extend(extra),
                (Some(object), Some(other)) => {
                    object.insert("data".to_string(), other);
                }
                _ => {}
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// One record: pretty JSON in both formats, text adds nothing.
pub fn output_record<T: Serialize>(output_format: &OutputFormat, record: &T) -> anyhow::Result<()> {
    let value = serde_json::to_value(record)?;
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "data": value }))?),
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}

/// A list of records; text format prints one summary line per record.
pub fn output_records<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    records: &[T],
) -> anyhow::Result<()> {
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: values }))?);
        }
        OutputFormat::Text if values.is_empty() => println!("No {} found", collection_name),
        OutputFormat::Text => {
            for value in &values {
                println!("{}", summary_line(value));
            }
        }
    }
    Ok(())
}

/// Prints screen notices to stderr in text mode; JSON output stays clean.
pub fn output_notices(output_format: &OutputFormat, notices: Vec<Notice>) {
    if matches!(output_format, OutputFormat::Json) {
        return;
    }
    for notice in notices {
        match notice {
            Notice::Success(message) => eprintln!("✓ {}", message),
            Notice::Error(message) => eprintln!("✗ {}", message),
        }
    }
}

pub fn summary_line(value: &Value) -> String {
    let id = value.get("id").and_then(Value::as_str).unwrap_or("-");
    let fields: Vec<&str> = SUMMARY_KEYS
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .collect();
    let level = value
        .get("proficiency_level")
        .and_then(Value::as_i64)
        .and_then(|n| i16::try_from(n).ok())
        .and_then(ProficiencyLevel::from_level)
        .map(|level| format!(" ({})", level))
        .unwrap_or_default();
    let unread = match value.get("read") {
        Some(Value::Bool(false)) => " [unread]",
        _ => "",
    };
    format!("{}  {}{}{}", id, fields.join(" | "), level, unread)
}

/// JSON body from the argument, or from stdin when absent.
pub fn read_json_input(arg: Option<String>) -> anyhow::Result<Value> {
    let raw = match arg {
        Some(raw) => raw,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if raw.trim().is_empty() {
        anyhow::bail!("Expected a JSON object as argument or on stdin");
    }
    let value: Value = serde_json::from_str(&raw)?;
    if !value.is_object() {
        anyhow::bail!("Expected a JSON object, got {}", value);
    }
    Ok(value)
}
