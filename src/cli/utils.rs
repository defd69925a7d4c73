use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::services::{LabDetail, LabSummary};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(body)) = (data, response.as_object_mut()) {
                body.extend(extra);
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
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
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

/// Output a list of labs, one line per lab in text mode
pub fn output_labs(output_format: &OutputFormat, labs: &[LabSummary]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": true,
                "count": labs.len(),
                "labs": labs
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            if labs.is_empty() {
                println!("No labs found");
            }
            for lab in labs {
                println!("{}", summary_line(lab));
            }
        }
    }
    Ok(())
}

pub fn output_detail(output_format: &OutputFormat, detail: &LabDetail) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": true,
                "lab": detail
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("#{} {} [{}]", detail.id, detail.name, detail.category);
            println!("Professor: {} <{}>", detail.professor.name, detail.professor.email);
            if !detail.introduction.is_empty() {
                println!("{}", detail.introduction);
            }
            println!("Researchers: {}", detail.researchers.len());
            for researcher in &detail.researchers {
                println!("  - {} <{}>", researcher.name, researcher.email);
            }
            println!("Subscribed: {}", if detail.is_subscribed { "yes" } else { "no" });
        }
    }
    Ok(())
}

fn summary_line(lab: &LabSummary) -> String {
    format!(
        "#{} {} [{}] - prof. {}",
        lab.id, lab.name, lab.category, lab.professor.name
    )
}
