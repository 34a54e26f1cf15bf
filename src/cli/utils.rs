use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::api::ImageUpload;
use crate::cli::OutputFormat;
use crate::controller::{ListResource, ResourceList, Screen};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
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

/// Fail the command when the first load of a list did not succeed
pub fn ensure_loaded<R: ListResource>(list: &ResourceList<R>) -> anyhow::Result<()> {
    match list.screen() {
        Screen::Unavailable { message } => Err(anyhow::anyhow!("Failed to load {}: {}", R::NAME, message)),
        _ => Ok(()),
    }
}

/// Output the filtered view of a list screen with its stats line
pub fn output_list<R, F>(
    output_format: &OutputFormat,
    list: &ResourceList<R>,
    summary: &str,
    row: F,
) -> anyhow::Result<()>
where
    R: ListResource,
    R::Entity: Serialize,
    R::Stats: Serialize,
    F: Fn(&R::Entity) -> String,
{
    let view = list.view();

    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".to_string(), Value::Bool(true));
            response.insert(R::NAME.to_string(), serde_json::to_value(&view)?);
            response.insert("stats".to_string(), serde_json::to_value(list.stats())?);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("{}", summary);
            if view.is_empty() {
                println!("No {} found", R::NAME);
            }
            for item in view {
                println!("  {}", row(item));
            }
        }
    }
    Ok(())
}

/// Output a single record: JSON as-is, text as `label: value` lines
pub fn output_record<T: Serialize>(
    output_format: &OutputFormat,
    key: &str,
    record: &T,
    lines: Vec<(&str, String)>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".to_string(), Value::Bool(true));
            response.insert(key.to_string(), serde_json::to_value(record)?);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            for (label, value) in lines {
                if !value.is_empty() {
                    println!("{:<18} {}", format!("{}:", label), value);
                }
            }
        }
    }
    Ok(())
}

/// Ask a yes/no question on stdin, prompting on stderr; anything but `y`/`yes` declines
pub fn confirm(prompt: &str) -> bool {
    ask(prompt, io::stdin().lock(), io::stderr())
}

/// Prompt is written to `output`; stdout is reserved for command results.
fn ask<R: BufRead, W: Write>(prompt: &str, mut input: R, mut output: W) -> bool {
    if write!(output, "{} [y/N] ", prompt).and_then(|_| output.flush()).is_err() {
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

pub fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

/// Read an optional image argument into an upload
pub async fn load_image(path: Option<&Path>) -> anyhow::Result<Option<ImageUpload>> {
    match path {
        Some(path) => {
            let upload = ImageUpload::from_path(path)
                .await
                .map_err(|e| anyhow::anyhow!("Cannot read image {}: {}", path.display(), e))?;
            Ok(Some(upload))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_writes_prompt_to_given_stream() {
        let mut shown = Vec::new();
        assert!(ask("Delete vendor 3?", "y\n".as_bytes(), &mut shown));
        assert_eq!(String::from_utf8(shown).unwrap(), "Delete vendor 3? [y/N] ");
    }

    #[test]
    fn ask_defaults_to_no() {
        assert!(ask("Delete?", " YES \n".as_bytes(), Vec::new()));
        assert!(!ask("Delete?", "\n".as_bytes(), Vec::new()));
        assert!(!ask("Delete?", "no\n".as_bytes(), Vec::new()));
        assert!(!ask("Delete?", "".as_bytes(), Vec::new()));
    }
}
