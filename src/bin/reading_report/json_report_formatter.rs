use std::path::Path;

use reading_tutor_rs::Report;

use crate::text_report_formatter::write_text;

pub fn render_json(report: &Report) -> Result<String, String> {
    let mut json = serde_json::to_string_pretty(report)
        .map_err(|err| format!("Failed to serialize reading report: {err}"))?;
    json.push('\n');
    Ok(json)
}

pub fn write_report(path: &Path, report: &Report) -> Result<(), String> {
    write_text(path, &render_json(report)?)
}
