use crate::cli::OutputFormat;
use crate::domain::models::{Report, Severity};
use std::path::Path;

pub fn render_json(report: &Report) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_text(report: &Report) -> String {
    let mut out = format!("target: {}\n", report.target);
    for f in &report.issues {
        out.push_str(&format!("{}\t{}\t{}\n", f.severity(), f.id(), f.message));
    }
    out.push_str(&format!(
        "{} issues (HIGH {}, MED {}, LOW {}, INFO {}) in {:.3}s",
        report.issues.len(),
        report.count_at(Severity::High),
        report.count_at(Severity::Med),
        report.count_at(Severity::Low),
        report.count_at(Severity::Info),
        report.time
    ));
    out
}

pub fn print_report(format: &OutputFormat, report: &Report) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Text => println!("{}", render_text(report)),
    }
    Ok(())
}

pub fn write_json_file(path: &Path, report: &Report) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_json(report)?)?;
    Ok(())
}
