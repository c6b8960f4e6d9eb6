use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;

use repodeck::core::push::PushReport;
use repodeck::core::repo::RepositoryRecord;

/// Render a single record as a one-line summary for list output.
pub fn render_record_line(record: &RepositoryRecord) -> String {
    let marker = if record.is_master {
        "★".yellow().bold().to_string()
    } else {
        " ".to_string()
    };
    let id = record.id.to_string();
    let short_id = &id[..8];

    let name = match record.label.as_deref().filter(|l| !l.is_empty()) {
        Some(label) => format!("{} {}", label.bold(), record.url.dimmed()),
        None => record.url.clone(),
    };

    format!(
        "{} {} {}  pushed {}",
        marker,
        short_id.cyan(),
        name,
        render_when(record.last_pushed)
    )
}

/// `never`, or the local timestamp.
pub fn render_when(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "never".to_string(),
    }
}

/// Render a completed push.
pub fn render_push(report: &PushReport) -> String {
    format!(
        "{} {} ({} strategy)",
        "✓".green(),
        report.summary,
        report.push_type.label()
    )
}

/// Render a master warning prompt for one confirmation step.
pub fn render_warning(step: u8, message: &str) -> String {
    format!("{} [{}/3] {}", "⚠".red().bold(), step + 1, message)
}
