use std::io::Write;

use repodeck::core::repo::RepositoryRecord;
use crate::cli::OutputFormat;

/// Write records in the requested output format.
pub fn output_records(
    records: &[RepositoryRecord],
    format: OutputFormat,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, records)?;
            writeln!(writer)?;
        }
        OutputFormat::Human => {
            if records.is_empty() {
                writeln!(writer, "No repositories yet. Add one with `repodeck add <url>`.")?;
            }
            for record in records {
                writeln!(writer, "{}", super::display::render_record_line(record))?;
            }
        }
    }
    Ok(())
}

/// Write a single record.
pub fn output_record(
    record: &RepositoryRecord,
    format: OutputFormat,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, record)?;
            writeln!(writer)?;
        }
        OutputFormat::Human => {
            writeln!(writer, "{}", super::display::render_record_line(record))?;
        }
    }
    Ok(())
}
