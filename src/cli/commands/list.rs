use crate::cli::{OutputFormat, open_registry, output};
use repodeck::config::types::RepodeckConfig;

pub fn run(cfg: &RepodeckConfig, format: OutputFormat) -> anyhow::Result<()> {
    let registry = open_registry(cfg)?;
    output::output_records(registry.records(), format, &mut std::io::stdout())
}
