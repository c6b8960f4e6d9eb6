use crate::cli::{OutputFormat, open_registry, output};
use repodeck::config::types::RepodeckConfig;

#[derive(clap::Args)]
pub struct MasterArgs {
    /// Repo id, id prefix, label or URL
    pub repo: String,
}

pub fn run(args: MasterArgs, cfg: &RepodeckConfig, format: OutputFormat) -> anyhow::Result<()> {
    let mut registry = open_registry(cfg)?;

    let Some(id) = registry.resolve(&args.repo).map(|r| r.id) else {
        anyhow::bail!("repo not found: {}", args.repo);
    };
    registry.set_master(id)?;

    let Some(record) = registry.get(id) else {
        anyhow::bail!("repo not found: {}", args.repo);
    };
    match format {
        OutputFormat::Json => output::output_record(record, format, &mut std::io::stdout())?,
        OutputFormat::Human => println!("Master repository is now {}", record.display_name()),
    }
    Ok(())
}
