use crate::cli::{OutputFormat, open_registry};
use repodeck::config::{self, types::RepodeckConfig};
use repodeck::core::index::{Index, SharedRepository};

#[derive(clap::Args)]
pub struct PublishArgs {
    /// Repo id, id prefix, label or URL
    pub repo: String,
}

pub fn run(args: PublishArgs, cfg: &RepodeckConfig, format: OutputFormat) -> anyhow::Result<()> {
    let registry = open_registry(cfg)?;
    let Some(record) = registry.resolve(&args.repo) else {
        anyhow::bail!("repo not found: {}", args.repo);
    };

    let index = Index::open(&config::index_path(cfg))?;
    index.upsert_repository(&SharedRepository::new(
        record.id.to_string(),
        record.url.clone(),
        record.label.clone().filter(|l| !l.is_empty()),
    ))?;

    let Some(shared) = index.get_repository(&record.id.to_string())? else {
        anyhow::bail!("repo vanished from the shared table: {}", record.id);
    };
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), &shared)?;
            println!();
        }
        OutputFormat::Human => {
            println!("Published {} as {}", shared.display_name(), shared.id);
        }
    }
    Ok(())
}
