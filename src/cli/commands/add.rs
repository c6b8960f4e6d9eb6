use crate::cli::{OutputFormat, open_registry, output};
use repodeck::config::types::RepodeckConfig;

#[derive(clap::Args)]
pub struct AddArgs {
    /// Remote URL, e.g. https://github.com/acme/widget.git
    pub url: String,

    /// Human-readable label (Production, Staging, ...)
    #[arg(long, short)]
    pub label: Option<String>,
}

pub fn run(args: AddArgs, cfg: &RepodeckConfig, format: OutputFormat) -> anyhow::Result<()> {
    let mut registry = open_registry(cfg)?;
    let record = registry.add_repository(&args.url, args.label.as_deref())?;

    match format {
        OutputFormat::Json => output::output_record(record, format, &mut std::io::stdout())?,
        OutputFormat::Human => {
            println!("Repository added: {}", record.display_name());
            if record.is_master {
                println!("It is the first repository, so it is now the master.");
            }
        }
    }
    Ok(())
}
