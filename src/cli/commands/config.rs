use crate::cli::OutputFormat;
use repodeck::config::types::RepodeckConfig;

pub fn run(cfg: &RepodeckConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), cfg)?;
            println!();
        }
        OutputFormat::Human => {
            let toml_str = toml::to_string_pretty(cfg)?;
            println!("{}", toml_str);
        }
    }

    Ok(())
}
