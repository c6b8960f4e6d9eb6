use repodeck::config::types::RepodeckConfig;
use repodeck::sync::server;

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Listen address (defaults to server.bind from config)
    #[arg(long)]
    pub bind: Option<String>,
}

pub fn run(args: ServeArgs, cfg: &RepodeckConfig) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server::serve(cfg, args.bind.as_deref()))
}
