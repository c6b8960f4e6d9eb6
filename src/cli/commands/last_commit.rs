use crate::cli::{OutputFormat, open_registry, send_remote};
use repodeck::config::types::RepodeckConfig;
use repodeck::sync::{OperationRequest, OperationType};

#[derive(clap::Args)]
pub struct LastCommitArgs {
    /// Repo id, id prefix, label or URL
    pub repo: String,
}

pub fn run(args: LastCommitArgs, cfg: &RepodeckConfig, format: OutputFormat) -> anyhow::Result<()> {
    let registry = open_registry(cfg)?;
    let Some(record) = registry.resolve(&args.repo) else {
        anyhow::bail!("repo not found: {}", args.repo);
    };

    let response = send_remote(
        cfg,
        &OperationRequest {
            kind: OperationType::GetLastCommit,
            source_repo_id: Some(record.id.to_string()),
            target_repo_id: None,
            push_type: None,
        },
    )?;

    if !response.success {
        anyhow::bail!(
            "{}",
            response.error.as_deref().unwrap_or("sync service reported a failure")
        );
    }

    let commit = response.commit.unwrap_or_default();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), &commit)?;
            println!();
        }
        OutputFormat::Human => {
            let sha = commit["sha"].as_str().unwrap_or("?");
            let date = commit
                .pointer("/commit/author/date")
                .and_then(|d| d.as_str())
                .unwrap_or("unknown date");
            let summary = commit
                .pointer("/commit/message")
                .and_then(|m| m.as_str())
                .and_then(|m| m.lines().next())
                .unwrap_or("");
            let short: String = sha.chars().take(12).collect();
            println!("{short} {date} {summary}");
        }
    }
    Ok(())
}
