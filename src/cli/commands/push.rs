use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::cli::{OutputFormat, display, open_registry, send_remote};
use repodeck::config::types::RepodeckConfig;
use repodeck::core::push::{PushOutcome, PushReport, PushWorkflow};
use repodeck::core::repo::PushType;
use repodeck::sync::{OperationRequest, OperationType};

#[derive(clap::Args)]
pub struct PushArgs {
    /// Source repo (id, id prefix, label or URL)
    #[arg(long)]
    pub from: String,

    /// Target repo (id, id prefix, label or URL)
    #[arg(long)]
    pub to: String,

    /// Push strategy to record
    #[arg(long = "type", value_enum, default_value = "regular")]
    pub push_type: PushType,

    /// Also ask the sync service to merge upstream
    #[arg(long)]
    pub remote: bool,
}

pub fn run(args: PushArgs, cfg: &RepodeckConfig, format: OutputFormat) -> anyhow::Result<()> {
    let mut registry = open_registry(cfg)?;

    let mut workflow = PushWorkflow::new(&cfg.safety);
    workflow.select_source(registry.resolve(&args.from).map(|r| r.id));
    workflow.select_target(registry.resolve(&args.to).map(|r| r.id));
    workflow.set_push_type(args.push_type);

    let mut outcome = workflow.request_push(&mut registry)?;
    let report = loop {
        match outcome {
            PushOutcome::Completed(report) => break report,
            PushOutcome::NeedsConfirmation { step, message } => {
                if !confirm_step(step, &message)? {
                    workflow.cancel();
                    eprintln!("Push cancelled; nothing was changed.");
                    return Ok(());
                }
                outcome = workflow.confirm(&mut registry)?;
            }
        }
    };

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), &report)?;
            println!();
        }
        OutputFormat::Human => println!("{}", display::render_push(&report)),
    }

    if args.remote {
        push_remote(cfg, &report)?;
    }
    Ok(())
}

fn confirm_step(step: u8, message: &str) -> anyhow::Result<bool> {
    let accepted = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(display::render_warning(step, message))
        .default(false)
        .interact()?;
    Ok(accepted)
}

fn push_remote(cfg: &RepodeckConfig, report: &PushReport) -> anyhow::Result<()> {
    let request = OperationRequest {
        kind: OperationType::Push,
        source_repo_id: Some(report.source.to_string()),
        target_repo_id: Some(report.target.to_string()),
        push_type: Some(report.push_type.label().to_string()),
    };
    let response = send_remote(cfg, &request)?;

    if !response.success {
        anyhow::bail!(
            "remote push failed: {}",
            response.error.as_deref().unwrap_or("unknown error")
        );
    }
    eprintln!(
        "{}",
        response
            .message
            .as_deref()
            .unwrap_or("Push operation completed successfully")
    );
    Ok(())
}
