//! Push workflow: pushes to the master record must be confirmed three times.
//!
//! ```text
//! Idle --push(non-master)--> [execute] --> Idle
//! Idle --push(master)------> Awaiting(0) --confirm--> Awaiting(1) --confirm--> Awaiting(2)
//! Awaiting(2) --confirm--> [execute] --> Idle
//! Awaiting(n) --cancel---> Idle
//! ```

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::registry::Registry;
use super::repo::{PushType, RecordId};
use super::store::RegistryStore;
use crate::config::types::SafetyConfig;
use crate::error::{RepodeckError, Result};

/// Index of the last confirmation step before a master push executes.
pub const FINAL_STEP: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushState {
    Idle,
    AwaitingConfirmation { step: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The target is master; show `message` and wait for confirm or cancel.
    NeedsConfirmation { step: u8, message: String },
    Completed(PushReport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushReport {
    pub source: RecordId,
    pub target: RecordId,
    pub push_type: PushType,
    pub pushed_at: DateTime<Utc>,
    pub summary: String,
}

pub struct PushWorkflow {
    state: PushState,
    source: Option<RecordId>,
    target: Option<RecordId>,
    push_type: PushType,
    warnings: [String; 3],
    last_action: Option<String>,
}

impl Default for PushWorkflow {
    fn default() -> Self {
        Self::new(&SafetyConfig::default())
    }
}

impl PushWorkflow {
    pub fn new(safety: &SafetyConfig) -> Self {
        Self {
            state: PushState::Idle,
            source: None,
            target: None,
            push_type: PushType::default(),
            warnings: safety.master_warnings.clone(),
            last_action: None,
        }
    }

    pub fn state(&self) -> PushState {
        self.state
    }

    /// Summary of the most recent completed push.
    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }

    pub fn select_source(&mut self, id: Option<RecordId>) {
        self.source = id;
    }

    pub fn select_target(&mut self, id: Option<RecordId>) {
        self.target = id;
    }

    pub fn set_push_type(&mut self, push_type: PushType) {
        self.push_type = push_type;
    }

    /// Warning text for a confirmation step.
    pub fn warning(&self, step: u8) -> &str {
        &self.warnings[usize::from(step.min(FINAL_STEP))]
    }

    /// Start a push with the current selection.
    ///
    /// Non-master targets execute immediately. A master target opens the
    /// confirmation dialog; calling this again while the dialog is open
    /// re-renders the current step.
    pub fn request_push<S: RegistryStore>(
        &mut self,
        registry: &mut Registry<S>,
    ) -> Result<PushOutcome> {
        let (_, target) = self.selection(registry)?;
        let target_is_master = registry.get(target).is_some_and(|r| r.is_master);

        match self.state {
            PushState::AwaitingConfirmation { step } => Ok(self.needs_confirmation(step)),
            PushState::Idle if target_is_master => {
                warn!(%target, "push to master repository requires confirmation");
                self.state = PushState::AwaitingConfirmation { step: 0 };
                Ok(self.needs_confirmation(0))
            }
            PushState::Idle => self.execute(registry).map(PushOutcome::Completed),
        }
    }

    /// Accept the current warning. The third acceptance executes the push.
    pub fn confirm<S: RegistryStore>(&mut self, registry: &mut Registry<S>) -> Result<PushOutcome> {
        let PushState::AwaitingConfirmation { step } = self.state else {
            return Err(RepodeckError::NothingToConfirm);
        };

        if step < FINAL_STEP {
            let next = step + 1;
            warn!("master push confirmation step {} of 3", step + 1);
            self.state = PushState::AwaitingConfirmation { step: next };
            return Ok(self.needs_confirmation(next));
        }

        self.execute(registry).map(PushOutcome::Completed)
    }

    /// Abandon the dialog. Nothing is pushed.
    pub fn cancel(&mut self) {
        if self.state != PushState::Idle {
            info!("master push cancelled");
        }
        self.state = PushState::Idle;
    }

    fn needs_confirmation(&self, step: u8) -> PushOutcome {
        PushOutcome::NeedsConfirmation {
            step,
            message: self.warning(step).to_string(),
        }
    }

    fn selection<S: RegistryStore>(&self, registry: &Registry<S>) -> Result<(RecordId, RecordId)> {
        match (self.source, self.target) {
            (Some(s), Some(t)) if registry.get(s).is_some() && registry.get(t).is_some() => {
                Ok((s, t))
            }
            _ => Err(RepodeckError::MissingSelection),
        }
    }

    fn execute<S: RegistryStore>(&mut self, registry: &mut Registry<S>) -> Result<PushReport> {
        let (source, target) = self.selection(registry)?;
        let source_name = display_name(registry, source);
        let target_name = display_name(registry, target);

        info!(
            from = %source_name,
            to = %target_name,
            push_type = self.push_type.label(),
            "push started"
        );

        let pushed_at = registry
            .record_push(target)?
            .ok_or_else(|| RepodeckError::RepoNotFound(target.to_string()))?;

        let summary = format!(
            "Pushed from {} to {} at {}",
            source_name,
            target_name,
            pushed_at.with_timezone(&Local).format("%H:%M:%S")
        );
        info!(%summary, "push completed");

        self.last_action = Some(summary.clone());
        self.state = PushState::Idle;

        Ok(PushReport {
            source,
            target,
            push_type: self.push_type,
            pushed_at,
            summary,
        })
    }
}

fn display_name<S: RegistryStore>(registry: &Registry<S>, id: RecordId) -> String {
    registry
        .get(id)
        .map(|r| r.display_name().to_string())
        .unwrap_or_default()
}
