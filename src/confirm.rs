use colored::Colorize;
use inquire::{Confirm, InquireError};
use serde_json::Value;

use crate::error::{Result, SyncError};
use crate::reconcile::TreeChange;

/// Operator approval for a one-way overwrite.
///
/// The sync engine only asks when the change is non-empty.
pub trait ConfirmationGate {
    /// Return `true` to let `change` be applied to the tree `tree_id`.
    fn confirm(&mut self, tree_id: &str, change: &TreeChange) -> Result<bool>;
}

/// Ask on the terminal, defaulting to no.
///
/// Escape or Ctrl-C count as a refusal. Without a terminal there is nobody
/// to ask, so the change is refused as well.
pub struct PromptGate;

impl ConfirmationGate for PromptGate {
    fn confirm(&mut self, tree_id: &str, change: &TreeChange) -> Result<bool> {
        print_change(change);
        println!();

        if !is_interactive() {
            log::warn!(
                "Not running in a terminal; refusing to change {:?} without --yes",
                tree_id
            );
            return Ok(false);
        }

        let question = format!("Change {}?", Value::String(tree_id.to_string()));
        match Confirm::new(&question)
            .with_default(false)
            .with_help_message("Files listed above will be added, deleted or overwritten")
            .prompt()
        {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(SyncError::Prompt(e.to_string())),
        }
    }
}

/// Approve every change without asking (`--yes`).
pub struct AssumeYes;

impl ConfirmationGate for AssumeYes {
    fn confirm(&mut self, tree_id: &str, change: &TreeChange) -> Result<bool> {
        log::info!("Approving {} changes to {:?} without asking", change.len(), tree_id);
        Ok(true)
    }
}

/// Check if we're running in an interactive terminal
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout)
}

/// Print [`TreeChange::summary`] with additions, deletions and overwrites
/// colored.
pub fn print_change(change: &TreeChange) {
    for line in change.summary().lines() {
        let colored = match line.chars().next() {
            Some('•') => line.bold(),
            Some('+') => line.green(),
            Some('-') => line.red(),
            Some('≠') => line.yellow(),
            _ => line.normal(),
        };
        println!("{colored}");
    }
}
