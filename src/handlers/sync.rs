//! Sync command handler
//!
//! Runs the protocol between two trees, or only plans it with `--dry-run`,
//! and reports what happened.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use super::quoted;
use crate::confirm::{print_change, AssumeYes, ConfirmationGate, PromptGate};
use crate::settings::Settings;
use crate::sync::{classify, sync_statuses, SyncOutcome, SyncPlan, TreeStatus};
use crate::VerbosityLevel;

/// Flags of `vector-sync sync`
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Apply changes without asking
    pub yes: bool,
    /// Only report what would happen
    pub dry_run: bool,
}

/// Handle `vector-sync sync <OTHER> [--path DIR] [--yes] [--dry-run]`
pub fn handle_sync(
    path: &Path,
    other: &Path,
    options: SyncOptions,
    settings: &Settings,
    verbosity: VerbosityLevel,
) -> Result<()> {
    let local = TreeStatus::read(path)
        .with_context(|| format!("Failed to read tree at {}", path.display()))?;
    let remote = TreeStatus::read(other)
        .with_context(|| format!("Failed to read tree at {}", other.display()))?;

    if verbosity == VerbosityLevel::Verbose {
        print_tree(&local);
        print_tree(&remote);
        println!();
    }

    if options.dry_run {
        let plan = classify(&local, &remote)?;
        print_plan(&plan, verbosity);
        return Ok(());
    }

    let mut gate: Box<dyn ConfirmationGate> = if options.yes || !settings.confirm_changes {
        Box::new(AssumeYes)
    } else {
        Box::new(PromptGate)
    };

    let outcome = sync_statuses(&local, &remote, gate.as_mut())?;
    print_outcome(&outcome, verbosity);

    Ok(())
}

fn print_tree(status: &TreeStatus) {
    println!("{} {}", "Tree:".bold(), quoted(&status.id).cyan());
    println!("   {} {}", "Path:".dimmed(), status.path.display());
    println!("   {} {}", "Recorded:".dimmed(), status.pre_vv);
    println!("   {} {}", "Projected:".dimmed(), status.post_vv);
}

fn print_plan(plan: &SyncPlan<'_>, verbosity: VerbosityLevel) {
    if verbosity == VerbosityLevel::Quiet {
        return;
    }

    match plan {
        SyncPlan::InSync => {
            println!("{}", "Already synchronized. Nothing to do.".green());
        }
        SyncPlan::Merge { version_vector } => {
            println!(
                "{} {}",
                "Contents match; metadata would be merged to".cyan(),
                version_vector
            );
        }
        SyncPlan::FastForward { from, to, change } => {
            println!(
                "{}",
                format!("Would update {} from {}.", quoted(&to.id), quoted(&from.id)).cyan()
            );
            if !change.is_empty() {
                println!();
                print_change(change);
            }
        }
    }
}

fn print_outcome(outcome: &SyncOutcome, verbosity: VerbosityLevel) {
    if verbosity == VerbosityLevel::Quiet {
        return;
    }

    match outcome {
        SyncOutcome::AlreadySynced => {
            println!("{}", "Already synchronized.".green());
        }
        SyncOutcome::Merged {
            version_vector,
            written,
        } => {
            println!("{}", "Contents match; metadata merged.".green());
            if verbosity == VerbosityLevel::Verbose {
                println!("   {} {}", "Version vector:".dimmed(), version_vector);
                println!("   {} {}", "Records written:".dimmed(), written);
            }
        }
        SyncOutcome::Updated {
            from,
            to,
            change,
            version_vector,
        } => {
            println!(
                "{}",
                format!("Updated {} from {}.", quoted(to), quoted(from)).green().bold()
            );
            if verbosity == VerbosityLevel::Verbose {
                println!("   {} {}", "Version vector:".dimmed(), version_vector);
                println!("   {} {}", "Files changed:".dimmed(), change.len());
            }
        }
    }
}
