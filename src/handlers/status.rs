//! Status command handler

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use super::quoted;
use crate::confirm::print_change;
use crate::sync::TreeStatus;
use crate::VerbosityLevel;

/// Handle `vector-sync status [--path DIR]`
///
/// Shows the tree's id, its recorded and projected version vectors and what
/// changed locally since the last sync.
pub fn handle_status(path: &Path, verbosity: VerbosityLevel) -> Result<()> {
    let status = TreeStatus::read(path)
        .with_context(|| format!("Failed to read tree at {}", path.display()))?;

    if verbosity == VerbosityLevel::Quiet {
        if status.is_modified() {
            println!("{}", "modified".yellow());
        }
        return Ok(());
    }

    println!("{}", "=== Tree Status ===".bold().cyan());
    println!("  {} {}", "Tree:".bold(), quoted(&status.id));
    println!("  {} {}", "Path:".bold(), status.path.display());
    println!("  {} {}", "Recorded:".bold(), status.pre_vv);
    println!("  {} {}", "Projected:".bold(), status.post_vv);
    println!("  {} {}", "Files:".bold(), status.disk_hashes.len());
    println!();

    if !status.is_modified() {
        println!("{}", "No local changes since the last sync.".green());
        return Ok(());
    }

    let change = status.pending_change();
    println!(
        "{}",
        format!("{} local changes since the last sync:", change.len()).yellow()
    );
    if verbosity == VerbosityLevel::Verbose {
        println!();
        print_change(&change);
    }

    Ok(())
}
