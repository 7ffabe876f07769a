use std::io::BufRead;
use std::path::Path;

use console::style;
use recolor::merge::{MergeOutcome, MergeReport};
use recolor::workflow::{self, PendingUpdate};

use super::exe_dir;

pub fn execute(
    dir: &Path,
    reference: Option<&Path>,
    terminate: bool,
    backup: Option<&Path>,
    pause: bool,
) -> anyhow::Result<()> {
    // Preflight before anything destructive: a read-only install directory
    // must abort with the application still running.
    workflow::check_write_access(dir)?;
    if terminate {
        recolor::install::terminate_app()?;
    }

    let target = dir.join(workflow::ICON_BUNDLE_FILE);
    let reference = match reference {
        Some(path) => path.to_path_buf(),
        None => exe_dir()?.join(workflow::REFERENCE_BUNDLE_FILE),
    };
    let backup_dir = match backup {
        Some(path) => path.to_path_buf(),
        None => exe_dir()?,
    };

    let saved = workflow::backup_file(&target, &backup_dir)?;
    println!("Backed up bundle to {}", saved.display());

    println!(
        "Merging colored icons from {} into {}",
        reference.display(),
        target.display()
    );
    let (update, report) = workflow::colorize_icons(&target, &reference)?;
    print_report(&report);

    commit(update, pause)?;
    println!(
        "{} {} icons restored, {} kept, {} failed",
        style("✓").green(),
        report.merged(),
        report.kept(),
        report.failed()
    );
    Ok(())
}

fn print_report(report: &MergeReport) {
    for record in &report.records {
        match &record.outcome {
            MergeOutcome::Merged => {
                println!("  {} {}", style("merged").green(), record.key);
            }
            MergeOutcome::KeptOriginal => {
                println!("  {} {}", style("kept").yellow(), record.key);
            }
            MergeOutcome::Failed(reason) => {
                println!("  {} {}: {}", style("failed").red(), record.key, reason);
            }
        }
    }
}

fn commit(update: PendingUpdate, pause: bool) -> anyhow::Result<()> {
    if pause {
        println!(
            "Press Enter to write the patched bundle to {}",
            update.target().display()
        );
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
    }
    update.commit()?;
    Ok(())
}
