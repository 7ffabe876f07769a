use std::path::Path;

use console::style;
use recolor::workflow;

use super::exe_dir;

pub fn execute(
    dir: &Path,
    img: &Path,
    terminate: bool,
    backup: Option<&Path>,
) -> anyhow::Result<()> {
    // Preflight before anything destructive: a read-only install directory
    // must abort with the application still running.
    workflow::check_write_access(dir)?;
    if terminate {
        recolor::install::terminate_app()?;
    }

    let bundle = dir.join(workflow::SPLASH_BUNDLE_FILE);
    let backup_dir = match backup {
        Some(path) => path.to_path_buf(),
        None => exe_dir()?,
    };
    let saved = workflow::backup_file(&bundle, &backup_dir)?;
    println!("Backed up bundle to {}", saved.display());

    println!(
        "Replacing splash image in {} with {}",
        bundle.display(),
        img.display()
    );
    workflow::replace_splash(&bundle, img)?.commit()?;
    println!("{} Splash image replaced", style("✓").green());
    Ok(())
}
