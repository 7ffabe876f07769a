use std::path::Path;

use console::style;
use recolor::workflow;

pub fn execute(dir: &Path, input: &Path) -> anyhow::Result<()> {
    workflow::check_write_access(dir)?;

    let bundle = dir.join(workflow::ICON_BUNDLE_FILE);
    println!(
        "Importing icons from {} into {}",
        input.display(),
        bundle.display()
    );
    let (update, report) = workflow::import_icons(&bundle, input)?;

    for key in &report.replaced {
        println!("  {} {key}", style("replaced").green());
    }
    for stray in &report.strays {
        println!(
            "  {} {} matches no icon resource",
            style("ignored").yellow(),
            stray.display()
        );
    }

    update.commit()?;
    println!(
        "{} {} of {} icons replaced",
        style("✓").green(),
        report.replaced.len(),
        report.examined
    );
    Ok(())
}
