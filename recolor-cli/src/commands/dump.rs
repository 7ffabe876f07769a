use std::path::Path;

use console::style;
use recolor::workflow;

pub fn execute(dir: &Path, output: &Path) -> anyhow::Result<()> {
    // Preflight the output tree so a permission problem surfaces before any
    // file is written, not partway through the dump.
    std::fs::create_dir_all(output)?;
    workflow::check_write_access(output)?;

    let bundle = dir.join(workflow::ICON_BUNDLE_FILE);
    println!(
        "Dumping icons from {} to {}",
        bundle.display(),
        output.display()
    );
    let written = workflow::dump_icons(&bundle, output)?;
    println!("{} {written} icons written", style("✓").green());
    Ok(())
}
