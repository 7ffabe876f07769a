use std::path::Path;

use console::style;

pub fn execute(dir: &Path) -> anyhow::Result<()> {
    println!("Checking write access to {}", dir.display());
    recolor::workflow::check_write_access(dir)?;
    println!("{} {} is writable", style("✓").green(), dir.display());
    Ok(())
}
