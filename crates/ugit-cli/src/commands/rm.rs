use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct RmArgs {
    /// Keep the file in the working tree; only unstage it
    #[arg(long)]
    cached: bool,

    /// Files to remove
    files: Vec<String>,
}

pub fn run(args: &RmArgs) -> Result<i32> {
    let repo = open_repo()?;
    let mut index = repo.index().acquire()?;

    for path in &args.files {
        index.remove(path.as_str());
        if !args.cached {
            let full_path = repo.work_tree().join(path);
            if full_path.is_file() {
                std::fs::remove_file(&full_path)?;
            }
        }
    }
    Ok(0)
}
