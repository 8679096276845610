use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct ResetArgs {
    /// Commit to reset HEAD to
    commit: String,
}

pub fn run(args: &ResetArgs) -> Result<i32> {
    let repo = open_repo()?;
    repo.reset(&args.commit)?;
    Ok(0)
}
