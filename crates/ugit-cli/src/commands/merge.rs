use anyhow::Result;
use clap::Args;
use ugit_repository::MergeOutcome;

use super::open_repo;

#[derive(Args)]
pub struct MergeArgs {
    /// Commit to merge into HEAD
    commit: String,
}

pub fn run(args: &MergeArgs) -> Result<i32> {
    let repo = open_repo()?;
    match repo.merge(&args.commit)? {
        MergeOutcome::FastForward => println!("Fast-forward"),
        MergeOutcome::Merged => {
            println!("Merge made; resolve any conflict markers and run 'ugit commit'.")
        }
    }
    Ok(0)
}
