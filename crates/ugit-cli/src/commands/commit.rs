use anyhow::{bail, Result};
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short = 'm', long)]
    message: Option<String>,
}

pub fn run(args: &CommitArgs) -> Result<i32> {
    let Some(message) = &args.message else {
        bail!("a commit message is required (-m)");
    };
    let repo = open_repo()?;
    let oid = repo.commit(message)?;
    println!("{oid}");
    Ok(0)
}
