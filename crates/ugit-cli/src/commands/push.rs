use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct PushArgs {
    /// Path to the peer repository
    peer: PathBuf,

    /// Reference to push (defaults to refs/heads/main)
    #[arg(default_value = "refs/heads/main")]
    refname: String,
}

pub fn run(args: &PushArgs) -> Result<i32> {
    let repo = open_repo()?;
    let peer = ugit_repository::Repository::discover(&args.peer)?;
    repo.push(&peer, &args.refname)?;
    Ok(0)
}
