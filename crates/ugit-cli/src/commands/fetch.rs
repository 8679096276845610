use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct FetchArgs {
    /// Path to the peer repository
    peer: PathBuf,
}

pub fn run(args: &FetchArgs) -> Result<i32> {
    let repo = open_repo()?;
    let peer = ugit_repository::Repository::discover(&args.peer)?;
    repo.fetch(&peer)?;
    Ok(0)
}
