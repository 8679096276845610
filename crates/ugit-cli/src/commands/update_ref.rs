use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct UpdateRefArgs {
    /// Reference to update
    name: String,

    /// New value (a branch, tag, or object id)
    value: String,
}

pub fn run(args: &UpdateRefArgs) -> Result<i32> {
    let repo = open_repo()?;
    let oid = repo.resolve_oid(&args.value)?;
    repo.refs().update_ref(&args.name, oid, false)?;
    Ok(0)
}
