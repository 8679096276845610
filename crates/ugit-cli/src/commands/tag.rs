use anyhow::{bail, Result};
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct TagArgs {
    /// Name of the tag to create
    name: String,

    /// Commit the tag should point at (defaults to HEAD)
    object: Option<String>,
}

pub fn run(args: &TagArgs) -> Result<i32> {
    let repo = open_repo()?;
    let refname = format!("refs/tags/{}", args.name);
    if repo.refs().get_oid(&refname)?.is_some() {
        bail!("tag '{}' already exists", args.name);
    }
    let start = args.object.as_deref().unwrap_or("@");
    let oid = repo.resolve_oid(start)?;
    repo.refs().update_ref(&refname, oid, false)?;
    Ok(0)
}
