use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct ShowRefArgs {
    /// Only list refs below this prefix (default: refs)
    prefix: Option<String>,
}

pub fn run(args: &ShowRefArgs) -> Result<i32> {
    let repo = open_repo()?;
    let prefix = args.prefix.as_deref().unwrap_or("refs");
    for (name, oid) in repo.refs().iter_refs(prefix)? {
        println!("{oid} {name}");
    }
    Ok(0)
}
