use anyhow::{bail, Result};
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct MergeBaseArgs {
    first: String,
    second: String,
}

pub fn run(args: &MergeBaseArgs) -> Result<i32> {
    let repo = open_repo()?;
    let a = repo.resolve_oid(&args.first)?;
    let b = repo.resolve_oid(&args.second)?;
    match ugit_revwalk::get_merge_base(repo.objects(), a, b)? {
        Some(oid) => {
            println!("{oid}");
            Ok(0)
        }
        None => bail!("no common ancestor"),
    }
}
