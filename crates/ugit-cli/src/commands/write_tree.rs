use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct WriteTreeArgs {}

pub fn run(_args: &WriteTreeArgs) -> Result<i32> {
    let repo = open_repo()?;
    let index = repo.index().acquire()?;
    let oid = ugit_tree::build_tree(repo.objects(), &index)?;
    println!("{oid}");
    Ok(0)
}
