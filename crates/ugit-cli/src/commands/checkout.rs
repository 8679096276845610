use anyhow::{bail, Result};
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct CheckoutArgs {
    /// Branch, tag, or object id to check out
    name: String,
}

pub fn run(args: &CheckoutArgs) -> Result<i32> {
    let repo = open_repo()?;
    repo.checkout(&args.name)?;
    Ok(0)
}

#[derive(Args)]
pub struct SwitchArgs {
    /// Branch to switch to
    name: String,
}

pub fn run_switch(args: &SwitchArgs) -> Result<i32> {
    let repo = open_repo()?;
    if repo.resolve(&args.name)?.is_branch().is_none() {
        bail!("'{}' is not a branch", args.name);
    }
    repo.checkout(&args.name)?;
    Ok(0)
}
