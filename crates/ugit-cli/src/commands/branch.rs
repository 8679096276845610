use anyhow::{bail, Result};
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct BranchArgs {
    /// Delete a branch
    #[arg(short, long)]
    delete: bool,

    /// Name of the branch to create, or to delete with --delete
    name: Option<String>,

    /// Commit the new branch should point at (defaults to HEAD)
    start_point: Option<String>,
}

pub fn run(args: &BranchArgs) -> Result<i32> {
    let repo = open_repo()?;

    if args.delete {
        let name = args.name.as_deref().ok_or_else(|| anyhow::anyhow!("branch name required"))?;
        repo.refs().delete_ref(&format!("refs/heads/{name}"), false)?;
        return Ok(0);
    }

    match &args.name {
        Some(name) => {
            let refname = format!("refs/heads/{name}");
            if repo.refs().get_oid(&refname)?.is_some() {
                bail!("a branch named '{name}' already exists");
            }
            let start = args.start_point.as_deref().unwrap_or("@");
            let oid = repo.resolve_oid(start)?;
            repo.refs().update_ref(&refname, oid, false)?;
            Ok(0)
        }
        None => {
            let current = repo.refs().get_ref_raw("HEAD")?;
            let current_branch = match &current {
                Some(ugit_ref::RefValue::Symbolic(target)) => {
                    target.strip_prefix("refs/heads/").map(str::to_string)
                }
                _ => None,
            };
            for (name, _) in repo.refs().iter_refs("refs/heads")? {
                let short = name.strip_prefix("refs/heads/").unwrap_or(&name);
                let marker = if current_branch.as_deref() == Some(short) { "* " } else { "  " };
                println!("{marker}{short}");
            }
            Ok(0)
        }
    }
}
