use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;
use ugit_object::Object;

use super::open_repo;

#[derive(Args)]
pub struct LogArgs {
    /// Starting point (defaults to HEAD)
    start: Option<String>,
}

pub fn run(args: &LogArgs) -> Result<i32> {
    let repo = open_repo()?;
    let start = args.start.as_deref().unwrap_or("@");
    let oid = repo.resolve_oid(start)?;

    for commit_oid in ugit_revwalk::iter_commits_and_parents(repo.objects(), [oid]) {
        let commit_oid = commit_oid?;
        let Object::Commit(commit) = repo.objects().read_object(&commit_oid)? else {
            continue;
        };
        println!("commit {commit_oid}");
        for parent in &commit.parents {
            println!("parent {parent}");
        }
        println!();
        for line in commit.message.lines() {
            println!("    {}", String::from_utf8_lossy(line));
        }
        println!();
    }
    Ok(0)
}
