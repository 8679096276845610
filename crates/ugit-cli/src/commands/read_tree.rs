use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct ReadTreeArgs {
    /// Tree (or commit) to load
    tree: String,
}

pub fn run(args: &ReadTreeArgs) -> Result<i32> {
    let repo = open_repo()?;
    let oid = repo.resolve_oid(&args.tree)?;

    let tree_oid = match repo.objects().read_object(&oid)? {
        ugit_object::Object::Commit(c) => c.tree,
        ugit_object::Object::Tree(_) => oid,
        ugit_object::Object::Blob(_) => anyhow::bail!("'{}' is not a tree-ish", args.tree),
    };

    let flat = ugit_tree::get_tree(repo.objects(), tree_oid)?;
    ugit_worktree::materialize(repo.objects(), repo.work_tree(), &flat)?;
    let mut index = repo.index().acquire()?;
    index.clear();
    index.extend(flat);
    Ok(0)
}
