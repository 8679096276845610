use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;
use ugit_object::Object;

use super::open_repo;

#[derive(Args)]
pub struct ShowArgs {
    /// Commit to show (defaults to HEAD)
    object: Option<String>,
}

pub fn run(args: &ShowArgs) -> Result<i32> {
    let repo = open_repo()?;
    let name = args.object.as_deref().unwrap_or("@");
    let oid = repo.resolve_oid(name)?;

    let Object::Commit(commit) = repo.objects().read_object(&oid)? else {
        anyhow::bail!("'{name}' is not a commit");
    };

    println!("commit {oid}");
    for parent in &commit.parents {
        println!("parent {parent}");
    }
    println!();
    for line in commit.message.lines() {
        println!("    {}", String::from_utf8_lossy(line));
    }
    println!();

    let tree = ugit_tree::get_tree(repo.objects(), commit.tree)?;
    let before = match commit.parents.first() {
        Some(parent) => match repo.objects().read_object(parent)? {
            Object::Commit(parent_commit) => ugit_tree::get_tree(repo.objects(), parent_commit.tree)?,
            _ => ugit_tree::FlatTree::new(),
        },
        None => ugit_tree::FlatTree::new(),
    };

    for (path, kind) in ugit_tree::change_list(&before, &tree) {
        let marker = match kind {
            ugit_tree::ChangeKind::Created => "A",
            ugit_tree::ChangeKind::Deleted => "D",
            ugit_tree::ChangeKind::Modified => "M",
        };
        println!("{marker} {path}");
    }
    Ok(0)
}
