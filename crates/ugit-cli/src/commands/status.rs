use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct StatusArgs {}

pub fn run(_args: &StatusArgs) -> Result<i32> {
    let repo = open_repo()?;

    match repo.refs().get_ref_raw("HEAD")? {
        Some(ugit_ref::RefValue::Symbolic(target)) => {
            let branch = target.strip_prefix("refs/heads/").unwrap_or(&target);
            println!("On branch {branch}");
        }
        Some(ugit_ref::RefValue::Direct(oid)) => println!("HEAD detached at {oid}"),
        None => println!("No commits yet"),
    }

    if repo.refs().get_oid("MERGE_HEAD")?.is_some() {
        println!("You have unmerged paths (run 'ugit commit' after resolving conflicts).");
    }

    let index = repo.index().acquire()?;
    let working = ugit_worktree::snapshot_working_tree(repo.work_tree())?;
    let committed = match repo.refs().get_oid("HEAD")? {
        Some(oid) => match repo.objects().read_object(&oid)? {
            ugit_object::Object::Commit(commit) => ugit_tree::get_tree(repo.objects(), commit.tree)?,
            _ => ugit_tree::FlatTree::new(),
        },
        None => ugit_tree::FlatTree::new(),
    };

    println!("Changes to be committed:");
    for (path, kind) in ugit_tree::change_list(&committed, &index) {
        print_change("  ", path, kind);
    }

    println!("Changes not staged for commit:");
    let mut untracked = Vec::new();
    for (path, kind) in ugit_tree::change_list(&index, &working) {
        if kind == ugit_tree::ChangeKind::Created {
            untracked.push(path);
        } else {
            print_change("  ", path, kind);
        }
    }

    if !untracked.is_empty() {
        println!("Untracked files:");
        for path in untracked {
            println!("  {path}");
        }
    }

    Ok(0)
}

fn print_change(indent: &str, path: String, kind: ugit_tree::ChangeKind) {
    let label = match kind {
        ugit_tree::ChangeKind::Created => "new file:",
        ugit_tree::ChangeKind::Deleted => "deleted:",
        ugit_tree::ChangeKind::Modified => "modified:",
    };
    println!("{indent}{label:<10} {path}");
}
