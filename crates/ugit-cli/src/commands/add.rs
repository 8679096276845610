use anyhow::Result;
use clap::Args;
use ugit_object::{Blob, Object};

use super::open_repo;

#[derive(Args)]
pub struct AddArgs {
    /// Files to stage
    files: Vec<String>,
}

pub fn run(args: &AddArgs) -> Result<i32> {
    let repo = open_repo()?;
    let mut index = repo.index().acquire()?;

    for path in &args.files {
        let full_path = repo.work_tree().join(path);
        let content = std::fs::read(&full_path)?;
        let oid = repo
            .objects()
            .write_object(&Object::Blob(Blob::new(content)))?;
        index.insert(path.replace('\\', "/"), oid);
    }
    Ok(0)
}
