use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to create the repository in (defaults to the current directory)
    directory: Option<PathBuf>,
}

pub fn run(args: &InitArgs) -> Result<i32> {
    let target = match &args.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    if !target.exists() {
        std::fs::create_dir_all(&target)?;
    }
    let repo = ugit_repository::Repository::init(&target)?;
    println!("Initialized empty ugit repository in {}", repo.ugit_dir().display());
    Ok(0)
}
