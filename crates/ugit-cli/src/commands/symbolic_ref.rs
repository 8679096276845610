use anyhow::Result;
use clap::Args;

use super::open_repo;

#[derive(Args)]
pub struct SymbolicRefArgs {
    /// The symbolic ref to read or write (e.g. HEAD)
    name: String,

    /// The target ref name to point `name` at; omit to read the current value
    target: Option<String>,
}

pub fn run(args: &SymbolicRefArgs) -> Result<i32> {
    let repo = open_repo()?;
    match &args.target {
        Some(target) => {
            repo.refs().set_symbolic(&args.name, target)?;
            Ok(0)
        }
        None => match repo.refs().get_ref_raw(&args.name)? {
            Some(ugit_ref::RefValue::Symbolic(target)) => {
                println!("{target}");
                Ok(0)
            }
            Some(ugit_ref::RefValue::Direct(_)) => {
                anyhow::bail!("ref {} is not symbolic", args.name)
            }
            None => anyhow::bail!("ref {} not found", args.name),
        },
    }
}
