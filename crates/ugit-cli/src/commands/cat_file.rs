use anyhow::{bail, Result};
use clap::Args;
use ugit_object::{Object, ObjectType};

use super::open_repo;

#[derive(Args)]
pub struct CatFileArgs {
    /// Show the object's type
    #[arg(short = 't')]
    show_type: bool,

    /// Show the object's size in bytes
    #[arg(short = 's')]
    show_size: bool,

    /// Pretty-print the object's content
    #[arg(short = 'p')]
    pretty: bool,

    /// The object to inspect
    object: String,
}

pub fn run(args: &CatFileArgs) -> Result<i32> {
    let repo = open_repo()?;
    let oid = repo.resolve_oid(&args.object)?;
    let object = repo.objects().read_object(&oid)?;

    if args.show_type {
        println!("{}", object.object_type());
        return Ok(0);
    }
    if args.show_size {
        println!("{}", object.serialize_content().len());
        return Ok(0);
    }
    if args.pretty {
        match &object {
            Object::Blob(b) => {
                use std::io::Write;
                std::io::stdout().write_all(b.serialize_content())?;
            }
            Object::Tree(t) => {
                for entry in &t.entries {
                    let kind = match entry.kind {
                        ugit_object::EntryKind::Blob => ObjectType::Blob,
                        ugit_object::EntryKind::Tree => ObjectType::Tree,
                    };
                    println!("{kind} {} {}", entry.oid, entry.name);
                }
            }
            Object::Commit(c) => {
                println!("tree {}", c.tree);
                for parent in &c.parents {
                    println!("parent {parent}");
                }
                println!();
                print!("{}", c.message);
            }
        }
        return Ok(0);
    }
    bail!("one of -t, -s, or -p is required");
}
