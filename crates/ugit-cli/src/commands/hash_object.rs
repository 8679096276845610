use std::io::Read;

use anyhow::Result;
use clap::Args;
use ugit_hash::Hasher;
use ugit_object::ObjectType;

use super::open_repo;

#[derive(Args)]
pub struct HashObjectArgs {
    /// Object type to hash as
    #[arg(short = 't', default_value = "blob")]
    obj_type: ObjectType,

    /// Actually write the object into the object database
    #[arg(short = 'w')]
    write: bool,

    /// Read the object content from stdin instead of a file
    #[arg(long)]
    stdin: bool,

    /// File to hash
    file: Option<String>,
}

pub fn run(args: &HashObjectArgs) -> Result<i32> {
    let mut data = Vec::new();
    if args.stdin || args.file.is_none() {
        std::io::stdin().read_to_end(&mut data)?;
    } else {
        data = std::fs::read(args.file.as_ref().unwrap())?;
    }

    if args.write {
        let repo = open_repo()?;
        let oid = repo.objects().hash_object(args.obj_type, &data)?;
        println!("{oid}");
    } else {
        let (oid, _) = Hasher::hash_object(args.obj_type.to_string().as_str(), &data);
        println!("{oid}");
    }
    Ok(0)
}
