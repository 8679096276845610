pub mod add;
pub mod branch;
pub mod cat_file;
pub mod checkout;
pub mod commit;
pub mod fetch;
pub mod hash_object;
pub mod init;
pub mod log;
pub mod merge;
pub mod merge_base;
pub mod push;
pub mod read_tree;
pub mod reset;
pub mod rm;
pub mod show;
pub mod show_ref;
pub mod status;
pub mod symbolic_ref;
pub mod tag;
pub mod update_ref;
pub mod write_tree;

use anyhow::Result;
use clap::Subcommand;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty repository
    Init(init::InitArgs),
    /// Compute an object id, and optionally write the object
    HashObject(hash_object::HashObjectArgs),
    /// Print the content or type of a repository object
    CatFile(cat_file::CatFileArgs),
    /// Write the staged index out as a tree object
    WriteTree(write_tree::WriteTreeArgs),
    /// Load a tree into the index and working tree
    ReadTree(read_tree::ReadTreeArgs),
    /// Stage a file's current content
    Add(add::AddArgs),
    /// Unstage a file, optionally removing it from the working tree
    Rm(rm::RmArgs),
    /// Record the staged index as a new commit
    Commit(commit::CommitArgs),
    /// Show commit history reachable from a starting point
    Log(log::LogArgs),
    /// Show a commit or object
    Show(show::ShowArgs),
    /// List, create, or delete branches
    Branch(branch::BranchArgs),
    /// Create a tag
    Tag(tag::TagArgs),
    /// Switch the working tree and HEAD to a commit
    Checkout(checkout::CheckoutArgs),
    /// Switch to a branch (checkout restricted to branches)
    Switch(checkout::SwitchArgs),
    /// Move HEAD to a commit without touching the working tree
    Reset(reset::ResetArgs),
    /// Merge another commit into HEAD
    Merge(merge::MergeArgs),
    /// Print the common ancestor of two commits
    MergeBase(merge_base::MergeBaseArgs),
    /// Show changes between the index and the working tree
    Status(status::StatusArgs),
    /// List references
    ShowRef(show_ref::ShowRefArgs),
    /// Read or set a symbolic reference
    SymbolicRef(symbolic_ref::SymbolicRefArgs),
    /// Directly set a reference's value
    UpdateRef(update_ref::UpdateRefArgs),
    /// Download objects and refs from another repository
    Fetch(fetch::FetchArgs),
    /// Push a local ref to another repository
    Push(push::PushArgs),
}

/// Open the repository, honoring `UGIT_DIR` (handled inside `ugit-repository`)
/// and otherwise discovering it upward from the current directory.
pub fn open_repo() -> Result<ugit_repository::Repository> {
    Ok(ugit_repository::Repository::discover(".")?)
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args),
        Commands::HashObject(args) => hash_object::run(args),
        Commands::CatFile(args) => cat_file::run(args),
        Commands::WriteTree(args) => write_tree::run(args),
        Commands::ReadTree(args) => read_tree::run(args),
        Commands::Add(args) => add::run(args),
        Commands::Rm(args) => rm::run(args),
        Commands::Commit(args) => commit::run(args),
        Commands::Log(args) => log::run(args),
        Commands::Show(args) => show::run(args),
        Commands::Branch(args) => branch::run(args),
        Commands::Tag(args) => tag::run(args),
        Commands::Checkout(args) => checkout::run(args),
        Commands::Switch(args) => checkout::run_switch(args),
        Commands::Reset(args) => reset::run(args),
        Commands::Merge(args) => merge::run(args),
        Commands::MergeBase(args) => merge_base::run(args),
        Commands::Status(args) => status::run(args),
        Commands::ShowRef(args) => show_ref::run(args),
        Commands::SymbolicRef(args) => symbolic_ref::run(args),
        Commands::UpdateRef(args) => update_ref::run(args),
        Commands::Fetch(args) => fetch::run(args),
        Commands::Push(args) => push::run(args),
    }
}
