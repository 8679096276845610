use std::fs;
use std::path::Path;

use crate::discover::{DiscoveredRoot, METADATA_DIR_NAME};
use crate::RepoError;

/// Create the `.ugit` directory skeleton at `path` and write `HEAD` pointing
/// at `refs/heads/main`. Re-running this on an existing repository is a
/// no-op — it never overwrites `HEAD` or touches existing objects.
pub fn init(path: impl AsRef<Path>) -> Result<DiscoveredRoot, RepoError> {
    let work_tree = path.as_ref().to_path_buf();
    let ugit_dir = work_tree.join(METADATA_DIR_NAME);

    if ugit_dir.join("HEAD").is_file() {
        return Ok(DiscoveredRoot { work_tree, ugit_dir });
    }

    fs::create_dir_all(ugit_dir.join("objects"))?;
    fs::create_dir_all(ugit_dir.join("refs").join("heads"))?;
    fs::create_dir_all(ugit_dir.join("refs").join("tags"))?;
    fs::create_dir_all(ugit_dir.join("refs").join("remote"))?;
    fs::write(ugit_dir.join("HEAD"), b"ref: refs/heads/main\n")?;

    tracing::info!(path = %work_tree.display(), "initialized repository");
    Ok(DiscoveredRoot { work_tree, ugit_dir })
}
