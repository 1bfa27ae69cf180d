use anyhow::{ensure, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// KITTI directory set, relative to the data root.
///
/// ```text
/// <root>/
/// ├── train/
/// │   ├── lidar/   0.bin 1.bin ...
/// │   └── label/
/// └── val/
///     ├── lidar/
///     └── label/
/// ```
pub const KITTI_DIRECTORIES: [&str; 4] = ["train/lidar", "train/label", "val/lidar", "val/label"];

pub fn create_kitti_directories(root: &Path) -> Result<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(KITTI_DIRECTORIES.len());
    for dir in KITTI_DIRECTORIES {
        let dir = root.join(dir);
        fs::create_dir_all(&dir)
            .with_context(|| format!("unable to create directory {}", dir.display()))?;
        created.push(dir);
    }
    Ok(created)
}

pub fn is_kitti_dir(dir: &Path) -> bool {
    KITTI_DIRECTORIES.iter().any(|known| Path::new(known) == dir)
}

/// True when `dir` already holds at least one `.bin` frame.
pub fn has_bin_files(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("unable to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().map(|ext| ext == "bin").unwrap_or(false) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Checks the conversion endpoints and returns the absolute output
/// directory. The KITTI tree is created under `root` on first use.
pub fn validate_io_paths(input: &Path, root: &Path, output_dir: &Path) -> Result<PathBuf> {
    ensure!(input.exists(), "{} does not exist", input.display());
    ensure!(input.is_file(), "{} is not a file", input.display());
    ensure!(
        is_kitti_dir(output_dir),
        "{} is not a valid KITTI directory",
        output_dir.display()
    );

    create_kitti_directories(root)?;
    Ok(root.join(output_dir))
}
