use clap::Parser;
use std::path::PathBuf;

use crate::types::FileFormat;

#[derive(Debug, Clone, Parser)]
pub enum Opts {
    Info(Info),
    Convert(Convert),
    Dump(Dump),
}

/// Show structural metadata of a point cloud or frame file.
#[derive(Debug, Clone, Parser)]
pub struct Info {
    pub file: PathBuf,
}

/// Convert a raw point cloud into KITTI-formatted lidar frames.
#[derive(Debug, Clone, Parser)]
pub struct Convert {
    /// Path to the raw point cloud file.
    pub input: PathBuf,

    /// Input file format. Guessed from the file extension when omitted.
    #[clap(long)]
    pub from: Option<FileFormat>,

    /// Directory to write frames into, relative to the data root.
    #[clap(short, long, default_value = "val/lidar")]
    pub output_dir: PathBuf,

    /// Root of the KITTI directory tree.
    #[clap(long, default_value = "data")]
    pub data_root: PathBuf,

    /// Overwrite frames already present in the output directory.
    #[clap(short, long)]
    pub force: bool,

    /// Desired number of points per frame.
    #[clap(long, default_value_t = 100_000)]
    pub points_per_scene: usize,

    /// Seed for the synthesized intensity channel.
    #[clap(long, default_value_t = 42)]
    pub seed: u64,
}

/// Print the decoded records of a point cloud or frame file.
#[derive(Debug, Clone, Parser)]
pub struct Dump {
    pub input: PathBuf,

    #[clap(short, long)]
    pub format: Option<FileFormat>,
}
