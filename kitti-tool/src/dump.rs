use crate::{opts::Dump, reader, types::FileFormat, utils::guess_file_format, writer};
use anyhow::{anyhow, Result};
use std::path::Path;

pub fn dump(args: Dump) -> Result<()> {
    let Dump { input, format } = args;

    let format = match format {
        Some(format) => format,
        None => guess_file_format(&input)
            .ok_or_else(|| anyhow!("unable to guess file format of '{}'", input.display()))?,
    };

    use FileFormat as F;
    match format {
        F::Ply | F::Pcd => dump_cloud(format, &input)?,
        F::KittiBin => dump_bin(&input)?,
    }

    Ok(())
}

fn dump_cloud(format: FileFormat, path: &Path) -> Result<()> {
    let cloud = reader::reader_for(format)?.read_cloud(path)?;

    for point in cloud.points() {
        println!("{point:?}");
    }

    Ok(())
}

fn dump_bin(path: &Path) -> Result<()> {
    for point in writer::load_bin_iter(path)? {
        let point = point?;
        println!("{point:?}");
    }

    Ok(())
}
