use crate::types::FileFormat;
use std::path::Path;

pub fn guess_file_format<P>(file: P) -> Option<FileFormat>
where
    P: AsRef<Path>,
{
    let file = file.as_ref();
    let ext = file.extension()?.to_str()?;

    let format = match ext {
        "ply" => FileFormat::Ply,
        "pcd" => FileFormat::Pcd,
        "bin" => FileFormat::KittiBin,
        _ => return None,
    };

    Some(format)
}
