use crate::{reader, types::FileFormat, utils::guess_file_format};
use anyhow::{anyhow, ensure, Context, Result};
use kitti_format::POINT_SIZE;
use std::{
    fs::{self, File},
    io::BufReader,
    path::Path,
};

pub fn info(file: impl AsRef<Path>) -> Result<()> {
    let file = file.as_ref();

    let format = guess_file_format(file)
        .ok_or_else(|| anyhow!("unable to guess file format of '{}'", file.display()))?;

    use FileFormat as F;
    match format {
        F::Ply => info_ply(file)?,
        F::Pcd => info_pcd(file)?,
        F::KittiBin => info_bin(file)?,
    }

    Ok(())
}

fn info_ply(path: &Path) -> Result<()> {
    let mut reader = BufReader::new(
        File::open(path).with_context(|| format!("unable to open file '{}'", path.display()))?,
    );
    let header = reader::read_ply_header(&mut reader)?;

    println!("points\t{}", header.point_count);
    println!();
    println!("name\ttype");
    header.properties.iter().for_each(|prop| {
        println!("{}\t{}", prop.name, prop.ty);
    });

    Ok(())
}

fn info_pcd(path: &Path) -> Result<()> {
    let reader = pcd_rs::DynReader::open(path)?;
    let fields = &reader.meta().field_defs;

    println!("name\ttype\tcount");
    fields.iter().for_each(|field| {
        let pcd_rs::FieldDef {
            ref name,
            kind,
            count,
        } = *field;

        println!("{}\t{:?}\t{}", name, kind, count);
    });

    Ok(())
}

fn info_bin(path: &Path) -> Result<()> {
    let len = fs::metadata(path)
        .with_context(|| format!("unable to read file '{}'", path.display()))?
        .len() as usize;
    ensure!(
        len % POINT_SIZE == 0,
        "file length {len} is not a multiple of the {POINT_SIZE}-byte record size"
    );

    println!("points\t{}", len / POINT_SIZE);

    Ok(())
}
