use crate::types::{FileFormat, PointCloud};
use anyhow::{anyhow, bail, ensure, Context, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use itertools::Itertools;
use kitti_format::KittiPoint;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// A strategy for loading a point cloud file into memory.
///
/// There is one implementation per supported input format; the caller picks
/// one with [`reader_for`] based on the file extension.
pub trait CloudReader {
    fn read_cloud(&self, path: &Path) -> Result<PointCloud>;
}

pub fn reader_for(format: FileFormat) -> Result<Box<dyn CloudReader>> {
    let reader: Box<dyn CloudReader> = match format {
        FileFormat::Ply => Box::new(PlyReader),
        FileFormat::Pcd => Box::new(PcdReader),
        FileFormat::KittiBin => bail!("raw lidar frames cannot be used as conversion input"),
    };

    Ok(reader)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    F32,
    F64,
}

impl ScalarType {
    pub fn byte_size(self) -> usize {
        match self {
            ScalarType::F32 => 4,
            ScalarType::F64 => 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlyProperty {
    pub name: String,
    pub ty: String,
}

/// Header of a self-describing binary PLY file: declarative text lines
/// terminated by an `end_header` sentinel, followed by the raw payload.
#[derive(Debug, Clone)]
pub struct PlyHeader {
    pub point_count: usize,
    pub scalar: ScalarType,
    pub properties: Vec<PlyProperty>,
}

/// Reads header lines from `reader` until the sentinel, leaving the reader
/// positioned at the first payload byte.
pub fn read_ply_header<R>(reader: &mut R) -> Result<PlyHeader>
where
    R: BufRead,
{
    let mut point_count: Option<usize> = None;
    let mut scalar: Option<ScalarType> = None;
    let mut properties = vec![];
    let mut in_vertex_element = false;
    let mut line = Vec::new();

    loop {
        line.clear();
        let count = reader.read_until(b'\n', &mut line)?;
        ensure!(count > 0, "missing 'end_header' line");

        let text = std::str::from_utf8(&line).context("header is not valid text")?;
        let mut tokens = text.split_whitespace();

        match tokens.next() {
            Some("end_header") => break,
            Some("format") => {
                let format = tokens.next().unwrap_or("");
                ensure!(
                    format == "binary_little_endian",
                    "unsupported format '{format}', only binary_little_endian is supported"
                );
            }
            Some("element") => {
                in_vertex_element = tokens.next() == Some("vertex");
                if in_vertex_element {
                    let count = tokens
                        .next()
                        .ok_or_else(|| anyhow!("'element vertex' line lacks a count"))?;
                    let count: usize = count
                        .parse()
                        .with_context(|| format!("invalid point count '{count}'"))?;
                    point_count = Some(count);
                }
            }
            Some("property") if in_vertex_element => {
                let ty = tokens
                    .next()
                    .ok_or_else(|| anyhow!("property line lacks a type"))?;
                let name = tokens.next().unwrap_or("").to_string();

                let width = match ty {
                    "float" | "float32" => ScalarType::F32,
                    "double" | "float64" => ScalarType::F64,
                    _ => bail!("unsupported property type '{ty}'"),
                };
                if let Some(prev) = scalar {
                    ensure!(
                        prev == width,
                        "header mixes float and double properties"
                    );
                }
                scalar = Some(width);

                properties.push(PlyProperty {
                    name,
                    ty: ty.to_string(),
                });
            }
            _ => {
                // "ply" magic, comments, properties of other elements.
            }
        }
    }

    let point_count = point_count
        .filter(|&count| count > 0)
        .ok_or_else(|| anyhow!("failed to determine the point count from the header"))?;

    Ok(PlyHeader {
        point_count,
        scalar: scalar.unwrap_or(ScalarType::F32),
        properties,
    })
}

/// Reader for the self-describing binary PLY format. The payload is decoded
/// with the scalar width declared in the header and carries intensity as the
/// fourth column.
pub struct PlyReader;

impl CloudReader for PlyReader {
    fn read_cloud(&self, path: &Path) -> Result<PointCloud> {
        let mut reader = BufReader::new(
            File::open(path).with_context(|| format!("unable to open file '{}'", path.display()))?,
        );

        let header = read_ply_header(&mut reader)
            .with_context(|| format!("malformed header in '{}'", path.display()))?;

        let mut payload = Vec::new();
        reader.read_to_end(&mut payload)?;

        let scalars = decode_scalars(&payload, header.scalar)?;
        ensure!(
            scalars.len() == header.point_count * 4,
            "expected {} points with 4 features each, got {} values",
            header.point_count,
            scalars.len(),
        );

        let points = scalars
            .into_iter()
            .tuples()
            .map(|(x, y, z, intensity)| KittiPoint::new(x, y, z, intensity))
            .collect();

        Ok(PointCloud::with_intensity(points))
    }
}

fn decode_scalars(payload: &[u8], scalar: ScalarType) -> Result<Vec<f32>> {
    let width = scalar.byte_size();
    ensure!(
        payload.len() % width == 0,
        "payload length {} is not a multiple of the {width}-byte scalar width",
        payload.len(),
    );

    let count = payload.len() / width;
    let mut cursor = payload;

    let scalars = match scalar {
        ScalarType::F32 => {
            let mut values = vec![0f32; count];
            cursor.read_f32_into::<LittleEndian>(&mut values)?;
            values
        }
        ScalarType::F64 => {
            let mut values = vec![0f64; count];
            cursor.read_f64_into::<LittleEndian>(&mut values)?;
            values.into_iter().map(|value| value as f32).collect()
        }
    };

    Ok(scalars)
}

/// Reader that delegates to pcd-rs and keeps 3D positions only. The files
/// carry no usable intensity, so the column is synthesized at write time.
pub struct PcdReader;

impl CloudReader for PcdReader {
    fn read_cloud(&self, path: &Path) -> Result<PointCloud> {
        let reader = pcd_rs::DynReader::open(path)
            .with_context(|| format!("unable to open file '{}'", path.display()))?;

        let positions: Vec<[f32; 3]> = reader
            .map(|record| -> Result<_> {
                let record = record?;
                record
                    .to_xyz()
                    .ok_or_else(|| anyhow!("no x, y or z field found"))
            })
            .try_collect()?;

        Ok(PointCloud::from_positions(positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ply_bytes(header: &str, scalars: &[f32]) -> Vec<u8> {
        let mut bytes = header.as_bytes().to_vec();
        for value in scalars {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    const VERTEX_HEADER: &str = "ply\n\
        format binary_little_endian 1.0\n\
        element vertex 10\n\
        property float x\n\
        property float y\n\
        property float z\n\
        property float intensity\n\
        end_header\n";

    #[test]
    fn parses_declared_point_count_and_payload() {
        let scalars: Vec<f32> = (0..40).map(|v| v as f32 / 40.0).collect();
        let file = write_temp(&ply_bytes(VERTEX_HEADER, &scalars));

        let cloud = PlyReader.read_cloud(file.path()).unwrap();

        assert_eq!(cloud.len(), 10);
        assert!(cloud.has_intensity());
        assert_eq!(
            cloud.points()[0],
            KittiPoint::new(0.0, 1.0 / 40.0, 2.0 / 40.0, 3.0 / 40.0)
        );
        assert_eq!(cloud.points()[9].intensity, 39.0 / 40.0);
    }

    #[test]
    fn narrows_double_payload_to_f32() {
        let header = "ply\n\
            format binary_little_endian 1.0\n\
            element vertex 2\n\
            property double x\n\
            property double y\n\
            property double z\n\
            property double intensity\n\
            end_header\n";
        let mut bytes = header.as_bytes().to_vec();
        for value in [1.0f64, 2.0, 3.0, 0.5, 4.0, 5.0, 6.0, 0.25] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        let file = write_temp(&bytes);

        let cloud = PlyReader.read_cloud(file.path()).unwrap();

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.points()[0], KittiPoint::new(1.0, 2.0, 3.0, 0.5));
        assert_eq!(cloud.points()[1], KittiPoint::new(4.0, 5.0, 6.0, 0.25));
    }

    #[test]
    fn rejects_header_without_point_count() {
        let header = "ply\n\
            format binary_little_endian 1.0\n\
            end_header\n";
        let file = write_temp(&ply_bytes(header, &[1.0, 2.0, 3.0, 0.5]));

        let err = PlyReader.read_cloud(file.path()).unwrap_err();
        assert!(format!("{err:?}").contains("point count"));
    }

    #[test]
    fn rejects_payload_count_mismatch() {
        // Declares 10 points but carries only 8.
        let scalars: Vec<f32> = vec![0.5; 8 * 4];
        let file = write_temp(&ply_bytes(VERTEX_HEADER, &scalars));

        let err = PlyReader.read_cloud(file.path()).unwrap_err();
        assert!(format!("{err:?}").contains("expected 10 points"));
    }

    #[test]
    fn rejects_ascii_format() {
        let header = "ply\n\
            format ascii 1.0\n\
            element vertex 1\n\
            property float x\n\
            end_header\n";
        let file = write_temp(header.as_bytes());

        assert!(PlyReader.read_cloud(file.path()).is_err());
    }

    #[test]
    fn rejects_truncated_header() {
        let file = write_temp(b"ply\nformat binary_little_endian 1.0\n");

        let err = PlyReader.read_cloud(file.path()).unwrap_err();
        assert!(format!("{err:?}").contains("end_header"));
    }

    #[test]
    fn pcd_reader_extracts_positions_only() {
        let pcd = "# .PCD v0.7 - Point Cloud Data file format\n\
            VERSION 0.7\n\
            FIELDS x y z\n\
            SIZE 4 4 4\n\
            TYPE F F F\n\
            COUNT 1 1 1\n\
            WIDTH 3\n\
            HEIGHT 1\n\
            VIEWPOINT 0 0 0 1 0 0 0\n\
            POINTS 3\n\
            DATA ascii\n\
            1 2 3\n\
            4 5 6\n\
            7 8 9\n";
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.pcd");
        std::fs::write(&path, pcd).unwrap();

        let cloud = PcdReader.read_cloud(&path).unwrap();

        assert_eq!(cloud.len(), 3);
        assert!(!cloud.has_intensity());
        assert_eq!(cloud.points()[2], KittiPoint::new(7.0, 8.0, 9.0, 0.0));
    }
}
