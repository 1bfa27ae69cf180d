use anyhow::{Context, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use kitti_format::KittiPoint;
use rand::Rng;
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    iter,
    path::{Path, PathBuf},
};

/// Buffered writer for raw lidar frame files. `finish` flushes; dropping
/// without `finish` flushes best-effort.
pub struct RawBinWriter {
    writer: Option<BufWriter<File>>,
}

impl RawBinWriter {
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let writer = BufWriter::new(File::create(path)?);
        Ok(Self {
            writer: Some(writer),
        })
    }

    pub fn push(&mut self, point: KittiPoint) -> io::Result<()> {
        let writer = self.writer.as_mut().unwrap();
        writer.write_all(&point.to_le_bytes())
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.writer.take().unwrap().flush()
    }
}

impl Drop for RawBinWriter {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

/// Writes one frame to `<dir>/<index>.bin` as raw little-endian f32 rows.
///
/// With `synth`, the intensity column is replaced by uniform draws from the
/// given generator; the caller seeds it once per conversion so that reruns
/// reproduce identical bytes.
pub fn write_frame<R>(
    dir: &Path,
    index: usize,
    frame: &[KittiPoint],
    mut synth: Option<&mut R>,
) -> Result<PathBuf>
where
    R: Rng,
{
    let path = dir.join(format!("{index}.bin"));
    let mut writer = RawBinWriter::from_path(&path)
        .with_context(|| format!("unable to create file '{}'", path.display()))?;

    for &point in frame {
        let point = match synth.as_deref_mut() {
            Some(rng) => KittiPoint {
                intensity: rng.gen_range(0.0..=1.0),
                ..point
            },
            None => point,
        };
        writer.push(point)?;
    }

    writer.finish()?;
    Ok(path)
}

/// Streams the records of a written frame file back out.
pub fn load_bin_iter<P>(path: P) -> Result<impl Iterator<Item = Result<KittiPoint>>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut input = BufReader::new(
        File::open(path).with_context(|| format!("Failed to open file {}", path.display()))?,
    );

    let mut next = move || -> Result<Option<KittiPoint>> {
        let Some(x) = try_read_f32(&mut input)? else {
            return Ok(None);
        };
        let y = input.read_f32::<LittleEndian>()?;
        let z = input.read_f32::<LittleEndian>()?;
        let intensity = input.read_f32::<LittleEndian>()?;

        Ok(Some(KittiPoint::new(x, y, z, intensity)))
    };

    Ok(iter::from_fn(move || next().transpose()))
}

fn try_read_f32<R>(input: &mut R) -> io::Result<Option<f32>>
where
    R: Read,
{
    let mut buf = [0u8; 4];
    let cnt = input.read(&mut buf)?;

    match cnt {
        4 => Ok(Some(f32::from_le_bytes(buf))),
        0 => Ok(None),
        cnt => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Truncated f32 found. Expect 4 bytes, but read {cnt} bytes."),
        )),
    }
}
