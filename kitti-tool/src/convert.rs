use crate::{
    layout,
    opts::Convert,
    reader, split,
    types::PointCloud,
    utils::guess_file_format,
    writer,
};
use anyhow::{anyhow, ensure, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn convert(args: Convert) -> Result<()> {
    let Convert {
        input,
        from,
        output_dir,
        data_root,
        force,
        points_per_scene,
        seed,
    } = args;

    let format = match from {
        Some(format) => format,
        None => guess_file_format(&input).ok_or_else(|| {
            anyhow!(
                "cannot guess format of input file '{}'",
                input.display()
            )
        })?,
    };

    let out_dir = layout::validate_io_paths(&input, &data_root, &output_dir)?;

    if !force && layout::has_bin_files(&out_dir)? {
        eprintln!(
            "{} '{}' already holds frames; pass -f/--force to overwrite",
            style("warning:").yellow().bold(),
            out_dir.display(),
        );
        return Ok(());
    }

    let cloud = reader::reader_for(format)?.read_cloud(&input)?;
    if cloud.has_intensity() {
        verify_point_cloud(&cloud)?;
    }

    let ranges = split::plan_frames(cloud.len(), points_per_scene)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let progress = ProgressBar::new(ranges.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames")
            .expect("valid template"),
    );

    for (index, range) in ranges.iter().enumerate() {
        let frame = &cloud.points()[range.clone()];
        let synth = (!cloud.has_intensity()).then_some(&mut rng);
        writer::write_frame(&out_dir, index, frame, synth)?;
        progress.inc(1);
    }
    progress.finish();

    println!("wrote {} frames to '{}'", ranges.len(), out_dir.display());

    Ok(())
}

/// Every intensity must lie in [0, 1]; NaN fails. The column count is fixed
/// by the record type.
pub(crate) fn verify_point_cloud(cloud: &PointCloud) -> Result<()> {
    for point in cloud.points() {
        ensure!(
            (0.0..=1.0).contains(&point.intensity),
            "intensity {} out of range [0, 1]",
            point.intensity
        );
    }
    Ok(())
}
