use anyhow::{ensure, Result};
use console::style;
use std::ops::Range;

/// Plans the division of `num_points` rows into whole frames.
///
/// The frame count comes from integer division by `points_per_scene`; the
/// remainder rows are spread over the planned frames rather than dropped, so
/// frame sizes differ by at most one. A request larger than the cloud is
/// clamped to a single frame with a warning.
pub fn plan_frames(num_points: usize, points_per_scene: usize) -> Result<Vec<Range<usize>>> {
    ensure!(points_per_scene > 0, "points_per_scene must be positive");
    ensure!(num_points > 0, "the point cloud is empty");

    let points_per_scene = if points_per_scene > num_points {
        eprintln!(
            "{} points_per_scene ({points_per_scene}) exceeds the point count ({num_points}); using all points",
            style("warning:").yellow().bold(),
        );
        num_points
    } else {
        points_per_scene
    };

    let num_frames = num_points / points_per_scene;
    Ok(frame_ranges(num_points, num_frames))
}

/// Contiguous near-equal ranges covering `0..num_points`: the first
/// `num_points % num_frames` ranges hold one extra row.
fn frame_ranges(num_points: usize, num_frames: usize) -> Vec<Range<usize>> {
    let base = num_points / num_frames;
    let extra = num_points % num_frames;

    let mut ranges = Vec::with_capacity(num_frames);
    let mut start = 0;
    for index in 0..num_frames {
        let len = if index < extra { base + 1 } else { base };
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}
