use clap::ValueEnum;
use kitti_format::KittiPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum FileFormat {
    #[value(name = "ply")]
    Ply,
    #[value(name = "pcd")]
    Pcd,
    #[value(name = "bin")]
    KittiBin,
}

/// In-memory point cloud, one record per row.
///
/// `has_intensity` tells whether the source file carried a real intensity
/// channel. Position-only sources leave the column zeroed and the writer
/// synthesizes values for it later.
#[derive(Debug, Clone)]
pub struct PointCloud {
    points: Vec<KittiPoint>,
    has_intensity: bool,
}

impl PointCloud {
    pub fn with_intensity(points: Vec<KittiPoint>) -> Self {
        Self {
            points,
            has_intensity: true,
        }
    }

    pub fn from_positions(positions: Vec<[f32; 3]>) -> Self {
        let points = positions
            .into_iter()
            .map(|[x, y, z]| KittiPoint::new(x, y, z, 0.0))
            .collect();
        Self {
            points,
            has_intensity: false,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn has_intensity(&self) -> bool {
        self.has_intensity
    }

    pub fn points(&self) -> &[KittiPoint] {
        &self.points
    }
}
