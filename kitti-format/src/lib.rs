use serde::{Deserialize, Serialize};

/// Number of bytes of one encoded point record.
pub const POINT_SIZE: usize = 16;

/// One point of a KITTI lidar frame. Frame files store these records
/// back to back as little-endian f32 quadruples, without any header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KittiPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Sensor return strength, expected in [0, 1].
    pub intensity: f32,
}

impl KittiPoint {
    pub fn new(x: f32, y: f32, z: f32, intensity: f32) -> Self {
        Self { x, y, z, intensity }
    }

    pub fn to_le_bytes(&self) -> [u8; POINT_SIZE] {
        let mut bytes = [0u8; POINT_SIZE];
        let fields = [self.x, self.y, self.z, self.intensity];
        for (chunk, val) in bytes.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&val.to_le_bytes());
        }
        bytes
    }

    pub fn from_le_bytes(bytes: [u8; POINT_SIZE]) -> Self {
        let mut fields = [0f32; 4];
        for (chunk, val) in bytes.chunks_exact(4).zip(fields.iter_mut()) {
            *val = f32::from_le_bytes(chunk.try_into().unwrap());
        }
        let [x, y, z, intensity] = fields;
        Self { x, y, z, intensity }
    }
}

impl From<[f32; 4]> for KittiPoint {
    fn from([x, y, z, intensity]: [f32; 4]) -> Self {
        Self { x, y, z, intensity }
    }
}

impl From<KittiPoint> for [f32; 4] {
    fn from(point: KittiPoint) -> Self {
        [point.x, point.y, point.z, point.intensity]
    }
}
