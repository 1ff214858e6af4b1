//! Rotation and scale of a square tile about its center

/// Similarity transform applied to a drawn tile
///
/// The tile is rotated by `angle` radians and scaled by `scale` about `center`,
/// then translated by `offset`. Drawing uses the inverse mapping so every
/// covered destination pixel samples exactly one tile pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePlacement {
    /// Destination center of the tile in layer coordinates
    pub center: (f64, f64),
    /// Rotation in radians
    pub angle: f64,
    /// Uniform scale factor
    pub scale: f64,
    /// Extra translation in layer pixels
    pub offset: (f64, f64),
}

impl TilePlacement {
    /// Placement with no rotation, unit scale and no offset
    pub const fn identity(center: (f64, f64)) -> Self {
        Self {
            center,
            angle: 0.0,
            scale: 1.0,
            offset: (0.0, 0.0),
        }
    }

    /// Same placement shifted by an additional offset
    #[must_use]
    pub const fn shifted(self, dx: f64, dy: f64) -> Self {
        Self {
            offset: (self.offset.0 + dx, self.offset.1 + dy),
            ..self
        }
    }

    /// Map a destination point back into tile-local coordinates
    ///
    /// Tile-local `(0, 0)` is the tile's top-left corner; a tile of edge `size`
    /// spans `[0, size)` on both axes.
    pub fn to_local(&self, x: f64, y: f64, size: (f64, f64)) -> (f64, f64) {
        let dx = x - self.center.0 - self.offset.0;
        let dy = y - self.center.1 - self.offset.1;
        let (sin, cos) = self.angle.sin_cos();
        let scale = if self.scale.abs() < f64::EPSILON {
            f64::EPSILON
        } else {
            self.scale
        };

        let lx = cos.mul_add(dx, sin * dy) / scale;
        let ly = (-sin).mul_add(dx, cos * dy) / scale;
        (lx + size.0 / 2.0, ly + size.1 / 2.0)
    }

    /// Inclusive destination pixel bounds touched by a tile of the given size
    ///
    /// Returned as `(min_x, min_y, max_x, max_y)` before clipping to any layer.
    pub fn bounds(&self, size: (f64, f64)) -> (i64, i64, i64, i64) {
        let radius = size.0.hypot(size.1) * self.scale.abs() / 2.0;
        let cx = self.center.0 + self.offset.0;
        let cy = self.center.1 + self.offset.1;
        (
            (cx - radius).floor() as i64 - 1,
            (cy - radius).floor() as i64 - 1,
            (cx + radius).ceil() as i64 + 1,
            (cy + radius).ceil() as i64 + 1,
        )
    }
}
