use getset::CopyGetters;
use vector2d::Vector2D;

use super::grid::Rect;

/// A falling square piece carrying one glyph. Position is in pixels with the
/// origin at the viewport's top left; the orientation angle is only meaningful
/// in Rotate mode and is always a multiple of 90 degrees.
#[derive(Debug, Clone, CopyGetters)]
pub struct Block {
    #[getset(get_copy = "pub")]
    id: u32,
    pub position: Vector2D<f64>,
    #[getset(get_copy = "pub")]
    size: f64,
    #[getset(get_copy = "pub")]
    glyph: char,
    #[getset(get_copy = "pub")]
    angle: u16,
    #[getset(get_copy = "pub")]
    settled: bool,
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.position.x == other.position.x
            && self.position.y == other.position.y
            && self.size == other.size
            && self.glyph == other.glyph
            && self.angle == other.angle
            && self.settled == other.settled
    }
}

impl Block {
    #[inline]
    pub(super) fn new(id: u32, glyph: char, x: f64, y: f64, size: f64, angle: u16) -> Self {
        Self {
            id,
            position: Vector2D::new(x, y),
            size,
            glyph,
            angle,
            settled: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_origin(self.position.x, self.position.y, self.size)
    }

    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let r = self.rect();
        x >= r.left && x < r.right && y >= r.top && y < r.bottom
    }

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            self.position.x + self.size / 2.0,
            self.position.y + self.size / 2.0,
        )
    }

    #[inline]
    pub fn is_upright(&self) -> bool {
        self.angle % 360 == 0
    }

    /// Quarter turn clockwise, wrapping modulo 360.
    #[inline]
    pub(super) fn rotate(&mut self) {
        self.angle = (self.angle + 90) % 360;
    }

    #[inline]
    pub(super) fn set_settled(&mut self, settled: bool) {
        self.settled = settled;
    }
}
