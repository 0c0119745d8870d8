//! Rectangular pixel regions

/// An axis-aligned rectangle in pixel coordinates
///
/// `x`/`y` is the top-left corner; the right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    /// Create a region from its corner and size
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a region from two corners (`x2`/`y2` exclusive)
    ///
    /// Inverted corners give an empty region.
    pub const fn from_corners(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2.saturating_sub(x1),
            height: y2.saturating_sub(y1),
        }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// True when the region covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Smallest region covering both
    pub fn union(&self, other: &Region) -> Region {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Region::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Overlap of both regions (empty when disjoint)
    pub fn intersect(&self, other: &Region) -> Region {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        if x2 <= x1 || y2 <= y1 {
            return Region::new(x1, y1, 0, 0);
        }
        Region::from_corners(x1, y1, x2, y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners() {
        let r = Region::from_corners(1, 1, 26, 12);
        assert_eq!(r, Region::new(1, 1, 25, 11));
        assert!(Region::from_corners(5, 5, 5, 9).is_empty());
        assert!(Region::from_corners(5, 5, 2, 9).is_empty());
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Region::new(10, 10, 5, 5);
        let empty = Region::default();
        assert_eq!(a.union(&empty), a);
        assert_eq!(empty.union(&a), a);
    }

    #[test]
    fn test_union_covers_both() {
        let a = Region::new(0, 0, 27, 113);
        let b = Region::new(141, 5, 60, 30);
        let u = a.union(&b);
        assert_eq!(u, Region::new(0, 0, 201, 113));
        assert_eq!((u.right(), u.bottom()), (201, 113));
    }

    #[test]
    fn test_intersect_clips() {
        let screen = Region::new(0, 0, 240, 135);
        let overhang = Region::new(230, 130, 20, 20);
        assert_eq!(overhang.intersect(&screen), Region::new(230, 130, 10, 5));

        let outside = Region::new(300, 0, 5, 5);
        assert!(outside.intersect(&screen).is_empty());
    }

    #[test]
    fn test_area() {
        assert_eq!(Region::new(36, 1, 25, 111).area(), 25 * 111);
        assert_eq!(Region::new(36, 1, 0, 111).area(), 0);
    }
}
