//! Axis-aligned geometry shared by the layout engine and the DOM adapter.
//! All coordinates are container-relative pixels with the origin at the
//! container's top-left corner.

/// Axis-aligned box in container space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Same box grown by `pad` on every side.
    pub fn padded(&self, pad: f64) -> Rect {
        Rect {
            left: self.left - pad,
            top: self.top - pad,
            width: self.width + 2.0 * pad,
            height: self.height + 2.0 * pad,
        }
    }

    /// True when both boxes, each grown by `pad`, intersect on both axes.
    /// Touching edges do not count as an overlap.
    pub fn overlaps_padded(&self, other: &Rect, pad: f64) -> bool {
        let a = self.padded(pad);
        let b = other.padded(pad);
        a.left < b.right() && b.left < a.right() && a.top < b.bottom() && b.top < a.bottom()
    }

    /// Distance between the two box centres.
    pub fn center_distance(&self, other: &Rect) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        (ax - bx).hypot(ay - by)
    }
}

/// Size of the play area, read at layout time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest legal `left` for a box of `width` (0 when the box does not fit).
    pub fn max_left(&self, width: f64) -> f64 {
        (self.width - width).max(0.0)
    }

    pub fn max_top(&self, height: f64) -> f64 {
        (self.height - height).max(0.0)
    }

    /// Pull `rect` back inside the container, keeping its size.
    pub fn clamp(&self, rect: Rect) -> Rect {
        Rect {
            left: rect.left.clamp(0.0, self.max_left(rect.width)),
            top: rect.top.clamp(0.0, self.max_top(rect.height)),
            ..rect
        }
    }

    pub fn contains(&self, rect: &Rect) -> bool {
        rect.left >= 0.0
            && rect.top >= 0.0
            && rect.left <= self.max_left(rect.width)
            && rect.top <= self.max_top(rect.height)
    }
}

/// Anything the layout engine can measure and move: a DOM element in the
/// browser, a plain rectangle in tests.
pub trait Measurable {
    /// Current on-screen box, container-relative.
    fn bounds(&self) -> Rect;
    /// Move the top-left corner to (`left`, `top`).
    fn set_position(&mut self, left: f64, top: f64);
}

/// A bare rectangle is its own visual handle. Used by native callers and tests.
impl Measurable for Rect {
    fn bounds(&self) -> Rect {
        *self
    }

    fn set_position(&mut self, left: f64, top: f64) {
        self.left = left;
        self.top = top;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_overlap_counts_near_misses() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(115.0, 0.0, 100.0, 100.0);
        assert!(!a.overlaps_padded(&b, 0.0));
        assert!(a.overlaps_padded(&b, 10.0));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(50.0, 0.0, 50.0, 50.0);
        assert!(!a.overlaps_padded(&b, 0.0));
    }

    #[test]
    fn test_clamp_keeps_size_and_stays_inside() {
        let bounds = Bounds::new(300.0, 200.0);
        let r = bounds.clamp(Rect::new(-40.0, 180.0, 150.0, 100.0));
        assert_eq!(r, Rect::new(0.0, 100.0, 150.0, 100.0));
        assert!(bounds.contains(&r));
    }

    #[test]
    fn test_clamp_in_undersized_container_pins_to_origin() {
        let bounds = Bounds::new(100.0, 50.0);
        let r = bounds.clamp(Rect::new(30.0, 30.0, 150.0, 100.0));
        assert_eq!((r.left, r.top), (0.0, 0.0));
    }
}
