//! Bounded FIFO buffer of recent stroke points.

use std::collections::VecDeque;

use crate::geometry::Point;

/// Number of points kept by [`PointHistory::new`].
pub const HISTORY_CAPACITY: usize = 100;

/// Ordered sequence of recent points, most recent last.
///
/// Once the length exceeds the capacity the oldest points fall off the front,
/// so after any append `len() <= capacity()`.
#[derive(Clone, Debug)]
pub struct PointHistory {
    points:   VecDeque<Point>,
    capacity: usize,
}

impl PointHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// A history holding at most `capacity` points (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        PointHistory {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }
    pub fn clear(&mut self) { self.points.clear(); }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Point> + ExactSizeIterator + '_ {
        self.points.iter()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.back().copied()
    }

    /// The most recent `N` points in order, or `None` while fewer are stored.
    pub fn window<const N: usize>(&self) -> Option<[Point; N]> {
        let skip = self.points.len().checked_sub(N)?;
        let mut out = [Point::ZERO; N];
        for (slot, p) in out.iter_mut().zip(self.points.iter().skip(skip)) {
            *slot = *p;
        }
        Some(out)
    }
}

impl Default for PointHistory {
    fn default() -> Self { Self::new() }
}

impl Extend<Point> for PointHistory {
    fn extend<I: IntoIterator<Item = Point>>(&mut self, iter: I) {
        for p in iter {
            self.push(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use proptest::prelude::*;

    #[test]
    fn evicts_oldest_first() {
        let mut h = PointHistory::with_capacity(3);
        for i in 0..5 {
            h.push(vec2(i as f32, 0.0));
        }
        let xs: Vec<f32> = h.iter().map(|p| p.x).collect();
        assert_eq!(xs, [2.0, 3.0, 4.0]);
    }

    #[test]
    fn default_capacity_is_one_hundred() {
        let mut h = PointHistory::default();
        h.extend((0..250).map(|i| vec2(i as f32, 0.0)));
        assert_eq!(h.len(), HISTORY_CAPACITY);
        assert_eq!(h.iter().next().map(|p| p.x), Some(150.0));
        assert_eq!(h.last(), Some(vec2(249.0, 0.0)));
    }

    #[test]
    fn window_needs_enough_points() {
        let mut h = PointHistory::new();
        h.push(vec2(1.0, 0.0));
        h.push(vec2(2.0, 0.0));
        assert!(h.window::<4>().is_none());
        h.push(vec2(3.0, 0.0));
        h.push(vec2(4.0, 0.0));
        h.push(vec2(5.0, 0.0));
        let w = h.window::<4>().unwrap();
        assert_eq!(w.map(|p| p.x), [2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn clear_empties() {
        let mut h = PointHistory::new();
        h.push(vec2(1.0, 1.0));
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.last(), None);
    }

    proptest! {
        #[test]
        fn length_never_exceeds_capacity(cap in 1usize..150, n in 0usize..400) {
            let mut h = PointHistory::with_capacity(cap);
            for i in 0..n {
                h.push(vec2(i as f32, 0.0));
                prop_assert!(h.len() <= cap);
            }
            // The survivors are the newest points, still in insertion order.
            let expected: Vec<f32> = (n.saturating_sub(cap)..n).map(|i| i as f32).collect();
            let actual: Vec<f32> = h.iter().map(|p| p.x).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
