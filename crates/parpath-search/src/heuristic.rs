use parpath_core::{Point, manhattan};

/// Lower-bound estimate added to a tile's best cost when ordering the open
/// set.
///
/// Every variant is a Manhattan bound and every cell costs at least 1 to
/// enter, so all of them are consistent on a 4-connected grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// No estimate; the open set behaves like Dijkstra's.
    #[default]
    Zero,
    /// Distance to a single goal.
    DistanceTo(Point),
    /// Distance to whichever of two goals is closer.
    MinDistanceToEither(Point, Point),
}

impl Heuristic {
    #[inline]
    pub fn estimate(&self, p: Point) -> u32 {
        match *self {
            Heuristic::Zero => 0,
            Heuristic::DistanceTo(goal) => manhattan(p, goal),
            Heuristic::MinDistanceToEither(a, b) => manhattan(p, a).min(manhattan(p, b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates() {
        let p = Point::new(4, 4);
        assert_eq!(Heuristic::Zero.estimate(p), 0);
        assert_eq!(Heuristic::DistanceTo(Point::new(0, 0)).estimate(p), 8);
        assert_eq!(
            Heuristic::MinDistanceToEither(Point::new(0, 0), Point::new(5, 6)).estimate(p),
            3
        );
    }
}
