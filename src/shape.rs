//! Orthogonal steps on the rectangular grid.

use itertools::Itertools;
use strum::VariantArray;

use crate::location::{Dimension, Location};

/// An orthogonal step on the rectangular lattice.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum SquareStep {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl SquareStep {
    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// The result may be off the board; stepping left from column 0 wraps to a huge coordinate, which no board contains.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((0, -1)),
            Self::Down => location.offset_by((0, 1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
        }
    }

    /// All in-bounds orthogonal neighbors of `location` on a board of size `dims`, with the step leading to each.
    pub fn neighbors_of(location: Location, dims: (Dimension, Dimension)) -> Vec<(Self, Location)> {
        Self::VARIANTS.iter()
            .map(|dir| (*dir, dir.attempt_from(location)))
            .filter(|(_, neighbor)| neighbor.is_within(dims))
            .collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use crate::location::Location;
    use crate::shape::SquareStep;

    #[test]
    fn corner_has_two_neighbors() {
        let dims = (NonZero::new(3).unwrap(), NonZero::new(3).unwrap());
        let neighbors = SquareStep::neighbors_of(Location(0, 0), dims);
        assert_eq!(neighbors, vec![(SquareStep::Down, Location(0, 1)), (SquareStep::Right, Location(1, 0))]);
    }

    #[test]
    fn center_has_four_neighbors() {
        let dims = (NonZero::new(3).unwrap(), NonZero::new(3).unwrap());
        assert_eq!(SquareStep::neighbors_of(Location(1, 1), dims).len(), 4);
    }
}
