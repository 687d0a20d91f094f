//! Coordinates and cell indices.

use std::fmt::{Display, Formatter};
use std::num::NonZero;

use ndarray::Ix;

pub(crate) type Coord = usize;
/// A width or height; boards always have at least one row and one column.
pub type Dimension = NonZero<Coord>;
/// Row-major index of a cell, `row * width + col`.
pub type CellIndex = usize;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(x, y)` on a level. The top left corner is `Location(0, 0)`.
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// Whether this location lies on a board of size `dims`, given in `(width, height)` order.
    pub fn is_within(&self, dims: (Dimension, Dimension)) -> bool {
        self.0 < dims.0.get() && self.1 < dims.1.get()
    }

    /// Whether this location is on the outer ring of a board of size `dims`.
    pub fn is_on_border(&self, dims: (Dimension, Dimension)) -> bool {
        self.0 == 0 || self.1 == 0 || self.0 == dims.0.get() - 1 || self.1 == dims.1.get() - 1
    }

    /// The row-major cell index of this location on a board `width` cells wide.
    pub fn cell_index(&self, width: Dimension) -> CellIndex {
        self.1 * width.get() + self.0
    }

    /// Inverse of [`Self::cell_index`].
    pub fn from_cell_index(index: CellIndex, width: Dimension) -> Self {
        Self(index % width.get(), index / width.get())
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use crate::location::Location;

    #[test]
    fn cell_index_round_trips_row_major() {
        let width = NonZero::new(4).unwrap();
        assert_eq!(Location(3, 1).cell_index(width), 7);
        assert_eq!(Location::from_cell_index(7, width), Location(3, 1));
    }

    #[test]
    fn border_ring() {
        let dims = (NonZero::new(4).unwrap(), NonZero::new(3).unwrap());
        assert!(Location(0, 1).is_on_border(dims));
        assert!(Location(3, 1).is_on_border(dims));
        assert!(Location(2, 2).is_on_border(dims));
        assert!(!Location(1, 1).is_on_border(dims));
        assert!(!Location(2, 1).is_on_border(dims));
    }

    #[test]
    fn offset_off_the_board_is_out_of_bounds() {
        let dims = (NonZero::new(2).unwrap(), NonZero::new(2).unwrap());
        assert!(!Location(0, 0).offset_by((-1, 0)).is_within(dims));
        assert!(!Location(1, 1).offset_by((0, 1)).is_within(dims));
        assert!(Location(1, 1).offset_by((-1, -1)).is_within(dims));
    }
}
