//! Constructing [`Level`]s, programmatically or from a text map.

use std::collections::BTreeMap;
use std::num::NonZero;
use std::ops::IndexMut;
use std::str::FromStr;

use itertools::Itertools;
use ndarray::{Array2, AssignElem};

use crate::cell::{Fruit, Tile};
use crate::error::{EnclosureError, ModelError, ParseError};
use crate::level::Level;
use crate::location::{CellIndex, Dimension, Location};

/// A builder for [`Level`]s.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Placing a feature on a location overwrites whatever was placed there before.
#[derive(Clone)]
pub struct LevelBuilder {
    // width, height
    dims: (Dimension, Dimension),
    tiles: Array2<Tile>,
    budget: u32,
    invalid_reasons: Vec<ModelError>,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self::with_dims((NonZero::<usize>::MIN, NonZero::<usize>::MIN))
    }
}

impl LevelBuilder {
    /// Construct a new [`Self`] of plain grass with the specified dimensions, specified in `(x, y)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            tiles: Array2::from_shape_simple_fn((dims.1.get(), dims.0.get()), Tile::default),
            budget: 0,
            invalid_reasons: Default::default(),
        }
    }

    fn place(&mut self, location: Location, tile: Tile) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !location.is_within(self.dims) {
            self.invalid_reasons.push(ModelError::FeatureOutOfBounds { location });
            return self;
        }

        self.tiles.index_mut(location.as_index()).assign_elem(tile);
        self
    }

    /// Mark `location` as the start cell.
    ///
    /// Calling this twice with different locations yields two start cells, which [`Self::build`] rejects.
    /// May cause the builder to enter a [`FeatureOutOfBounds`](ModelError::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn set_start(&mut self, location: Location) -> &mut Self {
        self.place(location, Tile::Start)
    }

    /// Flood `location`. Same bounds handling as [`Self::set_start`].
    pub fn add_water(&mut self, location: Location) -> &mut Self {
        self.place(location, Tile::Water)
    }

    /// Put `fruit` on `location`. Same bounds handling as [`Self::set_start`].
    pub fn add_fruit(&mut self, location: Location, fruit: Fruit) -> &mut Self {
        self.place(location, Tile::Fruit(fruit))
    }

    /// Add `location` to the teleport group named `label`. Same bounds handling as [`Self::set_start`].
    pub fn add_portal(&mut self, label: char, location: Location) -> &mut Self {
        self.place(location, Tile::Portal(label))
    }

    /// Set the number of walls that may be placed.
    ///
    /// May cause the builder to enter a [`NegativeBudget`](ModelError::NegativeBudget) invalid state.
    pub fn with_budget(&mut self, budget: i64) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        match u32::try_from(budget) {
            Ok(budget) => self.budget = budget,
            // no board has u32::MAX wall-eligible cells, so the clamp never binds
            Err(_) if budget > 0 => self.budget = u32::MAX,
            Err(_) => self.invalid_reasons.push(ModelError::NegativeBudget(budget)),
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`ModelError`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&[ModelError])` otherwise.
    pub fn is_valid(&self) -> Option<&[ModelError]> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Level`].
    ///
    /// Fails with the first recorded invalid reason, or with [`MissingStart`](ModelError::MissingStart) /
    /// [`MultipleStarts`](ModelError::MultipleStarts) unless exactly one start cell was placed.
    pub fn build(&self) -> Result<Level, ModelError> {
        if let Some(reason) = self.invalid_reasons.first() {
            return Err(reason.clone());
        }

        let width = self.dims.0;
        let starts = self.tiles.indexed_iter()
            .filter(|(_, tile)| **tile == Tile::Start)
            .map(|(ind, _)| Location::from(ind).cell_index(width))
            .collect_vec();
        let start = match starts.as_slice() {
            [] => return Err(ModelError::MissingStart),
            [start] => *start,
            _ => return Err(ModelError::MultipleStarts { count: starts.len() }),
        };

        // indexed_iter walks in logical (row-major) order, so every group is sorted by cell index
        let mut portals: BTreeMap<char, Vec<CellIndex>> = BTreeMap::new();
        for (ind, tile) in self.tiles.indexed_iter() {
            if let Tile::Portal(label) = tile {
                portals.entry(*label).or_default().push(Location::from(ind).cell_index(width));
            }
        }

        Ok(Level {
            dims: self.dims,
            tiles: self.tiles.clone(),
            start,
            budget: self.budget,
            portals,
        })
    }

    /// Read a text map: one line per row, one glyph per cell.
    ///
    /// Surrounding whitespace is ignored; every row must have the same width.
    /// The budget of the returned builder is 0.
    pub fn from_map(map: &str) -> Result<Self, ParseError> {
        let rows = map.trim().lines().collect_vec();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let (Some(dim_x), Some(dim_y)) = (NonZero::new(width), NonZero::new(rows.len())) else {
            return Err(ParseError::Empty);
        };

        let mut builder = Self::with_dims((dim_x, dim_y));
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow { row: y, expected: width, found });
            }

            for (x, glyph) in row.chars().enumerate() {
                let location = Location(x, y);
                let tile = Tile::from_glyph(glyph).ok_or(ParseError::UnrecognizedTile { glyph, location })?;
                builder.place(location, tile);
            }
        }

        Ok(builder)
    }
}

impl FromStr for Level {
    type Err = EnclosureError;

    /// Parse a text map into a [`Level`] with a budget of 0.
    fn from_str(map: &str) -> Result<Self, Self::Err> {
        Ok(LevelBuilder::from_map(map)?.build()?)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use crate::builder::LevelBuilder;
    use crate::cell::{Fruit, Tile};
    use crate::error::{EnclosureError, ModelError, ParseError};
    use crate::level::Level;
    use crate::location::Location;

    fn dims(x: usize, y: usize) -> (NonZero<usize>, NonZero<usize>) {
        (NonZero::new(x).unwrap(), NonZero::new(y).unwrap())
    }

    #[test]
    fn build_programmatically() {
        let level = LevelBuilder::with_dims(dims(4, 3))
            .set_start(Location(1, 1))
            .add_water(Location(0, 0))
            .add_fruit(Location(2, 1), Fruit::Cherry)
            .add_portal('a', Location(3, 2))
            .add_portal('a', Location(0, 2))
            .with_budget(2)
            .build()
            .unwrap();

        assert_eq!(format!("{}", level), "~...
.HC.
a..a
");
        assert_eq!(level.budget(), 2);
        assert_eq!(level.start(), 5);
        assert_eq!(level.portals().get(&'a'), Some(&vec![8, 11]));
    }

    #[test]
    fn out_of_bounds_invalidates_and_sticks() {
        let mut builder = LevelBuilder::with_dims(dims(2, 2));
        builder.add_water(Location(2, 0)).set_start(Location(0, 0));

        assert_eq!(builder.is_valid(), Some(&[ModelError::FeatureOutOfBounds { location: Location(2, 0) }][..]));
        assert_eq!(builder.build().err(), Some(ModelError::FeatureOutOfBounds { location: Location(2, 0) }));
    }

    #[test]
    fn negative_budget() {
        let builder = LevelBuilder::with_dims(dims(3, 3)).set_start(Location(1, 1)).with_budget(-1).clone();
        assert_eq!(builder.build().err(), Some(ModelError::NegativeBudget(-1)));
    }

    #[test]
    fn start_count_is_checked() {
        assert_eq!(LevelBuilder::with_dims(dims(3, 3)).build().err(), Some(ModelError::MissingStart));
        assert_eq!(
            LevelBuilder::with_dims(dims(3, 3)).set_start(Location(0, 0)).set_start(Location(2, 2)).build().err(),
            Some(ModelError::MultipleStarts { count: 2 })
        );
        // overwriting the start keeps it unique
        assert!(LevelBuilder::with_dims(dims(3, 3)).set_start(Location(0, 0)).set_start(Location(0, 0)).build().is_ok());
    }

    #[test]
    fn parse_map() {
        let level: Level = "...\n.H1\n~S1\n".parse().unwrap();
        assert_eq!(level.width(), 3);
        assert_eq!(level.height(), 3);
        assert_eq!(level.start(), 4);
        assert_eq!(level.tile(6), Tile::Water);
        assert_eq!(level.tile(7), Tile::Fruit(Fruit::Skull));
        assert_eq!(level.portals().get(&'1'), Some(&vec![5, 8]));
        assert_eq!(level.budget(), 0);
    }

    #[test]
    fn parse_accepts_crlf() {
        let level: Level = "...\r\n.H.\r\n...".parse().unwrap();
        assert_eq!(level.cell_count(), 9);
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let err = "...\n.H\n...".parse::<Level>().unwrap_err();
        assert!(matches!(err, EnclosureError::Parse(ParseError::RaggedRow { row: 1, expected: 3, found: 2 })));
    }

    #[test]
    fn parse_rejects_unknown_glyph() {
        let err = "...\n.H#\n...".parse::<Level>().unwrap_err();
        assert!(matches!(
            err,
            EnclosureError::Parse(ParseError::UnrecognizedTile { glyph: '#', location: Location(2, 1) })
        ));
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!("  \n ".parse::<Level>().unwrap_err(), EnclosureError::Parse(ParseError::Empty)));
    }

    #[test]
    fn parse_start_errors_are_model_errors() {
        assert!(matches!("...".parse::<Level>().unwrap_err(), EnclosureError::Model(ModelError::MissingStart)));
        assert!(matches!(
            "H.H".parse::<Level>().unwrap_err(),
            EnclosureError::Model(ModelError::MultipleStarts { count: 2 })
        ));
    }
}
