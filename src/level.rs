use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use log::{debug, info, trace, warn};
use ndarray::Array2;

use crate::cell::Tile;
use crate::config::SolveOptions;
use crate::graph::Topology;
use crate::location::{CellIndex, Dimension, Location};
use crate::model::EnclosureModel;
use crate::solution::Enclosure;
use crate::solver::SolverBackend;

/// A parsed, immutable puzzle: the grid, its entities and the wall budget.
///
/// [`Level`]s are built with a [`LevelBuilder`](crate::builder::LevelBuilder), parsed from a text map with [`str::parse`],
/// or read from a JSON [`LevelRecord`](crate::record::LevelRecord).
#[derive(Clone, Debug)]
pub struct Level {
    pub(crate) dims: (Dimension, Dimension),
    pub(crate) tiles: Array2<Tile>,
    pub(crate) start: CellIndex,
    pub(crate) budget: u32,
    pub(crate) portals: BTreeMap<char, Vec<CellIndex>>,
}

impl Level {
    /// `(width, height)`.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.dims.0.get()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.dims.1.get()
    }

    /// Number of cells, `width * height`.
    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    /// Index of the horse.
    pub fn start(&self) -> CellIndex {
        self.start
    }

    /// Maximum number of walls that may be placed.
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// The location of a row-major cell index.
    pub fn location_of(&self, cell: CellIndex) -> Location {
        Location::from_cell_index(cell, self.dims.0)
    }

    /// The row-major cell index of `location`.
    pub fn index_of(&self, location: Location) -> CellIndex {
        location.cell_index(self.dims.0)
    }

    /// The tile at `cell`.
    ///
    /// # Panics
    /// If `cell` is not below [`Self::cell_count`].
    pub fn tile(&self, cell: CellIndex) -> Tile {
        self.tiles[self.location_of(cell).as_index()]
    }

    /// Iterate over every cell index with its tile, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellIndex, Tile)> + '_ {
        // Array2::iter visits in logical order, which is row-major for our (y, x) shape
        self.tiles.iter().copied().enumerate()
    }

    /// Whether `cell` holds water.
    pub fn is_water(&self, cell: CellIndex) -> bool {
        self.tile(cell) == Tile::Water
    }

    /// Every water cell.
    pub fn water(&self) -> BTreeSet<CellIndex> {
        self.cells().filter(|(_, tile)| *tile == Tile::Water).map(|(cell, _)| cell).collect()
    }

    /// Fruit values keyed by cell.
    pub fn fruits(&self) -> BTreeMap<CellIndex, i64> {
        self.cells()
            .filter_map(|(cell, tile)| match tile {
                Tile::Fruit(fruit) => Some((cell, fruit.value())),
                _ => None,
            })
            .collect()
    }

    /// Value of the fruit on `cell`, 0 if there is none.
    pub fn fruit_value(&self, cell: CellIndex) -> i64 {
        match self.tile(cell) {
            Tile::Fruit(fruit) => fruit.value(),
            _ => 0,
        }
    }

    /// Teleport groups: each label maps to its cells in row-major order.
    pub fn portals(&self) -> &BTreeMap<char, Vec<CellIndex>> {
        &self.portals
    }

    /// Whether `cell` is on the outer ring of the grid.
    pub fn is_border(&self, cell: CellIndex) -> bool {
        self.location_of(cell).is_on_border(self.dims)
    }

    /// Every cell on the outer ring.
    pub fn border(&self) -> BTreeSet<CellIndex> {
        (0..self.cell_count()).filter(|cell| self.is_border(*cell)).collect()
    }

    /// Whether a wall may be placed on `cell`: only plain grass qualifies.
    pub fn is_wall_eligible(&self, cell: CellIndex) -> bool {
        self.tile(cell).is_wall_eligible()
    }

    /// Solves this level, deferring to `backend` for the optimization itself.
    ///
    /// Builds the [`Topology`] and [`EnclosureModel`], runs the backend with the time limit from `options`
    /// and extracts the result. Non-optimal outcomes produce an empty [`Enclosure`] carrying the status.
    pub fn solve(&self, backend: &dyn SolverBackend, options: &SolveOptions) -> Enclosure {
        if self.is_border(self.start) {
            warn!("start cell {} lies on the border; the model is infeasible by construction", self.location_of(self.start));
        }

        let topology = Topology::from(self);
        let model = EnclosureModel::build(self, &topology);
        debug!(
            "model for {}x{} level: {} edges ({} through portals), {} variables, {} constraints",
            self.width(),
            self.height(),
            topology.edge_count(),
            topology.teleport_count(),
            model.program().variables().len(),
            model.program().constraints().len(),
        );

        trace!("{}", model.program());

        let outcome = backend.solve(model.program(), options.time_limit);
        let enclosure = Enclosure::extract(&model, &outcome);
        match enclosure.score() {
            Some(score) => info!("status {}: score {}, walls used {}/{}", enclosure.status(), score, enclosure.walls().len(), self.budget),
            None => info!("status {}: no solution produced", enclosure.status()),
        }

        enclosure
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.tiles.rows() {
            for tile in row {
                write!(f, "{}", tile)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use crate::cell::Tile;
    use crate::level::Level;
    use crate::location::Location;

    #[test]
    fn entity_sets() {
        let level: Level = "....\n.HG.\n~1S1\n".parse().unwrap();

        assert_eq!(level.water(), BTreeSet::from([8]));
        assert_eq!(level.fruits(), BTreeMap::from([(6, 10), (10, -5)]));
        assert_eq!(level.fruit_value(6), 10);
        assert_eq!(level.fruit_value(5), 0);
        assert_eq!(level.portals(), &BTreeMap::from([('1', vec![9, 11])]));
        assert_eq!(level.border(), BTreeSet::from([0, 1, 2, 3, 4, 7, 8, 9, 10, 11]));
        assert!(level.is_wall_eligible(1));
        assert!(!level.is_wall_eligible(5));
        assert!(!level.is_wall_eligible(9));
    }

    #[test]
    fn cells_are_row_major() {
        let level: Level = "H.~\n..C".parse().unwrap();
        let tiles: Vec<Tile> = level.cells().map(|(_, tile)| tile).collect();
        assert_eq!(tiles[2], Tile::Water);
        assert_eq!(level.tile(5), level.tiles[Location(2, 1).as_index()]);
        assert_eq!(level.location_of(5), Location(2, 1));
        assert_eq!(level.index_of(Location(2, 1)), 5);
    }

    #[test]
    fn display_reproduces_map() {
        let map = ".~~.\n.H0.\nS..0\n";
        let level: Level = map.parse().unwrap();
        assert_eq!(level.to_string(), map);
    }
}
